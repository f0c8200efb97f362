//! Data models

pub mod canonical_result;
pub mod document;
pub mod error_record;
pub mod finding;
pub mod session_state;

pub use canonical_result::{
    CanonicalResult, CategorizedFindings, Category, PhaseSummaryEntry, ResponseShape,
};
pub use document::{Document, ACCEPTED_MEDIA_TYPE};
pub use error_record::ErrorRecord;
pub use finding::{Finding, PageRef};
pub use session_state::{SessionPhase, SessionState, StateTransition};
