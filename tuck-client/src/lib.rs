//! tuck-client library interface
//!
//! Upload session state machine, analysis service client and result
//! normalization for the TU report checker.

pub mod events;
pub mod models;
pub mod report;
pub mod services;

pub use crate::events::{EventBus, SessionEvent};
pub use crate::models::{CanonicalResult, Document, ErrorRecord, SessionPhase};
pub use crate::services::{HttpAnalysisClient, SessionSettings, UploadSession};
