//! Services for the upload session and result pipeline

pub mod analysis_client;
pub mod phase_summary;
pub mod progress_estimator;
pub mod result_normalizer;
pub mod section_tag;
pub mod upload_session;

pub use analysis_client::{AnalysisResponse, AnalysisTransport, HttpAnalysisClient, TransportError};
pub use progress_estimator::{estimated_remaining_secs, progress_message, ProgressEstimator};
pub use result_normalizer::{normalize, NormalizeError};
pub use section_tag::{extract, SectionTag};
pub use upload_session::{SessionSettings, UploadSession};
