//! Session error taxonomy
//!
//! Every failure an upload session sees is captured as exactly one
//! [`ErrorRecord`]. The `Display` output is the message shown to the user.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Detail used when the service gives no `detail` field
pub const UNKNOWN_SERVER_DETAIL: &str = "Unknown error";

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ErrorRecord {
    /// Bad local input, or an operation not allowed in the current phase
    #[error("{reason}")]
    Validation { reason: String },

    /// The analysis service could not be reached
    #[error("Network error: {message}")]
    Network { message: String },

    /// The analysis service answered with a failure
    #[error("Server error: {status_code} - {detail}")]
    Server { status_code: u16, detail: String },

    /// Any other local failure, including a malformed success body
    #[error("Error: {message}")]
    Client { message: String },
}

impl ErrorRecord {
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn server(status_code: u16, detail: Option<String>) -> Self {
        Self::Server {
            status_code,
            detail: detail.unwrap_or_else(|| UNKNOWN_SERVER_DETAIL.to_string()),
        }
    }

    pub fn client(message: impl Into<String>) -> Self {
        Self::Client {
            message: message.into(),
        }
    }

    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::Network { .. } => "network",
            Self::Server { .. } => "server",
            Self::Client { .. } => "client",
        }
    }
}
