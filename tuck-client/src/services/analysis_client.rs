//! Analysis service client
//!
//! Sends the document as a multipart upload and hands back the raw JSON
//! body. Interpreting that body is the normalizer's job.

use crate::models::Document;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tuck_common::ClientConfig;

const USER_AGENT: &str = concat!("tuck/", env!("CARGO_PKG_VERSION"));

/// Multipart field carrying the file
pub const FILE_FIELD: &str = "file";

/// Query parameter limiting the pages the service analyzes
pub const MAX_PAGES_PARAM: &str = "max_pages";

/// Transport failures, split by how far the request got
#[derive(Debug, Error)]
pub enum TransportError {
    /// The service answered with a non-success status
    #[error("HTTP status {status}")]
    Status { status: u16, body: Option<Value> },

    /// No response was received (refused, reset, timed out)
    #[error("{0}")]
    NoResponse(String),

    /// Success status, but the body was not JSON
    #[error("invalid response body: {0}")]
    MalformedBody(String),

    /// The request could not be built
    #[error("{0}")]
    Local(String),
}

impl TransportError {
    /// Human-readable `detail` from a failure body
    ///
    /// String details are used verbatim; structured ones (validation error
    /// lists) are rendered as JSON text.
    pub fn detail(&self) -> Option<String> {
        let TransportError::Status {
            body: Some(body), ..
        } = self
        else {
            return None;
        };
        match body.get("detail")? {
            Value::Null => None,
            Value::String(detail) => Some(detail.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Successful (2xx) response
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResponse {
    pub status: u16,
    pub body: Value,
}

/// The network collaborator an upload session talks to
#[async_trait]
pub trait AnalysisTransport: Send + Sync {
    async fn analyze(&self, document: &Document) -> Result<AnalysisResponse, TransportError>;
}

/// reqwest-backed transport
pub struct HttpAnalysisClient {
    http_client: reqwest::Client,
    endpoint: String,
    max_pages: u32,
}

impl HttpAnalysisClient {
    pub fn new(
        endpoint: impl Into<String>,
        max_pages: u32,
        timeout: Option<Duration>,
    ) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| TransportError::Local(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: endpoint.into(),
            max_pages,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, TransportError> {
        Self::new(
            config.endpoint.clone(),
            config.max_pages,
            config.request_timeout(),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AnalysisTransport for HttpAnalysisClient {
    async fn analyze(&self, document: &Document) -> Result<AnalysisResponse, TransportError> {
        let part = reqwest::multipart::Part::bytes(document.contents().to_vec())
            .file_name(document.name().to_string())
            .mime_str(document.declared_media_type())
            .map_err(|e| TransportError::Local(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part(FILE_FIELD, part);

        tracing::debug!(
            endpoint = %self.endpoint,
            file = %document.name(),
            bytes = document.byte_size(),
            max_pages = self.max_pages,
            "Uploading document for analysis"
        );

        let response = self
            .http_client
            .post(&self.endpoint)
            .query(&[(MAX_PAGES_PARAM, self.max_pages)])
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_builder() {
                    TransportError::Local(e.to_string())
                } else {
                    TransportError::NoResponse(e.to_string())
                }
            })?;

        let status = response.status();
        let bytes = response.bytes().await;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Analysis service returned failure status");
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: bytes.ok().and_then(|b| serde_json::from_slice(&b).ok()),
            });
        }

        let bytes = bytes.map_err(|e| TransportError::MalformedBody(e.to_string()))?;
        let body: Value = serde_json::from_slice(&bytes)
            .map_err(|e| TransportError::MalformedBody(e.to_string()))?;

        tracing::info!(status = status.as_u16(), bytes = bytes.len(), "Analysis response received");

        Ok(AnalysisResponse {
            status: status.as_u16(),
            body,
        })
    }
}
