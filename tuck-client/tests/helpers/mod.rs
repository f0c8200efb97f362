//! Test Helper Utilities
//!
//! Shared fixtures for tuck-client integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tuck_client::events::SessionEvent;
use tuck_client::models::{Document, ACCEPTED_MEDIA_TYPE};
use tuck_client::services::{AnalysisResponse, AnalysisTransport, TransportError};

pub const PDF_BYTES: &[u8] = b"%PDF-1.7\n1 0 obj\n<< /Type /Catalog >>\nendobj\ntrailer\n%%EOF\n";

pub fn pdf_document(name: &str) -> Document {
    Document::new(name, ACCEPTED_MEDIA_TYPE, PDF_BYTES.to_vec())
}

pub fn text_document(name: &str) -> Document {
    Document::new(name, "text/plain", b"not a pdf".to_vec())
}

type Responder = Box<dyn Fn() -> Result<AnalysisResponse, TransportError> + Send + Sync>;

/// Scripted stand-in for the analysis service
pub struct FakeTransport {
    calls: AtomicUsize,
    latency: Duration,
    gate: Option<Arc<Notify>>,
    respond: Responder,
}

impl FakeTransport {
    pub fn new(
        respond: impl Fn() -> Result<AnalysisResponse, TransportError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            latency: Duration::ZERO,
            gate: None,
            respond: Box::new(respond),
        }
    }

    /// Answer 200 with `body`
    pub fn ok(body: Value) -> Self {
        Self::new(move || {
            Ok(AnalysisResponse {
                status: 200,
                body: body.clone(),
            })
        })
    }

    /// Simulated time the service takes to answer
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Hold every call until the gate is notified
    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnalysisTransport for FakeTransport {
    async fn analyze(&self, _document: &Document) -> Result<AnalysisResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        (self.respond)()
    }
}

/// Drain every event received so far
pub fn drain_events(rx: &mut tokio::sync::broadcast::Receiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
