//! The token service's JSON reply envelope and a handler that collects it.

use reqwest::header::HeaderMap;
use serde::Deserialize;

use crate::{ResponseHandler, WireError, WireResponse};

/// Status value the handler reports before any reply was processed.
pub const STATUS_UNPROCESSED: i32 = -1;

/// Reply envelope used by the token service. `status == 0` means the
/// operation was accepted; `data` carries the payload, if any.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    pub status: i32,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<String>,
}

impl Envelope {
    pub fn is_success(&self) -> bool {
        self.status == 0
    }
}

/// Deserializes the reply envelope and records the reply headers so callers
/// can look them up afterwards (case-insensitively, per HTTP semantics).
#[derive(Debug, Default)]
pub struct EnvelopeHandler {
    envelope: Option<Envelope>,
    headers: HeaderMap,
}

impl EnvelopeHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn envelope(&self) -> Option<&Envelope> {
        self.envelope.as_ref()
    }

    /// Envelope status, or [`STATUS_UNPROCESSED`] when no reply was handled.
    pub fn envelope_status(&self) -> i32 {
        self.envelope
            .as_ref()
            .map(|envelope| envelope.status)
            .unwrap_or(STATUS_UNPROCESSED)
    }

    /// The `data` payload of the reply, if present.
    pub fn result(&self) -> Option<&str> {
        self.envelope.as_ref().and_then(|envelope| envelope.data.as_deref())
    }

    /// The `message` field of the reply, if present.
    pub fn message(&self) -> Option<&str> {
        self.envelope
            .as_ref()
            .and_then(|envelope| envelope.message.as_deref())
    }

    /// Look up a reply header by name.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

impl ResponseHandler for EnvelopeHandler {
    fn handle(&mut self, response: &WireResponse) -> Result<(), WireError> {
        let envelope: Envelope = serde_json::from_str(&response.body)?;
        self.headers = response.headers.clone();
        self.envelope = Some(envelope);
        Ok(())
    }
}
