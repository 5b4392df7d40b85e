//! The single error kind surfaced by the API clients.

use thiserror::Error;

/// Network failure, non-2xx status, or undecodable response body.
///
/// Everything that goes wrong between issuing a request and holding a typed
/// response is flattened into this one shape, so callers only ever branch on
/// "did it work".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", describe(.status, .message))]
pub struct TransportError {
    /// HTTP status, when the service answered at all
    pub status: Option<u16>,
    pub message: String,
}

impl TransportError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Failure that never produced an HTTP status (connect, timeout, local I/O).
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(None, message)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}

fn describe(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("HTTP {}: {}", code, message),
        None => message.to_string(),
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let status = err.status().map(|s| s.as_u16());
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_connect() {
            format!("could not reach service: {}", err)
        } else if err.is_decode() {
            format!("unexpected response body: {}", err)
        } else {
            err.to_string()
        };
        Self { status, message }
    }
}
