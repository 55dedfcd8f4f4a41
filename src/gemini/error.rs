//! Model call error types

use thiserror::Error;

/// Any failure from the external completion call. The support flow
/// never shows these to the user, they are logged for operators.
#[derive(Debug, Error)]
#[error("{kind:?}: {message}")]
pub struct ModelCallError {
    pub kind: ModelCallErrorKind,
    pub message: String,
}

impl ModelCallError {
    pub fn new(kind: ModelCallErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ModelCallErrorKind::Network, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ModelCallErrorKind::Timeout, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ModelCallErrorKind::MalformedResponse, message)
    }

    /// Classify a non-success HTTP status from the model API.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let kind = match status {
            401 | 403 => ModelCallErrorKind::Auth,
            429 => ModelCallErrorKind::RateLimit,
            500..=599 => ModelCallErrorKind::Server,
            _ => ModelCallErrorKind::InvalidRequest,
        };
        Self::new(kind, message)
    }
}

impl From<reqwest::Error> for ModelCallError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::timeout(format!("Request timeout: {}", e))
        } else if e.is_decode() {
            Self::malformed(format!("Failed to decode response: {}", e))
        } else {
            Self::network(format!("Request failed: {}", e))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelCallErrorKind {
    Network,
    Timeout,
    /// 401, 403
    Auth,
    /// 429, usually quota
    RateLimit,
    /// 5xx
    Server,
    /// Any other 4xx
    InvalidRequest,
    /// Response body didn't contain any text
    MalformedResponse,
}
