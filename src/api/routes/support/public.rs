//! Public types for the support API
use serde::{Deserialize, Serialize};

use crate::support::{SupportSession, SupportStage, Transcript};

/// Body of the HTML send form. A missing field is treated like an
/// empty message.
#[derive(Deserialize)]
pub struct SendForm {
    #[serde(default)]
    pub message: String,
}

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub stage: SupportStage,
    pub transcript: Transcript,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
}

impl SessionResponse {
    pub fn new(session: &SupportSession, reply: Option<String>) -> Self {
        Self {
            stage: session.stage(),
            transcript: session.transcript().clone(),
            reply,
        }
    }
}
