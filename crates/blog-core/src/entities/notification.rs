//! Email job - the payload handed to the mail queue

use serde::{Deserialize, Serialize};

/// An email waiting to be sent by the mail consumer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailJob {
    /// Recipient address
    pub email: String,
    pub subject: String,
    pub content: String,
}

impl EmailJob {
    pub fn new(
        email: impl Into<String>,
        subject: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            subject: subject.into(),
            content: content.into(),
        }
    }

    /// Serialize to the JSON wire format consumed by the mail worker
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
