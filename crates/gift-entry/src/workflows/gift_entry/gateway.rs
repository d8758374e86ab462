use std::future::Future;

use serde::{Deserialize, Serialize};

use super::domain::{DonorType, OpenDonations, RecordRef};

/// Source of open opportunities and unpaid payments for a donor.
pub trait CandidateLoader: Send + Sync {
    fn fetch_candidates(
        &self,
        donor_id: &RecordRef,
        donor_type: DonorType,
    ) -> impl Future<Output = Result<OpenDonations, CandidateLoadError>> + Send;
}

/// Candidate fetch failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CandidateLoadError {
    #[error("open donation lookup failed: {}", .0.join("; "))]
    Rejected(Vec<String>),
    #[error("open donation lookup failed without detail")]
    Unknown,
}

impl CandidateLoadError {
    /// First reported detail, if any was non-empty.
    pub fn first_detail(&self) -> Option<&str> {
        match self {
            CandidateLoadError::Rejected(details) => details
                .first()
                .map(String::as_str)
                .filter(|detail| !detail.trim().is_empty()),
            CandidateLoadError::Unknown => None,
        }
    }
}

/// Outbound channel to the surface hosting the entry form.
pub trait NotificationGateway: Send + Sync {
    fn notify(&self, notification: Notification) -> Result<(), NotificationError>;
}

/// Message published to the hosting surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "channel", content = "message")]
pub enum Notification {
    #[serde(rename = "onError", rename_all = "camelCase")]
    Error { title: String, error_message: String },
    /// Work finished; the host can drop its spinner and focus the match picker.
    #[serde(rename = "hideFormSpinner")]
    HideFormSpinner,
}

impl Notification {
    pub fn error(title: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self::Error {
            title: title.into(),
            error_message: error_message.into(),
        }
    }

    pub fn channel(&self) -> &'static str {
        match self {
            Notification::Error { .. } => "onError",
            Notification::HideFormSpinner => "hideFormSpinner",
        }
    }
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
