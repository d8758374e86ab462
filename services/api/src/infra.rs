use gift_entry::error::AppError;
use gift_entry::workflows::gift_entry::{
    CandidateLoadError, CandidateLoader, DonorType, Notification, NotificationError,
    NotificationGateway, OpenDonations, RecordRef,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Serves open donations from a fixture keyed by donor id; unknown donors have none.
#[derive(Default, Clone)]
pub(crate) struct FileCandidateLoader {
    donations: Arc<HashMap<RecordRef, OpenDonations>>,
}

impl FileCandidateLoader {
    pub(crate) fn from_json(payload: &str) -> Result<Self, serde_json::Error> {
        let donations: HashMap<RecordRef, OpenDonations> = serde_json::from_str(payload)?;
        Ok(Self {
            donations: Arc::new(donations),
        })
    }

    pub(crate) fn from_path(path: &Path) -> Result<Self, AppError> {
        let raw = fs::read_to_string(path)?;
        Ok(Self::from_json(&raw)?)
    }

    pub(crate) fn donors(&self) -> usize {
        self.donations.len()
    }
}

impl CandidateLoader for FileCandidateLoader {
    async fn fetch_candidates(
        &self,
        donor_id: &RecordRef,
        donor_type: DonorType,
    ) -> Result<OpenDonations, CandidateLoadError> {
        debug!(%donor_id, donor_type = donor_type.as_str(), "serving open donations from fixture");
        Ok(self.donations.get(donor_id).cloned().unwrap_or_default())
    }
}

const NOTIFICATION_HISTORY: usize = 64;

/// Logs each notification and keeps the most recent ones for the caller to inspect.
#[derive(Default, Clone)]
pub(crate) struct TracingNotificationGateway {
    sent: Arc<Mutex<Vec<Notification>>>,
}

impl TracingNotificationGateway {
    pub(crate) fn sent(&self) -> Vec<Notification> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

impl NotificationGateway for TracingNotificationGateway {
    fn notify(&self, notification: Notification) -> Result<(), NotificationError> {
        match &notification {
            Notification::Error {
                title,
                error_message,
            } => warn!(channel = notification.channel(), %title, %error_message, "form notification"),
            Notification::HideFormSpinner => {
                debug!(channel = notification.channel(), "form notification")
            }
        }

        let mut sent = self
            .sent
            .lock()
            .map_err(|_| NotificationError::Transport("notification log poisoned".to_string()))?;
        if sent.len() == NOTIFICATION_HISTORY {
            sent.remove(0);
        }
        sent.push(notification);
        Ok(())
    }
}
