use std::sync::Arc;

use tracing::{debug, info, warn};

use super::classifier::{classify, MatchDecision};
use super::composer::compose_row;
use super::config::GiftEntryConfig;
use super::domain::{DonorType, FormSession, OpenDonations, RecordRef, RowFields};
use super::gateway::{
    CandidateLoadError, CandidateLoader, Notification, NotificationError, NotificationGateway,
};
use super::selection::{DonationSelection, LoadTicket};
use super::validation::{donor_reference, validate_row};

/// Service composing the row composer, validator, and the host-side collaborators.
pub struct GiftEntryService<L, N> {
    loader: Arc<L>,
    gateway: Arc<N>,
    config: GiftEntryConfig,
}

/// What happened to the candidate lists after a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded {
        open_opportunities: usize,
        unpaid_payments: usize,
    },
    /// A newer load or a clear superseded this one; nothing was applied.
    Superseded,
}

impl<L, N> GiftEntryService<L, N>
where
    L: CandidateLoader + 'static,
    N: NotificationGateway + 'static,
{
    pub fn new(loader: Arc<L>, gateway: Arc<N>, config: GiftEntryConfig) -> Self {
        Self {
            loader,
            gateway,
            config,
        }
    }

    pub fn config(&self) -> &GiftEntryConfig {
        &self.config
    }

    pub fn compose(&self, session: &FormSession, raw: RowFields) -> RowFields {
        compose_row(raw, session, &self.config)
    }

    pub fn decision(&self, session: &FormSession) -> MatchDecision {
        classify(session.donation.selection())
    }

    pub fn donor_reference(&self, session: &FormSession, row: &RowFields) -> Option<RecordRef> {
        donor_reference(row, session.donor_type, &self.config)
    }

    /// Compose and validate a row, returning it ready for the import pipeline.
    ///
    /// A failed validation is reported to the host before the error is returned.
    pub fn prepare_row(
        &self,
        session: &FormSession,
        raw: RowFields,
    ) -> Result<RowFields, GiftEntryError> {
        let row = self.compose(session, raw);
        let validity = validate_row(&row, session, &self.config);

        if !validity.valid {
            warn!(
                batch_id = %session.batch_id,
                missing = ?validity.missing_fields,
                "gift row rejected"
            );
            let messages = &self.config.messages;
            self.gateway.notify(Notification::error(
                &messages.error_title,
                messages.required_fields_message(&validity.missing_fields),
            ))?;
            return Err(ValidationFailure {
                missing_fields: validity.missing_fields,
            }
            .into());
        }

        info!(
            batch_id = %session.batch_id,
            decision = %self.decision(session).summary(),
            fields = row.len(),
            "gift row ready for import"
        );
        Ok(row)
    }

    /// Refresh the session's candidate lists for `donor_id`.
    ///
    /// Shorthand for [`begin_load`](DonationSelection::begin_load), [`Self::fetch_open_donations`]
    /// and [`Self::finish_load`] when nothing else touches the session while the fetch runs.
    pub async fn load_open_donations(
        &self,
        session: &mut FormSession,
        donor_id: &RecordRef,
    ) -> Result<LoadOutcome, GiftEntryError> {
        let ticket = session.donation.begin_load();
        let pending = self
            .fetch_open_donations(ticket, donor_id, session.donor_type)
            .await;
        self.finish_load(&mut session.donation, pending)
    }

    /// Runs the candidate query for a ticket without holding on to the session.
    pub async fn fetch_open_donations(
        &self,
        ticket: LoadTicket,
        donor_id: &RecordRef,
        donor_type: DonorType,
    ) -> PendingLoad {
        let result = self.loader.fetch_candidates(donor_id, donor_type).await;
        PendingLoad {
            ticket,
            donor_id: donor_id.clone(),
            result,
        }
    }

    /// Applies a finished fetch if its ticket is still the newest one.
    ///
    /// The spinner signal is sent whatever the outcome. Failures of the current ticket also
    /// raise an error toast; stale results are dropped silently.
    pub fn finish_load(
        &self,
        donation: &mut DonationSelection,
        pending: PendingLoad,
    ) -> Result<LoadOutcome, GiftEntryError> {
        let PendingLoad {
            ticket,
            donor_id,
            result,
        } = pending;

        let outcome = match result {
            Ok(donations) => {
                let open_opportunities = donations.open_opportunities.len();
                let unpaid_payments = donations.unpaid_payments.len();
                if donation.apply_load(ticket, donations) {
                    Ok(LoadOutcome::Loaded {
                        open_opportunities,
                        unpaid_payments,
                    })
                } else {
                    debug!(%donor_id, sequence = ticket.sequence(), "discarding stale donations");
                    Ok(LoadOutcome::Superseded)
                }
            }
            Err(error) if !donation.is_current(ticket) => {
                debug!(%donor_id, %error, "discarding stale donation lookup failure");
                Ok(LoadOutcome::Superseded)
            }
            Err(error) => {
                warn!(%donor_id, %error, "open donation lookup failed");
                let messages = &self.config.messages;
                let detail = error.first_detail().unwrap_or(messages.unknown_error.as_str());
                if let Err(notify_error) = self
                    .gateway
                    .notify(Notification::error(&messages.error_title, detail))
                {
                    warn!(%notify_error, "could not report open donation lookup failure");
                }
                Err(GiftEntryError::CandidateLoad(error))
            }
        };

        if let Err(notify_error) = self.gateway.notify(Notification::HideFormSpinner) {
            warn!(%notify_error, "could not release form spinner");
        }
        outcome
    }
}

/// Result of a candidate fetch waiting to be applied to a selection.
#[derive(Debug)]
pub struct PendingLoad {
    ticket: LoadTicket,
    donor_id: RecordRef,
    result: Result<OpenDonations, CandidateLoadError>,
}

impl PendingLoad {
    pub fn ticket(&self) -> LoadTicket {
        self.ticket
    }
}

/// Required data missing from a row.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("missing required fields: {}", .missing_fields.join(", "))]
pub struct ValidationFailure {
    pub missing_fields: Vec<String>,
}

/// Error raised by the gift entry service.
#[derive(Debug, thiserror::Error)]
pub enum GiftEntryError {
    #[error(transparent)]
    Validation(#[from] ValidationFailure),
    #[error(transparent)]
    CandidateLoad(#[from] CandidateLoadError),
    #[error(transparent)]
    Notification(#[from] NotificationError),
}
