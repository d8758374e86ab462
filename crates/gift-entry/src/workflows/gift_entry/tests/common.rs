use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::gift_entry::config::GiftEntryConfig;
use crate::workflows::gift_entry::domain::{
    DonorType, FieldChoice, FieldDescriptor, FieldInputs, FormSession, OpenDonations,
    OpportunityCandidate, PaymentCandidate, RecordRef, RowFields,
};
use crate::workflows::gift_entry::gateway::{
    CandidateLoadError, CandidateLoader, Notification, NotificationError, NotificationGateway,
};
use crate::workflows::gift_entry::selection::SelectionState;
use crate::workflows::gift_entry::service::GiftEntryService;

pub(super) const BATCH_ID: &str = "a0T5e000001ABCDEAA";
pub(super) const CONTACT_ID: &str = "003Dn00000AbCdEfGH";
pub(super) const ACCOUNT_ID: &str = "0015e00000Acct001A";
pub(super) const OPPORTUNITY_ID: &str = "0065e00000Opp0001A";
pub(super) const PAYMENT_ID: &str = "a015e00000Pay0001A";

pub(super) const AMOUNT_FIELD: &str = "npsp__Donation_Amount__c";
pub(super) const DATE_FIELD: &str = "npsp__Donation_Date__c";
pub(super) const METHOD_FIELD: &str = "npsp__Payment_Method__c";

pub(super) fn config() -> GiftEntryConfig {
    GiftEntryConfig::default()
}

pub(super) fn payment_methods() -> Vec<FieldChoice> {
    ["Cash", "Check", "Credit Card"]
        .into_iter()
        .map(|method| FieldChoice {
            label: method.to_string(),
            value: method.to_string(),
        })
        .collect()
}

/// Amount (required), date, and a required payment-method picklist at index 2.
pub(super) fn descriptors() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new(AMOUNT_FIELD, "Donation Amount").required(),
        FieldDescriptor::new(DATE_FIELD, "Donation Date"),
        FieldDescriptor::new(METHOD_FIELD, "Payment Method")
            .required()
            .with_options(payment_methods()),
    ]
}

pub(super) fn complete_inputs() -> FieldInputs {
    FieldInputs::new()
        .with(AMOUNT_FIELD, "250.00")
        .with(DATE_FIELD, "2025-11-03")
        .with(METHOD_FIELD, "Check")
}

pub(super) fn session(donor_type: DonorType) -> FormSession {
    let mut session = FormSession::new(RecordRef::from(BATCH_ID), donor_type, descriptors());
    session.inputs = complete_inputs();
    session
}

pub(super) fn session_with(selection: SelectionState) -> FormSession {
    let mut session = session(DonorType::Contact);
    match selection {
        SelectionState::NoSelection => session.donation.clear(),
        SelectionState::ExplicitNew => session.donation.choose_new(),
        SelectionState::Matched(candidate) => session.donation.select(candidate),
    }
    session
}

/// Row as harvested from the generic input fields, donor included.
pub(super) fn raw_row() -> RowFields {
    let fields = config().fields;
    RowFields::new()
        .with(fields.contact_lookup, CONTACT_ID)
        .with(AMOUNT_FIELD, "250.00")
        .with(DATE_FIELD, "2025-11-03")
}

pub(super) fn opportunity(apply_as_new_payment: bool) -> OpportunityCandidate {
    OpportunityCandidate {
        id: RecordRef::from(OPPORTUNITY_ID),
        apply_as_new_payment,
    }
}

pub(super) fn payment() -> PaymentCandidate {
    PaymentCandidate {
        id: RecordRef::from(PAYMENT_ID),
        parent_opportunity_id: RecordRef::from(OPPORTUNITY_ID),
    }
}

pub(super) fn open_donations() -> OpenDonations {
    OpenDonations {
        open_opportunities: vec![opportunity(false)],
        unpaid_payments: vec![payment()],
    }
}

pub(super) fn build_service() -> (
    GiftEntryService<MemoryLoader, RecordingGateway>,
    Arc<MemoryLoader>,
    Arc<RecordingGateway>,
) {
    let loader = Arc::new(MemoryLoader::default());
    let gateway = Arc::new(RecordingGateway::default());
    let service = GiftEntryService::new(loader.clone(), gateway.clone(), config());
    (service, loader, gateway)
}

#[derive(Default)]
pub(super) struct MemoryLoader {
    responses: Mutex<HashMap<RecordRef, Result<OpenDonations, CandidateLoadError>>>,
    calls: Mutex<Vec<(RecordRef, DonorType)>>,
}

impl MemoryLoader {
    pub(super) fn respond(
        &self,
        donor_id: &str,
        response: Result<OpenDonations, CandidateLoadError>,
    ) {
        self.responses
            .lock()
            .expect("loader mutex poisoned")
            .insert(RecordRef::from(donor_id), response);
    }

    pub(super) fn calls(&self) -> Vec<(RecordRef, DonorType)> {
        self.calls.lock().expect("loader mutex poisoned").clone()
    }
}

impl CandidateLoader for MemoryLoader {
    async fn fetch_candidates(
        &self,
        donor_id: &RecordRef,
        donor_type: DonorType,
    ) -> Result<OpenDonations, CandidateLoadError> {
        self.calls
            .lock()
            .expect("loader mutex poisoned")
            .push((donor_id.clone(), donor_type));
        self.responses
            .lock()
            .expect("loader mutex poisoned")
            .get(donor_id)
            .cloned()
            .unwrap_or_else(|| Ok(OpenDonations::default()))
    }
}

#[derive(Default)]
pub(super) struct RecordingGateway {
    events: Mutex<Vec<Notification>>,
}

impl RecordingGateway {
    pub(super) fn events(&self) -> Vec<Notification> {
        self.events.lock().expect("gateway mutex poisoned").clone()
    }
}

impl NotificationGateway for RecordingGateway {
    fn notify(&self, notification: Notification) -> Result<(), NotificationError> {
        self.events
            .lock()
            .expect("gateway mutex poisoned")
            .push(notification);
        Ok(())
    }
}

pub(super) struct OfflineGateway;

impl NotificationGateway for OfflineGateway {
    fn notify(&self, _notification: Notification) -> Result<(), NotificationError> {
        Err(NotificationError::Transport("message bus offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
