//! Integration scenarios for the gift entry row workflow.
//!
//! Scenarios drive the public service facade the way an entry form would: look up the
//! donor's open donations, pick one, and submit the row.

mod common {
    use std::sync::Mutex;

    use gift_entry::workflows::gift_entry::{
        CandidateLoadError, CandidateLoader, DonorType, FieldChoice, FieldDescriptor,
        Notification, NotificationError, NotificationGateway, OpenDonations, RecordRef,
    };

    pub(super) const BATCH_ID: &str = "a0T5e000002XYZABQA";
    pub(super) const CONTACT_ID: &str = "0035e00000Donor01A";

    pub(super) fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("npsp__Donation_Amount__c", "Donation Amount").required(),
            FieldDescriptor::new("npsp__Check_Card_Number__c", "Check/Reference Number"),
            FieldDescriptor::new("npsp__Payment_Method__c", "Payment Method")
                .required()
                .with_options(vec![
                    FieldChoice {
                        label: "Check".to_string(),
                        value: "Check".to_string(),
                    },
                    FieldChoice {
                        label: "Cash".to_string(),
                        value: "Cash".to_string(),
                    },
                ]),
        ]
    }

    /// Loader backed by the JSON payload the host query returns.
    pub(super) struct JsonLoader {
        pub(super) payload: String,
    }

    impl CandidateLoader for JsonLoader {
        async fn fetch_candidates(
            &self,
            donor_id: &RecordRef,
            _donor_type: DonorType,
        ) -> Result<OpenDonations, CandidateLoadError> {
            if donor_id.as_str() != CONTACT_ID {
                return Err(CandidateLoadError::Rejected(vec![format!(
                    "no donor {donor_id}"
                )]));
            }
            OpenDonations::from_json(&self.payload)
                .map_err(|err| CandidateLoadError::Rejected(vec![err.to_string()]))
        }
    }

    #[derive(Default)]
    pub(super) struct Outbox {
        pub(super) sent: Mutex<Vec<Notification>>,
    }

    impl NotificationGateway for Outbox {
        fn notify(&self, notification: Notification) -> Result<(), NotificationError> {
            self.sent
                .lock()
                .expect("outbox mutex poisoned")
                .push(notification);
            Ok(())
        }
    }
}

use std::sync::Arc;

use common::*;
use gift_entry::workflows::gift_entry::{
    DonationCandidate, DonorType, FormSession, GiftEntryConfig, GiftEntryError,
    GiftEntryService, LoadOutcome, Notification, RecordRef, RowFields, SelectionState,
};

fn payload() -> String {
    r#"{
        "openOpportunities": [
            {"attributes": {"type": "Opportunity"}, "Id": "0065e00000Pledge1A", "applyPayment": true}
        ],
        "unpaidPayments": [
            {"Id": "a015e00000Install1", "npe01__Opportunity__c": "0065e00000Pledge2A"}
        ]
    }"#
    .to_string()
}

fn service() -> (GiftEntryService<JsonLoader, Outbox>, Arc<Outbox>) {
    let outbox = Arc::new(Outbox::default());
    let service = GiftEntryService::new(
        Arc::new(JsonLoader { payload: payload() }),
        outbox.clone(),
        GiftEntryConfig::default(),
    );
    (service, outbox)
}

fn harvested_row() -> RowFields {
    RowFields::new()
        .with("npsp__Contact1Imported__c", CONTACT_ID)
        .with("npsp__Donation_Amount__c", "75.00")
        .with("npsp__Check_Card_Number__c", "1042")
}

fn form() -> FormSession {
    let mut session = FormSession::new(RecordRef::from(BATCH_ID), DonorType::Contact, fields());
    session.inputs.set("npsp__Donation_Amount__c", Some("75.00".to_string()));
    session.inputs.set("npsp__Payment_Method__c", Some("Check".to_string()));
    session
}

#[tokio::test]
async fn selecting_an_unpaid_payment_links_payment_and_pledge() {
    let (service, outbox) = service();
    let mut session = form();
    let row = harvested_row();
    let donor = service
        .donor_reference(&session, &row)
        .expect("harvested row carries the donor");

    let outcome = service
        .load_open_donations(&mut session, &donor)
        .await
        .expect("donations load");
    assert_eq!(
        outcome,
        LoadOutcome::Loaded {
            open_opportunities: 1,
            unpaid_payments: 1,
        }
    );

    let installment = session.donation.unpaid_payments()[0].clone();
    session.donation.select(DonationCandidate::Payment(installment));
    let prepared = service.prepare_row(&session, row).expect("row is valid");

    assert_eq!(prepared.get("npsp__PaymentImported__c"), Some("a015e00000Install1"));
    assert_eq!(prepared.get("npsp__DonationImported__c"), Some("0065e00000Pledge2A"));
    assert_eq!(prepared.get("npsp__PaymentImportStatus__c"), Some("matched-by-user"));
    assert_eq!(prepared.get("npsp__NPSP_Data_Import_Batch__c"), Some(BATCH_ID));
    assert_eq!(prepared.get("npsp__Payment_Method__c"), Some("Check"));
    assert_eq!(
        outbox.sent.lock().expect("outbox mutex poisoned").clone(),
        vec![Notification::HideFormSpinner]
    );
}

#[tokio::test]
async fn clearing_the_donor_resets_to_undecided() {
    let (service, _) = service();
    let mut session = form();
    service
        .load_open_donations(&mut session, &RecordRef::from(CONTACT_ID))
        .await
        .expect("donations load");
    let pledge = session.donation.open_opportunities()[0].clone();
    session.donation.select(pledge.into());

    session.donation.clear();
    let prepared = service
        .prepare_row(&session, harvested_row())
        .expect("row is valid");

    assert_eq!(session.donation.selection(), &SelectionState::NoSelection);
    assert!(session.donation.open_opportunities().is_empty());
    assert!(!prepared.contains_key("npsp__DonationImportStatus__c"));
    assert!(!prepared.contains_key("npsp__DonationImported__c"));
}

#[tokio::test]
async fn unknown_donor_lookup_reports_error_and_keeps_form_usable() {
    let (service, outbox) = service();
    let mut session = form();

    let result = service
        .load_open_donations(&mut session, &RecordRef::from("0035e00000Nobody1A"))
        .await;
    assert!(matches!(result, Err(GiftEntryError::CandidateLoad(_))));

    session.donation.choose_new();
    let prepared = service
        .prepare_row(&session, harvested_row())
        .expect("row remains submittable");
    assert_eq!(
        prepared.get("npsp__DonationImportStatus__c"),
        Some("matched-by-user: new opportunity")
    );

    let sent = outbox.sent.lock().expect("outbox mutex poisoned").clone();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].channel(), "onError");
    assert_eq!(sent[1], Notification::HideFormSpinner);
}

#[test]
fn row_without_donor_or_method_lists_every_gap() {
    let (service, outbox) = service();
    let mut session = form();
    session.inputs.set("npsp__Payment_Method__c", None);

    match service.prepare_row(&session, RowFields::new()) {
        Err(GiftEntryError::Validation(failure)) => assert_eq!(
            failure.missing_fields,
            vec!["Contact".to_string(), "Payment Method".to_string()]
        ),
        other => panic!("expected validation failure, got {other:?}"),
    }

    let sent = outbox.sent.lock().expect("outbox mutex poisoned").clone();
    assert_eq!(
        sent,
        vec![Notification::error(
            "Error",
            "The following fields are required: Contact, Payment Method."
        )]
    );
}
