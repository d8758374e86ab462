//! Gift entry row reconciliation.
//!
//! A manually entered gift row is linked to the donation the operator picked (if any),
//! stamped with the hidden batch and donor fields, and checked for a donor and every
//! mandatory field before it goes to the batch import pipeline. Fetching candidates and
//! delivering notifications are left to the host through [`CandidateLoader`] and
//! [`NotificationGateway`].

pub mod classifier;
pub mod composer;
pub mod config;
pub mod domain;
pub mod gateway;
pub mod router;
pub mod selection;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use classifier::{classify, classify_fields, MatchDecision};
pub use composer::compose_row;
pub use config::{GiftEntryConfig, ImportFieldNames, MessageCatalog};
pub use domain::{
    DonationCandidate, DonorType, FieldChoice, FieldDescriptor, FieldInputs, FormSession,
    OpenDonations, OpportunityCandidate, PaymentCandidate, RecordRef, RowFields,
    RECORD_ID_LENGTH,
};
pub use gateway::{
    CandidateLoadError, CandidateLoader, Notification, NotificationError, NotificationGateway,
};
pub use router::{gift_entry_router, OpenDonationsRequest, RowSubmissionRequest};
pub use selection::{DonationSelection, LoadTicket, SelectionState};
pub use service::{
    GiftEntryError, GiftEntryService, LoadOutcome, PendingLoad, ValidationFailure,
};
pub use validation::{donor_reference, validate_row, RowValidity};
