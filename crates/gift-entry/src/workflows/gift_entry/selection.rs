use serde::{Deserialize, Serialize};

use super::domain::{DonationCandidate, OpenDonations, OpportunityCandidate, PaymentCandidate};

/// What the operator has decided about linking the row to an existing donation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "candidate", rename_all = "snake_case")]
pub enum SelectionState {
    /// Nothing chosen yet; status fields stay null so dry runs can still preview matches.
    #[default]
    NoSelection,
    /// Operator asked for a brand-new opportunity.
    ExplicitNew,
    Matched(DonationCandidate),
}

/// Issued for every candidate fetch; only the newest ticket may apply its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// Selection plus the candidate lists it was picked from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DonationSelection {
    selection: SelectionState,
    open_opportunities: Vec<OpportunityCandidate>,
    unpaid_payments: Vec<PaymentCandidate>,
    latest_request: u64,
}

impl DonationSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_selection(selection: SelectionState) -> Self {
        Self {
            selection,
            ..Self::default()
        }
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn open_opportunities(&self) -> &[OpportunityCandidate] {
        &self.open_opportunities
    }

    pub fn unpaid_payments(&self) -> &[PaymentCandidate] {
        &self.unpaid_payments
    }

    /// Drops the selection and both candidate lists, and orphans any in-flight fetch.
    pub fn clear(&mut self) {
        self.selection = SelectionState::NoSelection;
        self.open_opportunities.clear();
        self.unpaid_payments.clear();
        self.latest_request += 1;
    }

    pub fn select(&mut self, candidate: DonationCandidate) {
        self.selection = SelectionState::Matched(candidate);
    }

    pub fn choose_new(&mut self) {
        self.selection = SelectionState::ExplicitNew;
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.latest_request += 1;
        LoadTicket(self.latest_request)
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.latest_request
    }

    /// Replaces both candidate lists. Returns `false` and leaves state untouched for a stale ticket.
    pub fn apply_load(&mut self, ticket: LoadTicket, donations: OpenDonations) -> bool {
        if !self.is_current(ticket) {
            return false;
        }

        self.open_opportunities = donations.open_opportunities;
        self.unpaid_payments = donations.unpaid_payments;
        true
    }
}
