use serde::{Deserialize, Serialize};

use super::config::GiftEntryConfig;
use super::domain::{DonationCandidate, RecordRef, RowFields};
use super::selection::SelectionState;

/// How the import pipeline should treat the row's opportunity and payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchDecision {
    /// Leave both status fields null so a dry run can still propose matches.
    Undecided,
    NewOpportunity,
    UpdateOpportunity {
        opportunity_id: RecordRef,
    },
    ApplyNewPayment {
        opportunity_id: RecordRef,
    },
    /// Updating a payment also confirms the opportunity it belongs to.
    UpdatePayment {
        payment_id: RecordRef,
        opportunity_id: RecordRef,
    },
}

impl MatchDecision {
    pub fn summary(&self) -> String {
        match self {
            MatchDecision::Undecided => "no donation selected".to_string(),
            MatchDecision::NewOpportunity => "create a new opportunity".to_string(),
            MatchDecision::UpdateOpportunity { opportunity_id } => {
                format!("update opportunity {opportunity_id}")
            }
            MatchDecision::ApplyNewPayment { opportunity_id } => {
                format!("apply a new payment to opportunity {opportunity_id}")
            }
            MatchDecision::UpdatePayment {
                payment_id,
                opportunity_id,
            } => format!("update payment {payment_id} on opportunity {opportunity_id}"),
        }
    }

    /// Lookup and status fields recording this decision on the row.
    pub fn stamp(&self, config: &GiftEntryConfig) -> RowFields {
        let fields = &config.fields;
        let messages = &config.messages;
        let mut row = RowFields::new();

        match self {
            MatchDecision::Undecided => {}
            MatchDecision::NewOpportunity => {
                row.set_value(
                    &fields.opportunity_status,
                    &messages.matched_by_user_new_opportunity,
                );
            }
            MatchDecision::UpdateOpportunity { opportunity_id } => {
                row.set_value(&fields.opportunity_lookup, opportunity_id.as_str());
                row.set_value(&fields.opportunity_status, &messages.matched_by_user);
            }
            MatchDecision::ApplyNewPayment { opportunity_id } => {
                row.set_value(&fields.opportunity_lookup, opportunity_id.as_str());
                row.set_value(
                    &fields.opportunity_status,
                    &messages.matched_apply_new_payment,
                );
            }
            MatchDecision::UpdatePayment {
                payment_id,
                opportunity_id,
            } => {
                row.set_value(&fields.payment_lookup, payment_id.as_str());
                row.set_value(&fields.payment_status, &messages.matched_by_user);
                row.set_value(&fields.opportunity_lookup, opportunity_id.as_str());
                row.set_value(&fields.opportunity_status, &messages.matched_by_user);
            }
        }

        row
    }
}

pub fn classify(selection: &SelectionState) -> MatchDecision {
    match selection {
        SelectionState::NoSelection => MatchDecision::Undecided,
        SelectionState::ExplicitNew => MatchDecision::NewOpportunity,
        SelectionState::Matched(candidate) if !candidate.is_linkable() => MatchDecision::Undecided,
        SelectionState::Matched(DonationCandidate::Opportunity(opportunity)) => {
            if opportunity.apply_as_new_payment {
                MatchDecision::ApplyNewPayment {
                    opportunity_id: opportunity.id.clone(),
                }
            } else {
                MatchDecision::UpdateOpportunity {
                    opportunity_id: opportunity.id.clone(),
                }
            }
        }
        SelectionState::Matched(DonationCandidate::Payment(payment)) => {
            MatchDecision::UpdatePayment {
                payment_id: payment.id.clone(),
                opportunity_id: payment.parent_opportunity_id.clone(),
            }
        }
    }
}

/// Row fields derived from the selection alone.
pub fn classify_fields(selection: &SelectionState, config: &GiftEntryConfig) -> RowFields {
    classify(selection).stamp(config)
}
