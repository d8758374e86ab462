use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::selection::DonationSelection;

/// Length of the canonical external form of a host record identifier.
pub const RECORD_ID_LENGTH: usize = 18;

/// Opaque host record identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordRef(pub String);

impl RecordRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the identifier is the 18-character form the import pipeline accepts.
    pub fn is_canonical(&self) -> bool {
        is_canonical_id(&self.0)
    }

    pub(crate) fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordRef {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

pub(crate) fn is_canonical_id(value: &str) -> bool {
    value.chars().count() == RECORD_ID_LENGTH
}

/// Which kind of donor the row is being entered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DonorType {
    #[serde(rename = "Contact1", alias = "Contact")]
    Contact,
    #[serde(rename = "Account1", alias = "Account")]
    Account,
}

impl DonorType {
    /// Picklist value written to the row's donor-type field.
    pub fn as_str(&self) -> &'static str {
        match self {
            DonorType::Contact => "Contact1",
            DonorType::Account => "Account1",
        }
    }
}

/// One entry of a choice-list field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChoice {
    pub label: String,
    pub value: String,
}

/// Operator-configurable metadata for a single input on the entry form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Vec<FieldChoice>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            required: false,
            options: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_options(mut self, options: Vec<FieldChoice>) -> Self {
        self.options = options;
        self
    }

    /// Choice fields are not picked up by the generic row harvesting.
    pub fn is_choice(&self) -> bool {
        !self.options.is_empty()
    }
}

/// Current widget values, keyed by the field name each widget renders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldInputs(BTreeMap<String, Option<String>>);

impl FieldInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: Option<String>) {
        self.0.insert(name.into(), value);
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, Some(value.into()));
        self
    }

    /// Value of the widget bound to `name`; an unbound widget reads as null.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(|value| value.as_deref())
    }
}

/// Outgoing field set for a single submission attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowFields(BTreeMap<String, Option<String>>);

impl RowFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(|value| value.as_deref())
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: Option<String>) {
        self.0.insert(name.into(), value);
    }

    pub fn set_value(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.set(name, Some(value.into()));
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_value(name, value);
        self
    }

    /// Overlays `other`, replacing any keys both sets share.
    pub fn merge(&mut self, other: RowFields) {
        self.0.extend(other.0);
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<String, Option<String>> {
        self.0
    }
}

impl FromIterator<(String, Option<String>)> for RowFields {
    fn from_iter<T: IntoIterator<Item = (String, Option<String>)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Open opportunity the operator can attach the row to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpportunityCandidate {
    #[serde(rename = "Id")]
    pub id: RecordRef,
    #[serde(rename = "applyPayment", default)]
    pub apply_as_new_payment: bool,
}

/// Unpaid payment the operator can attach the row to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentCandidate {
    #[serde(rename = "Id")]
    pub id: RecordRef,
    #[serde(rename = "npe01__Opportunity__c")]
    pub parent_opportunity_id: RecordRef,
}

/// Existing record a row may be reconciled against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DonationCandidate {
    Opportunity(OpportunityCandidate),
    Payment(PaymentCandidate),
}

impl DonationCandidate {
    pub fn id(&self) -> &RecordRef {
        match self {
            DonationCandidate::Opportunity(candidate) => &candidate.id,
            DonationCandidate::Payment(candidate) => &candidate.id,
        }
    }

    /// A candidate missing any identifier it would stamp cannot be linked.
    pub fn is_linkable(&self) -> bool {
        match self {
            DonationCandidate::Opportunity(candidate) => !candidate.id.is_blank(),
            DonationCandidate::Payment(candidate) => {
                !candidate.id.is_blank() && !candidate.parent_opportunity_id.is_blank()
            }
        }
    }
}

impl From<OpportunityCandidate> for DonationCandidate {
    fn from(value: OpportunityCandidate) -> Self {
        Self::Opportunity(value)
    }
}

impl From<PaymentCandidate> for DonationCandidate {
    fn from(value: PaymentCandidate) -> Self {
        Self::Payment(value)
    }
}

/// Candidate lists returned for a donor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenDonations {
    #[serde(default)]
    pub open_opportunities: Vec<OpportunityCandidate>,
    #[serde(default)]
    pub unpaid_payments: Vec<PaymentCandidate>,
}

impl OpenDonations {
    /// Parse the payload shape the host's open-donations query returns.
    pub fn from_json(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }

    pub fn is_empty(&self) -> bool {
        self.open_opportunities.is_empty() && self.unpaid_payments.is_empty()
    }
}

/// State owned by one entry form for as long as it stays open.
#[derive(Debug, Clone)]
pub struct FormSession {
    pub batch_id: RecordRef,
    pub donor_type: DonorType,
    pub fields: Vec<FieldDescriptor>,
    pub inputs: FieldInputs,
    pub donation: DonationSelection,
}

impl FormSession {
    pub fn new(batch_id: RecordRef, donor_type: DonorType, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            batch_id,
            donor_type,
            fields,
            inputs: FieldInputs::new(),
            donation: DonationSelection::default(),
        }
    }
}
