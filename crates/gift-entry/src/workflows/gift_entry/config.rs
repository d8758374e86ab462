use serde::{Deserialize, Serialize};

use super::domain::DonorType;

pub const DEFAULT_NAMESPACE: &str = "npsp";

/// Data import field names the entry form stamps onto each row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportFieldNames {
    pub batch_id: String,
    pub donation_donor: String,
    pub contact_lookup: String,
    pub account_lookup: String,
    pub opportunity_lookup: String,
    pub opportunity_status: String,
    pub payment_lookup: String,
    pub payment_status: String,
}

impl ImportFieldNames {
    /// Builds the field names for a managed-package namespace; empty means unprefixed.
    pub fn with_namespace(namespace: &str) -> Self {
        let namespace = namespace.trim().trim_end_matches('_');
        let field = |name: &str| {
            if namespace.is_empty() {
                name.to_string()
            } else {
                format!("{namespace}__{name}")
            }
        };

        Self {
            batch_id: field("NPSP_Data_Import_Batch__c"),
            donation_donor: field("Donation_Donor__c"),
            contact_lookup: field("Contact1Imported__c"),
            account_lookup: field("Account1Imported__c"),
            opportunity_lookup: field("DonationImported__c"),
            opportunity_status: field("DonationImportStatus__c"),
            payment_lookup: field("PaymentImported__c"),
            payment_status: field("PaymentImportStatus__c"),
        }
    }

    /// Lookup field that carries the donor for the given donor type.
    pub fn donor_lookup(&self, donor_type: DonorType) -> &str {
        match donor_type {
            DonorType::Contact => &self.contact_lookup,
            DonorType::Account => &self.account_lookup,
        }
    }
}

impl Default for ImportFieldNames {
    fn default() -> Self {
        Self::with_namespace(DEFAULT_NAMESPACE)
    }
}

/// Display strings supplied by the host, keyed by purpose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageCatalog {
    pub error_title: String,
    pub unknown_error: String,
    pub required_field_prefix: String,
    pub matched_by_user: String,
    pub matched_by_user_new_opportunity: String,
    pub matched_apply_new_payment: String,
    pub contact_label: String,
    pub account_label: String,
}

impl MessageCatalog {
    pub fn from_json(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }

    pub fn donor_label(&self, donor_type: DonorType) -> &str {
        match donor_type {
            DonorType::Contact => &self.contact_label,
            DonorType::Account => &self.account_label,
        }
    }

    /// Renders the toast body listing every missing field.
    pub fn required_fields_message(&self, missing_fields: &[String]) -> String {
        format!(
            "{} {}.",
            self.required_field_prefix,
            missing_fields.join(", ")
        )
    }
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self {
            error_title: "Error".to_string(),
            unknown_error: "An unknown error occurred.".to_string(),
            required_field_prefix: "The following fields are required:".to_string(),
            matched_by_user: "matched-by-user".to_string(),
            matched_by_user_new_opportunity: "matched-by-user: new opportunity".to_string(),
            matched_apply_new_payment: "matched-by-user: apply as new payment".to_string(),
            contact_label: "Contact".to_string(),
            account_label: "Account".to_string(),
        }
    }
}

/// Field names and display strings shared by the composer, classifier, and validator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftEntryConfig {
    #[serde(default)]
    pub fields: ImportFieldNames,
    #[serde(default)]
    pub messages: MessageCatalog,
}
