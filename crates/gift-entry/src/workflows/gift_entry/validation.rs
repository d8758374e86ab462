use serde::Serialize;

use super::config::GiftEntryConfig;
use super::domain::{is_canonical_id, DonorType, FormSession, RecordRef, RowFields};

/// Result of checking a composed row before it is handed to the import pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowValidity {
    pub valid: bool,
    pub missing_fields: Vec<String>,
}

impl RowValidity {
    fn from_missing(missing_fields: Vec<String>) -> Self {
        Self {
            valid: missing_fields.is_empty(),
            missing_fields,
        }
    }
}

/// Donor identifier on the row, if it is present in canonical form.
pub fn donor_reference(
    row: &RowFields,
    donor_type: DonorType,
    config: &GiftEntryConfig,
) -> Option<RecordRef> {
    row.get(config.fields.donor_lookup(donor_type))
        .filter(|value| is_canonical_id(value))
        .map(RecordRef::from)
}

/// Labels of required fields whose widget holds null or the empty string.
///
/// Any other value, `"0"` and whitespace included, counts as present.
pub fn missing_required_fields(session: &FormSession) -> Vec<String> {
    session
        .fields
        .iter()
        .filter(|descriptor| descriptor.required)
        .filter(|descriptor| {
            matches!(session.inputs.value(&descriptor.name), None | Some(""))
        })
        .map(|descriptor| descriptor.label.clone())
        .collect()
}

/// Donor label first (when the donor is missing), then required fields in descriptor order.
pub fn validate_row(
    row: &RowFields,
    session: &FormSession,
    config: &GiftEntryConfig,
) -> RowValidity {
    let mut missing_fields = Vec::new();

    if donor_reference(row, session.donor_type, config).is_none() {
        missing_fields.push(config.messages.donor_label(session.donor_type).to_string());
    }

    missing_fields.extend(missing_required_fields(session));

    RowValidity::from_missing(missing_fields)
}
