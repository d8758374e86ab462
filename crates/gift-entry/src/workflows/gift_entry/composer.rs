use super::classifier::classify_fields;
use super::config::GiftEntryConfig;
use super::domain::{FormSession, RowFields};

/// Builds the outgoing row on top of whatever the caller already harvested.
///
/// Hidden fields are injected first, then choice-list widget values, then the
/// selection-derived lookup and status fields, so later layers win on conflicts.
pub fn compose_row(raw: RowFields, session: &FormSession, config: &GiftEntryConfig) -> RowFields {
    let fields = &config.fields;
    let mut row = raw;

    row.set_value(&fields.batch_id, session.batch_id.as_str());
    row.set_value(&fields.donation_donor, session.donor_type.as_str());

    for descriptor in session.fields.iter().filter(|field| field.is_choice()) {
        let value = session.inputs.value(&descriptor.name).map(str::to_string);
        row.set(descriptor.name.clone(), value);
    }

    row.merge(classify_fields(session.donation.selection(), config));
    row
}
