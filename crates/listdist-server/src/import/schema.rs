//! Batch schema validation
//!
//! Validation is all-or-nothing: a single record without a usable `firstname`, `phone` or
//! `notes` value rejects the whole batch.

use super::error::SchemaError;
use super::record::{CellValue, NormalizedRecord, NumberedRecord, ValidatedRecord};

pub const FIRST_NAME: &str = "firstname";
pub const PHONE: &str = "phone";
pub const NOTES: &str = "notes";

/// Canonical names every record must carry, in reporting order
pub const REQUIRED_FIELDS: [&str; 3] = [FIRST_NAME, PHONE, NOTES];

/// Validate a batch, reporting failures against each record's source row
pub fn validate(records: Vec<NumberedRecord>) -> Result<Vec<ValidatedRecord>, SchemaError> {
    let mut failed = [false; REQUIRED_FIELDS.len()];
    let mut first_invalid_row = None;

    for record in &records {
        for (slot, field) in REQUIRED_FIELDS.iter().enumerate() {
            if field_value(&record.fields, field).is_none() {
                failed[slot] = true;
                first_invalid_row.get_or_insert(record.row);
            }
        }
    }

    if let Some(first_invalid_row) = first_invalid_row {
        let missing = REQUIRED_FIELDS
            .iter()
            .zip(failed)
            .filter(|(_, failed)| *failed)
            .map(|(field, _)| field.to_string())
            .collect();

        tracing::debug!(
            records = records.len(),
            first_invalid_row,
            "Batch rejected by schema validation"
        );

        return Err(SchemaError {
            missing,
            first_invalid_row,
        });
    }

    Ok(records.iter().map(|record| to_validated(&record.fields)).collect())
}

fn field_value<'a>(record: &'a NormalizedRecord, field: &str) -> Option<&'a CellValue> {
    record.get(field).filter(|value| !value.is_blank())
}

fn to_validated(record: &NormalizedRecord) -> ValidatedRecord {
    let render = |field: &str| field_value(record, field).map(CellValue::render).unwrap_or_default();

    ValidatedRecord {
        first_name: render(FIRST_NAME),
        phone: render(PHONE),
        notes: render(NOTES),
    }
}
