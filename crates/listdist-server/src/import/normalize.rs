//! Header canonicalization
//!
//! Field names are trimmed and lower-cased so `FirstName`, ` firstname ` and `FIRSTNAME` all
//! address the same column. When two raw keys collapse onto one canonical key the later key in
//! the record wins; this is a fold with overwrite, not an error.

use super::record::{NormalizedRecord, NumberedRecord, RawRecord};

/// Canonical form of a header: whitespace (and a stray byte-order mark) trimmed, lower-cased
pub fn canonical_key(key: &str) -> String {
    key.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
        .to_lowercase()
}

pub fn normalize(raw: RawRecord) -> NormalizedRecord {
    raw.into_iter()
        .fold(NormalizedRecord::new(), |mut record, (key, value)| {
            record.insert(canonical_key(&key), value);
            record
        })
}

/// Normalize a decoded batch, keeping each record's source row
///
/// Records without a known source row are numbered by their position in the batch.
pub fn normalize_all(raw: Vec<RawRecord>) -> Vec<NumberedRecord> {
    raw.into_iter()
        .enumerate()
        .map(|(index, record)| NumberedRecord {
            row: record.row().unwrap_or(index + 1),
            fields: normalize(record),
        })
        .collect()
}
