//! Record shapes flowing through the import pipeline

use serde::Serialize;
use std::collections::BTreeMap;

/// A scalar cell value as produced by a decoder
///
/// Delimited text only ever yields [`CellValue::Text`]; spreadsheet decoders keep the cell's
/// native type so numeric phone numbers survive until they are rendered.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Empty,
}

impl CellValue {
    /// Whether the value counts as "not provided"
    ///
    /// Empty text, zero, NaN, `false` and empty cells are all treated as missing.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Text(s) => s.is_empty(),
            CellValue::Int(i) => *i == 0,
            CellValue::Float(f) => *f == 0.0 || f.is_nan(),
            CellValue::Bool(b) => !b,
            CellValue::Empty => true,
        }
    }

    /// Render the value as the string that gets persisted
    ///
    /// Integral floats print without a fractional part, so a spreadsheet cell holding
    /// `9876543210.0` becomes `"9876543210"`.
    pub fn render(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Int(i) => i.to_string(),
            CellValue::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
                format!("{:.0}", f)
            },
            CellValue::Float(f) => f.to_string(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Empty => String::new(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

/// One decoded row, keyed by the header text exactly as it appeared in the file
///
/// Field order is the header's positional order; the same key may appear more than once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: Vec<(String, CellValue)>,
    row: Option<usize>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag the record with its 1-based data row in the source file (header excluded)
    pub fn at_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    /// Data row in the source file, when the decoder knows it
    ///
    /// Decoders skip blank rows, so this can run ahead of the record's index in the batch.
    pub fn row(&self) -> Option<usize> {
        self.row
    }

    pub fn push(&mut self, key: impl Into<String>, value: CellValue) {
        self.fields.push((key.into(), value));
    }

    pub fn fields(&self) -> &[(String, CellValue)] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl IntoIterator for RawRecord {
    type Item = (String, CellValue);
    type IntoIter = std::vec::IntoIter<(String, CellValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl<K: Into<String>> FromIterator<(K, CellValue)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, CellValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            row: None,
        }
    }
}

/// A row keyed by canonical (trimmed, lower-cased) field names
pub type NormalizedRecord = BTreeMap<String, CellValue>;

/// A normalized record with the data row it came from
#[derive(Debug, Clone, PartialEq)]
pub struct NumberedRecord {
    /// 1-based data row in the uploaded file, header excluded
    pub row: usize,
    pub fields: NormalizedRecord,
}

/// A row that carries every required field, already rendered to strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedRecord {
    pub first_name: String,
    pub phone: String,
    pub notes: String,
}
