//! Error taxonomy for list imports
//!
//! Everything except [`ImportError::Store`] is raised before the first write, so those
//! failures guarantee nothing was imported.

use thiserror::Error;

use super::decoder::TabularFormat;
use crate::store::StoreError;

/// Failures while turning an uploaded buffer into raw records
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Unsupported file type '{extension}': only csv, xlsx and xls files are allowed")]
    UnsupportedFormat { extension: String },

    #[error("File could not be read as {format}: {reason}")]
    MalformedInput {
        format: TabularFormat,
        reason: String,
    },
}

impl DecodeError {
    pub fn malformed(format: TabularFormat, reason: impl std::fmt::Display) -> Self {
        Self::MalformedInput {
            format,
            reason: reason.to_string(),
        }
    }
}

/// The batch lacks required columns in at least one record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Invalid file format. Required columns: FirstName, Phone, Notes (missing or empty: {}; first failing row: {first_invalid_row})",
    .missing.join(", ")
)]
pub struct SchemaError {
    /// Canonical names of required columns absent or empty in at least one record
    pub missing: Vec<String>,
    /// 1-based data row (header excluded) of the first failing record
    pub first_invalid_row: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DistributionError {
    #[error("At least {required} agents are required to distribute lists, found {available}")]
    InsufficientWorkers { required: usize, available: usize },
}

/// Top-level failure of one import call
#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Distribution(#[from] DistributionError),

    #[error("Could not load the agent roster: {0}")]
    Registry(#[source] StoreError),

    #[error("Import incomplete: {persisted} of {total} items were saved before a write failed: {source}")]
    Store {
        persisted: usize,
        total: usize,
        #[source]
        source: StoreError,
    },
}

impl ImportError {
    /// Whether some items may already have been written
    pub fn is_partial(&self) -> bool {
        matches!(self, ImportError::Store { persisted, .. } if *persisted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_message_names_required_columns() {
        let err = SchemaError {
            missing: vec!["notes".to_string()],
            first_invalid_row: 11,
        };
        let message = err.to_string();
        assert!(message.contains("Required columns: FirstName, Phone, Notes"));
        assert!(message.contains("missing or empty: notes"));
        assert!(message.contains("row: 11"));
    }

    #[test]
    fn test_insufficient_workers_message() {
        let err = DistributionError::InsufficientWorkers {
            required: 5,
            available: 4,
        };
        assert_eq!(
            err.to_string(),
            "At least 5 agents are required to distribute lists, found 4"
        );
    }

    #[test]
    fn test_partial_only_for_store_failures_after_writes() {
        let none_written = ImportError::Store {
            persisted: 0,
            total: 3,
            source: StoreError::Unavailable("down".to_string()),
        };
        let some_written = ImportError::Store {
            persisted: 2,
            total: 3,
            source: StoreError::Unavailable("down".to_string()),
        };
        assert!(!none_written.is_partial());
        assert!(some_written.is_partial());
        assert!(!ImportError::from(DecodeError::UnsupportedFormat {
            extension: "txt".to_string()
        })
        .is_partial());
    }
}
