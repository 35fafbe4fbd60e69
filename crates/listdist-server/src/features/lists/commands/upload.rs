//! Upload list command
//!
//! Imports one uploaded contact list: the file is parsed and validated in full, split
//! round-robin across the first agents of the roster, and every row is stored against its
//! agent.

use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::features::FeatureState;
use crate::import::{self, ImportError, ImportSummary, TabularFormat};

/// Confirmation message returned for a successful upload
pub const UPLOAD_SUCCESS_MESSAGE: &str = "List distributed and saved";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadListCommand {
    /// Original name of the uploaded file; its extension selects the decoder
    pub filename: String,
    #[serde(skip)]
    pub content: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadListResponse {
    pub message: String,
    #[serde(flatten)]
    pub summary: ImportSummary,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadListError {
    #[error("No file uploaded")]
    FileRequired,
    #[error("Uploaded file is empty")]
    ContentRequired,
    #[error(transparent)]
    Import(#[from] ImportError),
}

impl Request<Result<UploadListResponse, UploadListError>> for UploadListCommand {}

impl crate::cqrs::middleware::Command for UploadListCommand {}

impl UploadListCommand {
    pub fn validate(&self) -> Result<(), UploadListError> {
        if self.filename.trim().is_empty() {
            return Err(UploadListError::FileRequired);
        }
        if self.content.is_empty() {
            return Err(UploadListError::ContentRequired);
        }
        Ok(())
    }

    /// Format implied by the file extension, rejected before any parsing
    pub fn format(&self) -> Result<TabularFormat, UploadListError> {
        TabularFormat::from_filename(&self.filename)
            .map_err(|e| UploadListError::Import(e.into()))
    }
}

#[tracing::instrument(skip(state, command), fields(filename = %command.filename, bytes = command.content.len()))]
pub async fn handle(
    state: FeatureState,
    command: UploadListCommand,
) -> Result<UploadListResponse, UploadListError> {
    command.validate()?;
    let format = command.format()?;

    let summary = import::import(
        &command.content,
        format,
        state.registry.as_ref(),
        state.store.as_ref(),
        state.import.pool_size,
    )
    .await?;

    tracing::info!(
        format = %format,
        records = summary.total_records,
        pool_size = summary.pool_size,
        "Contact list distributed"
    );

    Ok(UploadListResponse {
        message: UPLOAD_SUCCESS_MESSAGE.to_string(),
        summary,
    })
}
