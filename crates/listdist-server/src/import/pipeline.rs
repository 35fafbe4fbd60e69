//! Two-phase import
//!
//! [`prepare`] parses the whole upload, reads the roster and partitions the batch before
//! anything is written. [`persist`] then writes the batch one item at a time and stops at the
//! first failure.

use listdist_common::{AgentAssignment, NewContactItem};
use serde::Serialize;
use uuid::Uuid;

use super::decoder::{decoder_for, TabularFormat};
use super::error::ImportError;
use super::normalize::normalize_all;
use super::partition::{distribute, DistributionBatch};
use super::record::ValidatedRecord;
use super::schema::validate;
use crate::store::{AssignmentStore, WorkerRegistry};

/// Outcome of a fully persisted import
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub total_records: usize,
    pub pool_size: usize,
    /// Per-agent counts in pool order
    pub assignments: Vec<AgentAssignment>,
}

impl ImportSummary {
    fn from_batch(batch: &DistributionBatch<ValidatedRecord>) -> Self {
        Self {
            total_records: batch.total_items(),
            pool_size: batch.pool_size(),
            assignments: batch
                .groups()
                .iter()
                .map(|group| AgentAssignment {
                    agent_id: group.agent_id,
                    count: group.items.len(),
                })
                .collect(),
        }
    }
}

/// Decode, normalize and validate an upload
pub fn parse(bytes: &[u8], format: TabularFormat) -> Result<Vec<ValidatedRecord>, ImportError> {
    let raw = decoder_for(format).decode(bytes)?;
    Ok(validate(normalize_all(raw))?)
}

/// Parse an upload and split it across the registry's first `pool_size` workers
///
/// The roster is read once, after the upload has validated, so a rejected file never touches
/// the registry.
pub async fn prepare(
    bytes: &[u8],
    format: TabularFormat,
    registry: &dyn WorkerRegistry,
    pool_size: usize,
) -> Result<DistributionBatch<ValidatedRecord>, ImportError> {
    let records = parse(bytes, format)?;

    let workers: Vec<Uuid> = registry
        .list_workers()
        .await
        .map_err(ImportError::Registry)?
        .into_iter()
        .map(|agent| agent.id)
        .collect();

    let batch = distribute(records, &workers, pool_size)?;
    tracing::debug!(
        records = batch.total_items(),
        pool_size = batch.pool_size(),
        available_workers = workers.len(),
        "Batch distributed"
    );

    Ok(batch)
}

/// Write every item of `batch`, groups in pool order and items in group order
///
/// There is no rollback: when a write fails the items already stored stay, and the error
/// carries how many that was.
pub async fn persist(
    batch: DistributionBatch<ValidatedRecord>,
    store: &dyn AssignmentStore,
) -> Result<ImportSummary, ImportError> {
    let summary = ImportSummary::from_batch(&batch);
    let total = summary.total_records;
    let mut persisted = 0;

    for group in batch.into_groups() {
        for record in group.items {
            let item = NewContactItem {
                first_name: record.first_name,
                phone: record.phone,
                notes: record.notes,
                agent_id: group.agent_id,
            };

            store
                .create(item)
                .await
                .map_err(|source| ImportError::Store {
                    persisted,
                    total,
                    source,
                })?;
            persisted += 1;
        }
    }

    Ok(summary)
}

/// Run a complete import: [`prepare`], then [`persist`]
pub async fn import(
    bytes: &[u8],
    format: TabularFormat,
    registry: &dyn WorkerRegistry,
    store: &dyn AssignmentStore,
    pool_size: usize,
) -> Result<ImportSummary, ImportError> {
    let batch = prepare(bytes, format, registry, pool_size).await?;
    persist(batch, store).await
}
