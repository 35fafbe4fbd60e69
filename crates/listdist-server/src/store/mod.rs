//! Assignment store and worker registry
//!
//! The import pipeline talks to persistence only through these two traits:
//!
//! - [`AssignmentStore`]: append-only writes of assigned contact items and the per-agent read path
//! - [`WorkerRegistry`]: the ordered agent roster a distribution pass draws its pool from
//!
//! [`PgStore`] backs both with PostgreSQL; [`MemoryStore`] keeps everything in process and is
//! what the test suites run against.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use listdist_common::{Agent, ContactItem, NewContactItem};
use thiserror::Error;
use uuid::Uuid;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Durable home of assigned contact items
#[async_trait]
pub trait AssignmentStore: Send + Sync {
    /// Persist one item; every call creates a new row
    async fn create(&self, item: NewContactItem) -> Result<ContactItem, StoreError>;

    /// Items assigned to `agent_id`, in insertion order
    async fn find_by_worker(&self, agent_id: Uuid) -> Result<Vec<ContactItem>, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Read-only view of the agent roster
#[async_trait]
pub trait WorkerRegistry: Send + Sync {
    /// All known agents, oldest first (ties broken by id) so "the first N" is reproducible
    async fn list_workers(&self) -> Result<Vec<Agent>, StoreError>;
}
