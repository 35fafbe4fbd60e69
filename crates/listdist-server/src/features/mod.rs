//! Feature slices of the listdist API
//!
//! - **lists**: upload a contact list for distribution, read one agent's assigned items
//!
//! Each slice keeps `commands/` (writes), `queries/` (reads) and `routes.rs` (HTTP wiring).
//! Commands and queries declare their result type through `mediator::Request`.

pub mod lists;

use axum::Router;
use std::sync::Arc;

use crate::config::ImportConfig;
use crate::store::{AssignmentStore, WorkerRegistry};

/// Shared state for all feature routes
#[derive(Clone)]
pub struct FeatureState {
    /// Where assigned items are written and read back
    pub store: Arc<dyn AssignmentStore>,
    /// Source of the agent roster
    pub registry: Arc<dyn WorkerRegistry>,
    pub import: ImportConfig,
}

impl FeatureState {
    /// State backed by one value acting as both store and registry
    pub fn shared<S>(backend: Arc<S>, import: ImportConfig) -> Self
    where
        S: AssignmentStore + WorkerRegistry + 'static,
    {
        Self {
            store: backend.clone(),
            registry: backend,
            import,
        }
    }
}

/// Creates the API router with every feature mounted under its own prefix
///
/// - `/lists` - contact list upload and per-agent lookup
pub fn router(state: FeatureState) -> Router<()> {
    Router::new().nest("/lists", lists::lists_routes().with_state(state))
}
