//! Get agent list query
//!
//! Returns every contact item assigned to one agent, oldest first.

use listdist_common::ContactItem;
use mediator::Request;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::{AssignmentStore, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetAgentListQuery {
    pub agent_id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GetAgentListError {
    #[error("Agent id must be a valid UUID, got '{0}'")]
    InvalidAgentId(String),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl Request<Result<Vec<ContactItem>, GetAgentListError>> for GetAgentListQuery {}

impl crate::cqrs::middleware::Query for GetAgentListQuery {}

impl GetAgentListQuery {
    pub fn validate(&self) -> Result<Uuid, GetAgentListError> {
        Uuid::parse_str(self.agent_id.trim())
            .map_err(|_| GetAgentListError::InvalidAgentId(self.agent_id.clone()))
    }
}

/// Unknown agents simply have no items
pub async fn handle(
    store: &dyn AssignmentStore,
    query: GetAgentListQuery,
) -> Result<Vec<ContactItem>, GetAgentListError> {
    let agent_id = query.validate()?;
    Ok(store.find_by_worker(agent_id).await?)
}
