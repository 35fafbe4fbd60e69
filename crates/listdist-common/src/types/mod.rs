//! Domain types shared across listdist components

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A worker that imported contacts are assigned to
///
/// Agents are owned by the worker registry; the import pipeline only reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A contact row that has been assigned to an agent and persisted
///
/// The serialized field names (`firstName`, `phone`, `notes`, `agentId`) are the contract
/// other consumers of the assignment store rely on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactItem {
    pub id: Uuid,
    pub first_name: String,
    pub phone: String,
    pub notes: String,
    pub agent_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A contact item that is about to be written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContactItem {
    pub first_name: String,
    pub phone: String,
    pub notes: String,
    pub agent_id: Uuid,
}

impl NewContactItem {
    /// Materialize the item with a fresh id and the given creation time
    pub fn into_item(self, created_at: DateTime<Utc>) -> ContactItem {
        ContactItem {
            id: Uuid::new_v4(),
            first_name: self.first_name,
            phone: self.phone,
            notes: self.notes,
            agent_id: self.agent_id,
            created_at,
        }
    }
}

/// How many items one agent received from a single import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentAssignment {
    pub agent_id: Uuid,
    pub count: usize,
}
