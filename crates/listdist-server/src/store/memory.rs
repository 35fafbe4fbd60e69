//! In-process store used by tests and local experiments

use async_trait::async_trait;
use chrono::{Duration, Utc};
use listdist_common::{Agent, ContactItem, NewContactItem};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{AssignmentStore, StoreError, WorkerRegistry};

#[derive(Debug, Default)]
pub struct MemoryStore {
    agents: Mutex<Vec<Agent>>,
    items: Mutex<Vec<ContactItem>>,
    /// Remaining successful writes before `create` starts failing
    write_budget: Mutex<Option<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with `count` agents named "Agent 1".."Agent N"
    pub async fn with_agents(count: usize) -> Self {
        let store = Self::new();
        for n in 1..=count {
            store
                .register_agent(&format!("Agent {}", n), &format!("agent{}@example.com", n))
                .await;
        }
        store
    }

    /// Add an agent; registration order is roster order
    pub async fn register_agent(&self, name: &str, email: &str) -> Agent {
        let mut agents = self.agents.lock().await;
        let created_at = Utc::now() + Duration::milliseconds(agents.len() as i64);
        let agent = Agent {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            mobile: None,
            created_at,
        };
        agents.push(agent.clone());
        agent
    }

    /// Allow `writes` more successful creates, then fail every following one
    pub async fn fail_after(&self, writes: usize) {
        *self.write_budget.lock().await = Some(writes);
    }

    pub async fn items(&self) -> Vec<ContactItem> {
        self.items.lock().await.clone()
    }

    pub async fn item_count(&self) -> usize {
        self.items.lock().await.len()
    }
}

#[async_trait]
impl AssignmentStore for MemoryStore {
    async fn create(&self, item: NewContactItem) -> Result<ContactItem, StoreError> {
        if let Some(remaining) = self.write_budget.lock().await.as_mut() {
            if *remaining == 0 {
                return Err(StoreError::Unavailable(
                    "write rejected by memory store".to_string(),
                ));
            }
            *remaining -= 1;
        }

        let item = item.into_item(Utc::now());
        self.items.lock().await.push(item.clone());
        Ok(item)
    }

    async fn find_by_worker(&self, agent_id: Uuid) -> Result<Vec<ContactItem>, StoreError> {
        Ok(self
            .items
            .lock()
            .await
            .iter()
            .filter(|item| item.agent_id == agent_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl WorkerRegistry for MemoryStore {
    async fn list_workers(&self) -> Result<Vec<Agent>, StoreError> {
        Ok(self.agents.lock().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_item(agent_id: Uuid, name: &str) -> NewContactItem {
        NewContactItem {
            first_name: name.to_string(),
            phone: "555".to_string(),
            notes: "note".to_string(),
            agent_id,
        }
    }

    #[tokio::test]
    async fn test_roster_keeps_registration_order() {
        let store = MemoryStore::with_agents(3).await;
        let agents = store.list_workers().await.unwrap();

        let names: Vec<_> = agents.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Agent 1", "Agent 2", "Agent 3"]);
        assert!(agents.windows(2).all(|w| w[0].created_at < w[1].created_at));
    }

    #[tokio::test]
    async fn test_find_by_worker_filters_and_keeps_order() {
        let store = MemoryStore::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        store.create(new_item(a, "first")).await.unwrap();
        store.create(new_item(b, "other")).await.unwrap();
        store.create(new_item(a, "second")).await.unwrap();

        let names: Vec<_> = store
            .find_by_worker(a)
            .await
            .unwrap()
            .into_iter()
            .map(|item| item.first_name)
            .collect();
        assert_eq!(names, vec!["first", "second"]);
        assert!(store.find_by_worker(Uuid::new_v4()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fail_after_rejects_later_writes() {
        let store = MemoryStore::new();
        let agent = Uuid::new_v4();
        store.fail_after(1).await;

        assert!(store.create(new_item(agent, "ok")).await.is_ok());
        assert!(matches!(
            store.create(new_item(agent, "rejected")).await,
            Err(StoreError::Unavailable(_))
        ));
        assert_eq!(store.item_count().await, 1);
    }
}
