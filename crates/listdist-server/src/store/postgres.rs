//! PostgreSQL-backed assignment store and worker registry

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use listdist_common::{Agent, ContactItem, NewContactItem};
use sqlx::PgPool;
use uuid::Uuid;

use super::{AssignmentStore, StoreError, WorkerRegistry};

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AgentRow {
    id: Uuid,
    name: String,
    email: String,
    mobile: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<AgentRow> for Agent {
    fn from(row: AgentRow) -> Self {
        Agent {
            id: row.id,
            name: row.name,
            email: row.email,
            mobile: row.mobile,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ListItemRow {
    id: Uuid,
    first_name: String,
    phone: String,
    notes: String,
    agent_id: Uuid,
    created_at: DateTime<Utc>,
}

impl From<ListItemRow> for ContactItem {
    fn from(row: ListItemRow) -> Self {
        ContactItem {
            id: row.id,
            first_name: row.first_name,
            phone: row.phone,
            notes: row.notes,
            agent_id: row.agent_id,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl AssignmentStore for PgStore {
    async fn create(&self, item: NewContactItem) -> Result<ContactItem, StoreError> {
        let row = sqlx::query_as::<_, ListItemRow>(
            r#"
            INSERT INTO list_items (id, first_name, phone, notes, agent_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, first_name, phone, notes, agent_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&item.first_name)
        .bind(&item.phone)
        .bind(&item.notes)
        .bind(item.agent_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn find_by_worker(&self, agent_id: Uuid) -> Result<Vec<ContactItem>, StoreError> {
        let rows = sqlx::query_as::<_, ListItemRow>(
            r#"
            SELECT id, first_name, phone, notes, agent_id, created_at
            FROM list_items
            WHERE agent_id = $1
            ORDER BY seq
            "#,
        )
        .bind(agent_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ContactItem::from).collect())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl WorkerRegistry for PgStore {
    async fn list_workers(&self) -> Result<Vec<Agent>, StoreError> {
        let rows = sqlx::query_as::<_, AgentRow>(
            r#"
            SELECT id, name, email, mobile, created_at
            FROM agents
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Agent::from).collect())
    }
}
