//! listdist server library
//!
//! Imports contact lists from CSV and Excel uploads and distributes the rows round-robin
//! across a fixed pool of agents.
//!
//! # Overview
//!
//! - **Import pipeline** ([`import`]): decode, normalize headers, validate the whole batch,
//!   partition, persist
//! - **Persistence** ([`store`]): assignment store and worker registry traits with PostgreSQL
//!   and in-memory backends
//! - **API** ([`api`], [`features`]): axum routes following a command/query split
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use listdist_server::{api, config::Config, db, features::FeatureState, store::PgStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let pool = db::create_pool(&config.database).await?;
//!     let state = FeatureState::shared(Arc::new(PgStore::new(pool)), config.import);
//!     let app = api::create_router(state, &config);
//!     let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod cqrs;
pub mod db;
pub mod error;
pub mod features;
pub mod import;
pub mod middleware;
pub mod store;

pub use error::AppError;
