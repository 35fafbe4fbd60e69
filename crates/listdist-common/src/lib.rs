//! Listdist Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types and logging setup for the listdist workspace.
//!
//! # Overview
//!
//! - **Logging**: tracing subscriber initialization driven by environment variables
//! - **Types**: the persisted contact item and agent shapes shared by every component
//!
//! # Example
//!
//! ```no_run
//! use listdist_common::logging::{init_logging, LogConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = LogConfig::from_env()?;
//!     let _guard = init_logging(&config)?;
//!     tracing::info!("ready");
//!     Ok(())
//! }
//! ```

pub mod logging;
pub mod types;

pub use types::{Agent, AgentAssignment, ContactItem, NewContactItem};
