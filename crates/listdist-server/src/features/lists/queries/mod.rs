pub mod agent_items;

pub use agent_items::{GetAgentListError, GetAgentListQuery};
