//! Round-robin distribution across a fixed-size agent pool
//!
//! The item at position `i` goes to pool member `i % pool_size`. Only the first `pool_size`
//! workers of the supplied roster take part; the roster's order is used as given.

use serde::Serialize;
use uuid::Uuid;

use super::error::DistributionError;

/// Number of agents a list is split across unless configured otherwise
pub const DEFAULT_POOL_SIZE: usize = 5;

/// Items grouped per agent, in pool order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistributionBatch<T> {
    groups: Vec<AgentGroup<T>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentGroup<T> {
    pub agent_id: Uuid,
    pub items: Vec<T>,
}

impl<T> DistributionBatch<T> {
    pub fn groups(&self) -> &[AgentGroup<T>] {
        &self.groups
    }

    pub fn pool_size(&self) -> usize {
        self.groups.len()
    }

    pub fn total_items(&self) -> usize {
        self.groups.iter().map(|group| group.items.len()).sum()
    }

    pub fn into_groups(self) -> Vec<AgentGroup<T>> {
        self.groups
    }
}

/// Split `items` across the first `pool_size` entries of `workers`
///
/// Fails when fewer than `pool_size` workers are available, regardless of how many items there
/// are. A `pool_size` of zero is treated as a roster that can never be satisfied.
pub fn distribute<T>(
    items: Vec<T>,
    workers: &[Uuid],
    pool_size: usize,
) -> Result<DistributionBatch<T>, DistributionError> {
    if pool_size == 0 || workers.len() < pool_size {
        return Err(DistributionError::InsufficientWorkers {
            required: pool_size,
            available: workers.len(),
        });
    }

    let mut groups: Vec<AgentGroup<T>> = workers[..pool_size]
        .iter()
        .map(|&agent_id| AgentGroup {
            agent_id,
            items: Vec::with_capacity(items.len() / pool_size + 1),
        })
        .collect();

    for (index, item) in items.into_iter().enumerate() {
        groups[index % pool_size].items.push(item);
    }

    Ok(DistributionBatch { groups })
}
