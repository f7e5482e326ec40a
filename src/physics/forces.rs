//! Per-tick force accumulation and persistent velocities

use std::collections::HashMap;

use tracing::trace;

use crate::graph::NodeId;
use crate::vector::Vector2;

/// Net force per simulated node for the current tick
///
/// Solvers can only add to an entry. Clearing belongs to the driver, which
/// resets the accumulator before the first solver runs and integrates it after
/// the last one.
#[derive(Debug, Clone, Default)]
pub struct ForceAccumulator {
    forces: HashMap<NodeId, Vector2>,
}

impl ForceAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every entry and start each given node at zero
    pub fn reset<'a>(&mut self, ids: impl IntoIterator<Item = &'a NodeId>) {
        self.forces.clear();
        for id in ids {
            self.forces.insert(id.clone(), Vector2::ZERO);
        }
    }

    /// Add a contribution to a node's force
    ///
    /// Nodes that are not under simulation this tick have no entry and the
    /// contribution is dropped.
    pub fn add(&mut self, id: &NodeId, force: Vector2) {
        match self.forces.get_mut(id) {
            Some(total) => *total += force,
            None => trace!(node = %id, "dropping force for node outside simulation"),
        }
    }

    /// Accumulated force, zero for unknown nodes
    pub fn get(&self, id: &NodeId) -> Vector2 {
        self.forces.get(id).copied().unwrap_or_default()
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.forces.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.forces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forces.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &Vector2)> {
        self.forces.iter()
    }
}

/// Velocity per node, kept across ticks
#[derive(Debug, Clone, Default)]
pub struct VelocityStore {
    velocities: HashMap<NodeId, Vector2>,
}

impl VelocityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &NodeId) -> Vector2 {
        self.velocities.get(id).copied().unwrap_or_default()
    }

    pub fn set(&mut self, id: &NodeId, velocity: Vector2) {
        self.velocities.insert(id.clone(), velocity);
    }

    /// Keep existing velocities for the given nodes, zero new ones, drop the rest
    pub fn resize<'a>(&mut self, ids: impl IntoIterator<Item = &'a NodeId>) {
        let mut next = HashMap::new();
        for id in ids {
            let velocity = self.get(id);
            next.insert(id.clone(), velocity);
        }
        self.velocities = next;
    }

    pub fn len(&self) -> usize {
        self.velocities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.velocities.is_empty()
    }
}
