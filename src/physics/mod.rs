//! Pluggable force solvers
//!
//! Every tick the driver zeroes a [`ForceAccumulator`], hands it to each
//! registered [`Solver`] in turn, then integrates the sum. Solvers read node
//! positions through a [`SolveContext`] and may only add to the accumulator,
//! so contributions compose regardless of order.

pub mod boundary;
pub mod drag;
pub mod forces;
pub mod gravity;
pub mod random;
pub mod repulsion;
pub mod spring;

pub use boundary::BoundarySolver;
pub use drag::{DragInteractionState, DragSolver};
pub use forces::{ForceAccumulator, VelocityStore};
pub use gravity::CentralGravitySolver;
pub use random::{RandomStream, SeededStream, SequenceStream};
pub use repulsion::RepulsionSolver;
pub use spring::SpringSolver;

use crate::events::PointerEvent;
use crate::graph::{Body, Edge, EdgeId, Node, NodeId};
use crate::options::PhysicsOptions;
use crate::viewport::Viewport;

/// A single additive force term
pub trait Solver {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Replace this solver's configuration; used from the next `solve` on
    fn set_options(&mut self, options: &PhysicsOptions);

    /// Add this solver's contribution for every simulated node
    ///
    /// Must not assume anything about what other solvers have added this tick,
    /// and must be a no-op for an empty node set.
    fn solve(&mut self, ctx: &SolveContext<'_>, forces: &mut ForceAccumulator);

    /// React to a pointer event. Most solvers ignore them.
    fn handle_event(&mut self, _event: &PointerEvent) {}
}

/// Read-only view of the simulation handed to solvers
#[derive(Clone, Copy)]
pub struct SolveContext<'a> {
    pub body: &'a Body,
    pub node_indices: &'a [NodeId],
    pub edge_indices: &'a [EdgeId],
    pub velocities: &'a VelocityStore,
    pub viewport: &'a dyn Viewport,
}

impl<'a> SolveContext<'a> {
    /// Simulated nodes, in index order
    pub fn nodes(&self) -> impl Iterator<Item = &'a Node> + 'a {
        let body = self.body;
        self.node_indices.iter().filter_map(move |id| body.node(id))
    }

    /// Simulated edges, in index order
    pub fn edges(&self) -> impl Iterator<Item = &'a Edge> + 'a {
        let body = self.body;
        self.edge_indices.iter().filter_map(move |id| body.edge(id))
    }
}

/// Driver-owned physics state
///
/// The index lists are rebuilt whenever the simulated set changes; solvers
/// must not cache them between ticks.
#[derive(Debug, Clone, Default)]
pub struct PhysicsBody {
    pub node_indices: Vec<NodeId>,
    pub edge_indices: Vec<EdgeId>,
    pub forces: ForceAccumulator,
    pub velocities: VelocityStore,
}

impl PhysicsBody {
    pub fn new() -> Self {
        Self::default()
    }
}
