//! settle - A pluggable force-solver engine for interactive node-link diagram layout.
//!
//! Each tick a [`Simulation`] sums the contributions of independent
//! [`physics::Solver`]s (viewport containment, pointer drag, repulsion, springs,
//! central gravity) and integrates them into node positions.

pub mod easing;
pub mod events;
pub mod graph;
pub mod io;
pub mod options;
pub mod physics;
pub mod shape;
pub mod simulation;
pub mod vector;
pub mod viewport;

pub use events::{EventKind, PointerEvent, ScriptedEvent};
pub use graph::{Body, GraphData, Node, NodeId};
pub use options::PhysicsOptions;
pub use simulation::{NodePosition, Simulation};
pub use vector::Vector2;
pub use viewport::{Canvas, Viewport};
