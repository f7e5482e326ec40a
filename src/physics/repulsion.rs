//! Pairwise node repulsion
//!
//! Nodes closer than twice the configured node distance push each other
//! apart. The falloff is linear: full strength below half the node distance,
//! fading to nothing at twice the node distance.

use crate::options::{PhysicsOptions, RepulsionOptions};
use crate::vector::Vector2;

use super::random::{RandomStream, SeededStream};
use super::{ForceAccumulator, SolveContext, Solver};

pub const REPULSION_SEED: &str = "REPULSION SOLVER";

#[derive(Debug)]
pub struct RepulsionSolver {
    options: RepulsionOptions,
    rng: Box<dyn RandomStream>,
}

impl RepulsionSolver {
    pub fn new(options: &PhysicsOptions) -> Self {
        Self::with_stream(options, Box::new(SeededStream::new(REPULSION_SEED)))
    }

    pub fn with_stream(options: &PhysicsOptions, rng: Box<dyn RandomStream>) -> Self {
        Self {
            options: options.repulsion.clone(),
            rng,
        }
    }

    /// Force magnitude per unit of separation at `distance`, zero when out of range
    fn strength_at(&self, distance: f64) -> f64 {
        let node_distance = self.options.node_distance;
        if distance >= 2.0 * node_distance {
            return 0.0;
        }
        let a = -2.0 / (3.0 * node_distance);
        let b = 4.0 / 3.0;
        let force = if distance < 0.5 * node_distance {
            1.0
        } else {
            a * distance + b
        };
        self.options.strength * force / distance
    }
}

impl Solver for RepulsionSolver {
    fn name(&self) -> &'static str {
        "repulsion"
    }

    fn set_options(&mut self, options: &PhysicsOptions) {
        self.options = options.repulsion.clone();
    }

    fn solve(&mut self, ctx: &SolveContext<'_>, forces: &mut ForceAccumulator) {
        let nodes: Vec<_> = ctx.nodes().collect();

        for i in 0..nodes.len() {
            for j in (i + 1)..nodes.len() {
                let (first, second) = (nodes[i], nodes[j]);
                let mut dx = second.x() - first.x();
                let dy = second.y() - first.y();
                let mut distance = (dx * dx + dy * dy).sqrt();

                if distance == 0.0 {
                    distance = 0.1 * self.rng.next_f64();
                    dx = distance;
                    if distance == 0.0 {
                        continue;
                    }
                }

                let strength = self.strength_at(distance);
                if strength == 0.0 {
                    continue;
                }
                let force = Vector2::new(dx * strength, dy * strength);
                forces.add(&first.id, -force);
                forces.add(&second.id, force);
            }
        }
    }
}
