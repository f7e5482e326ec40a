//! Central gravity toward the origin

use crate::options::{CentralGravityOptions, PhysicsOptions};
use crate::vector::Vector2;

use super::{ForceAccumulator, SolveContext, Solver};

#[derive(Debug, Clone)]
pub struct CentralGravitySolver {
    options: CentralGravityOptions,
}

impl CentralGravitySolver {
    pub fn new(options: &PhysicsOptions) -> Self {
        Self {
            options: options.central_gravity.clone(),
        }
    }
}

impl Solver for CentralGravitySolver {
    fn name(&self) -> &'static str {
        "central_gravity"
    }

    fn set_options(&mut self, options: &PhysicsOptions) {
        self.options = options.central_gravity.clone();
    }

    fn solve(&mut self, ctx: &SolveContext<'_>, forces: &mut ForceAccumulator) {
        for node in ctx.nodes() {
            let (dx, dy) = (-node.x(), -node.y());
            let distance = (dx * dx + dy * dy).sqrt();
            if distance == 0.0 {
                continue;
            }
            let gravity = self.options.strength / distance;
            forces.add(&node.id, Vector2::new(dx * gravity, dy * gravity));
        }
    }
}
