//! Edge springs pulling connected nodes toward a rest length

use crate::options::{PhysicsOptions, SpringOptions};
use crate::vector::Vector2;

use super::{ForceAccumulator, SolveContext, Solver};

/// Separation used when both endpoints coincide
const MIN_DISTANCE: f64 = 0.01;

#[derive(Debug, Clone)]
pub struct SpringSolver {
    options: SpringOptions,
}

impl SpringSolver {
    pub fn new(options: &PhysicsOptions) -> Self {
        Self {
            options: options.spring.clone(),
        }
    }
}

impl Solver for SpringSolver {
    fn name(&self) -> &'static str {
        "spring"
    }

    fn set_options(&mut self, options: &PhysicsOptions) {
        self.options = options.spring.clone();
    }

    fn solve(&mut self, ctx: &SolveContext<'_>, forces: &mut ForceAccumulator) {
        for edge in ctx.edges() {
            let (Some(from), Some(to)) = (ctx.body.node(&edge.from), ctx.body.node(&edge.to))
            else {
                continue;
            };

            let dx = from.x() - to.x();
            let dy = from.y() - to.y();
            let distance = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
            let spring = self.options.constant * (self.options.length - distance) / distance;
            let force = Vector2::new(dx * spring, dy * spring);

            // endpoints outside the simulation are dropped by the accumulator
            forces.add(&from.id, force);
            forces.add(&to.id, -force);
        }
    }
}
