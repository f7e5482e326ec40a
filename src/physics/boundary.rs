//! Vertical viewport containment
//!
//! Nodes are kept inside the band `[-H, H]`, `H` being half the live viewport
//! height, shrunk by each node's radius. A node that crosses the band edge is
//! pushed back with a force that grows with penetration. Only the y axis is
//! constrained.

use crate::options::{BoundaryOptions, PhysicsOptions, RestitutionModel};
use crate::vector::Vector2;

use super::{ForceAccumulator, SolveContext, Solver};

const LINEAR_A: f64 = 1.0;
const LINEAR_B: f64 = 4.0 / 3.0;
const INVERSE_A: f64 = 0.05;
const INVERSE_B: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct BoundarySolver {
    options: BoundaryOptions,
}

impl BoundarySolver {
    pub fn new(options: &PhysicsOptions) -> Self {
        Self {
            options: options.boundary.clone(),
        }
    }

    pub fn model(&self) -> RestitutionModel {
        self.options.model
    }

    /// Distance from the origin at which a node of `radius` starts being pushed
    pub fn threshold(&self, half_height: f64, radius: f64) -> f64 {
        match self.options.model {
            RestitutionModel::LinearQuadratic => half_height - radius,
            RestitutionModel::Inverse => half_height - self.options.margin - radius,
        }
    }

    /// Signed penetration past the band edge, `None` while inside
    ///
    /// A node sitting exactly on the edge is inside.
    pub fn penetration(&self, y: f64, half_height: f64, radius: f64) -> Option<f64> {
        let limit = self.threshold(half_height, radius);
        if y.abs() <= limit {
            return None;
        }
        Some(if y < 0.0 { y + limit } else { y - limit })
    }

    /// Restoring force for a node at height `y`
    pub fn restitution(&self, y: f64, half_height: f64, radius: f64) -> Vector2 {
        let Some(dy) = self.penetration(y, half_height, radius) else {
            return Vector2::ZERO;
        };
        let distance = dy.abs();
        let magnitude = match self.options.model {
            RestitutionModel::LinearQuadratic => LINEAR_A * distance + LINEAR_B,
            RestitutionModel::Inverse => INVERSE_A * (1.0 / distance + INVERSE_B),
        };
        Vector2::new(0.0, -dy * magnitude)
    }
}

impl Solver for BoundarySolver {
    fn name(&self) -> &'static str {
        "boundary"
    }

    fn set_options(&mut self, options: &PhysicsOptions) {
        self.options = options.boundary.clone();
    }

    fn solve(&mut self, ctx: &SolveContext<'_>, forces: &mut ForceAccumulator) {
        let half_height = ctx.viewport.client_height() / 2.0;

        for node in ctx.nodes() {
            let radius = node.distance_to_border();
            let force = self.restitution(node.y(), half_height, radius);
            if force != Vector2::ZERO {
                forces.add(&node.id, force);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::testing::Harness;

    const EPS: f64 = 1e-12;

    fn solver(model: RestitutionModel, margin: f64) -> BoundarySolver {
        let mut options = PhysicsOptions::default();
        options.boundary.model = model;
        options.boundary.margin = margin;
        BoundarySolver::new(&options)
    }

    #[test]
    fn nodes_inside_band_get_no_force() {
        // H = 100
        let mut harness = Harness::new(200.0)
            .node("center", 0.0, 0.0, 10.0)
            .node("high", 0.0, 89.0, 10.0)
            .node("low", 500.0, -89.0, 10.0);
        for model in [RestitutionModel::LinearQuadratic, RestitutionModel::Inverse] {
            let mut solver = solver(model, 0.0);
            harness.run(&mut solver);
            for id in ["center", "high", "low"] {
                assert_eq!(harness.force(id), Vector2::ZERO, "{model:?} {id}");
            }
        }
    }

    #[test]
    fn node_exactly_on_edge_is_inside() {
        let mut harness = Harness::new(200.0).node("edge", 0.0, 90.0, 10.0);
        harness.run(&mut solver(RestitutionModel::LinearQuadratic, 5.0));
        assert_eq!(harness.force("edge"), Vector2::ZERO);

        let mut harness = Harness::new(200.0).node("edge", 0.0, -85.0, 10.0);
        harness.run(&mut solver(RestitutionModel::Inverse, 5.0));
        assert_eq!(harness.force("edge"), Vector2::ZERO);
    }

    #[test]
    fn linear_model_pushes_down_from_top() {
        // limit = 100 - 10 = 90, penetration 2
        let mut harness = Harness::new(200.0).node("n", 0.0, 92.0, 10.0);
        harness.run(&mut solver(RestitutionModel::LinearQuadratic, 5.0));
        let expected = -2.0 * (2.0 + 4.0 / 3.0);
        let force = harness.force("n");
        assert!((force.y - expected).abs() < EPS);
        assert_eq!(force.x, 0.0);
    }

    #[test]
    fn linear_model_pushes_up_from_bottom() {
        let mut harness = Harness::new(200.0).node("n", 0.0, -93.0, 10.0);
        harness.run(&mut solver(RestitutionModel::LinearQuadratic, 5.0));
        let expected = 3.0 * (3.0 + 4.0 / 3.0);
        assert!((harness.force("n").y - expected).abs() < EPS);
    }

    #[test]
    fn linear_model_ignores_margin() {
        let a = solver(RestitutionModel::LinearQuadratic, 0.0);
        let b = solver(RestitutionModel::LinearQuadratic, 40.0);
        assert_eq!(a.restitution(95.0, 100.0, 0.0), b.restitution(95.0, 100.0, 0.0));
    }

    #[test]
    fn inverse_model_uses_margin_threshold() {
        // H = 100, margin 5, radius 0: limit 95, node one unit beyond
        let mut harness = Harness::new(200.0).node("n", 0.0, 96.0, 0.0);
        harness.run(&mut solver(RestitutionModel::Inverse, 5.0));
        let d: f64 = 1.0;
        let expected = -d * (0.05 * (1.0 / d + 1.0));
        assert!((harness.force("n").y - expected).abs() < EPS);
        assert_eq!(harness.force("n").x, 0.0);
    }

    #[test]
    fn inverse_model_one_unit_inside_threshold_matches_formula() {
        // y = H - margin - 1 evaluates the law at d = -1, which is zero,
        // and the node is inside so nothing is added either way
        let h = 100.0;
        let margin = 5.0;
        let mut harness = Harness::new(2.0 * h).node("n", 0.0, h - margin - 1.0, 0.0);
        harness.run(&mut solver(RestitutionModel::Inverse, margin));
        let d: f64 = -1.0;
        let reference = -d * (0.05 * (1.0 / d + 1.0));
        assert!((harness.force("n").y - reference).abs() < EPS);
    }

    #[test]
    fn inverse_model_is_symmetric() {
        let solver = solver(RestitutionModel::Inverse, 5.0);
        let top = solver.restitution(97.0, 100.0, 0.0);
        let bottom = solver.restitution(-97.0, 100.0, 0.0);
        assert!((top.y + bottom.y).abs() < EPS);
        assert!(top.y < 0.0);
    }

    #[test]
    fn force_grows_with_penetration() {
        for model in [RestitutionModel::LinearQuadratic, RestitutionModel::Inverse] {
            let solver = solver(model, 5.0);
            let shallow = solver.restitution(96.0, 100.0, 0.0).y.abs();
            let deep = solver.restitution(130.0, 100.0, 0.0).y.abs();
            assert!(deep > shallow, "{model:?}");
        }
    }

    #[test]
    fn never_touches_horizontal_axis() {
        let mut harness = Harness::new(100.0)
            .node("a", 1e6, 400.0, 3.0)
            .node("b", -1e6, -400.0, 3.0)
            .node("c", 42.0, 0.0, 3.0);
        for model in [RestitutionModel::LinearQuadratic, RestitutionModel::Inverse] {
            harness.run(&mut solver(model, 5.0));
            for id in ["a", "b", "c"] {
                assert_eq!(harness.force(id).x, 0.0);
            }
        }
    }

    #[test]
    fn reads_viewport_height_every_solve() {
        let mut harness = Harness::new(200.0).node("n", 0.0, 80.0, 0.0);
        let mut solver = solver(RestitutionModel::LinearQuadratic, 0.0);
        harness.run(&mut solver);
        assert_eq!(harness.force("n"), Vector2::ZERO);

        harness.canvas.resize(400.0, 100.0);
        harness.run(&mut solver);
        assert!(harness.force("n").y < 0.0);
    }

    #[test]
    fn options_swap_takes_effect_next_solve() {
        let mut harness = Harness::new(200.0).node("n", 0.0, 97.0, 0.0);
        let mut solver = solver(RestitutionModel::LinearQuadratic, 5.0);
        harness.run(&mut solver);
        assert_eq!(harness.force("n"), Vector2::ZERO);

        let mut options = PhysicsOptions::default();
        options.boundary.model = RestitutionModel::Inverse;
        solver.set_options(&options);
        harness.run(&mut solver);
        assert!(harness.force("n").y < 0.0);
    }

    #[test]
    fn empty_index_is_noop() {
        let mut harness = Harness::new(200.0);
        let forces = harness.run(&mut solver(RestitutionModel::Inverse, 5.0));
        assert!(forces.is_empty());
    }
}
