//! Simulation driver
//!
//! Owns the graph, the physics state and the registered solvers. Each tick
//! zeroes the force accumulator, runs every solver in registration order, and
//! integrates the summed forces into velocities and positions.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::events::PointerEvent;
use crate::graph::{Body, Edge, GraphData, Node, NodeId};
use crate::options::PhysicsOptions;
use crate::physics::{
    BoundarySolver, CentralGravitySolver, DragSolver, ForceAccumulator, PhysicsBody,
    RepulsionSolver, SolveContext, Solver, SpringSolver,
};
use crate::vector::Vector2;
use crate::viewport::Canvas;

/// Final or intermediate position of one node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodePosition {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
}

pub struct Simulation {
    body: Body,
    physics: PhysicsBody,
    canvas: Canvas,
    options: PhysicsOptions,
    solvers: Vec<Box<dyn Solver>>,
    /// Largest velocity seen on the last tick, `None` before the first
    last_max_velocity: Option<f64>,
    iterations: usize,
}

impl Simulation {
    /// Create a simulation with the default solver set
    pub fn new(body: Body, options: PhysicsOptions, canvas: Canvas) -> Self {
        let solvers = default_solvers(&options);
        Self::with_solvers(body, options, canvas, solvers)
    }

    pub fn from_graph_data(graph: &GraphData, options: PhysicsOptions, canvas: Canvas) -> Self {
        Self::new(Body::from_graph_data(graph), options, canvas)
    }

    /// Create a simulation that runs exactly the given solvers, in order
    pub fn with_solvers(
        body: Body,
        options: PhysicsOptions,
        canvas: Canvas,
        solvers: Vec<Box<dyn Solver>>,
    ) -> Self {
        let mut simulation = Self {
            body,
            physics: PhysicsBody::new(),
            canvas,
            options,
            solvers,
            last_max_velocity: None,
            iterations: 0,
        };
        simulation.update_physics_indices();
        simulation
    }

    pub fn register_solver(&mut self, mut solver: Box<dyn Solver>) {
        solver.set_options(&self.options);
        self.solvers.push(solver);
    }

    pub fn solver_names(&self) -> Vec<&'static str> {
        self.solvers.iter().map(|s| s.name()).collect()
    }

    /// Rebuild the simulated node and edge sets
    ///
    /// Fixed and hidden nodes are left out, as are edges that are hidden or
    /// miss an endpoint. Velocities of surviving nodes are kept.
    pub fn update_physics_indices(&mut self) {
        self.physics.node_indices = self
            .body
            .nodes()
            .filter(|n| !n.fixed && !n.hidden)
            .map(|n| n.id.clone())
            .collect();

        let body = &self.body;
        self.physics.edge_indices = body
            .edges()
            .filter(|e| !e.hidden)
            .filter(|e| {
                let visible = |id: &NodeId| body.node(id).is_some_and(|n| !n.hidden);
                visible(&e.from) && visible(&e.to)
            })
            .map(|e| e.id.clone())
            .collect();

        self.physics.forces.reset(&self.physics.node_indices);
        self.physics.velocities.resize(&self.physics.node_indices);
        self.last_max_velocity = None;

        debug!(
            nodes = self.physics.node_indices.len(),
            edges = self.physics.edge_indices.len(),
            "physics indices rebuilt"
        );
    }

    pub fn add_node(&mut self, node: Node) {
        self.body.insert_node(node);
        self.update_physics_indices();
    }

    pub fn remove_node(&mut self, id: &NodeId) -> Option<Node> {
        let node = self.body.remove_node(id)?;
        self.update_physics_indices();
        Some(node)
    }

    pub fn add_edge(&mut self, edge: Edge) {
        self.body.insert_edge(edge);
        self.update_physics_indices();
    }

    /// Pin or release a node; returns false for unknown ids
    pub fn set_fixed(&mut self, id: &NodeId, fixed: bool) -> bool {
        self.update_node(id, |n| n.fixed = fixed)
    }

    pub fn set_hidden(&mut self, id: &NodeId, hidden: bool) -> bool {
        self.update_node(id, |n| n.hidden = hidden)
    }

    /// Mark a node selected; its shape grows over the following ticks
    pub fn set_selected(&mut self, id: &NodeId, selected: bool) -> bool {
        match self.body.node_mut(id) {
            Some(node) => {
                node.selected = selected;
                true
            }
            None => false,
        }
    }

    fn update_node(&mut self, id: &NodeId, f: impl FnOnce(&mut Node)) -> bool {
        match self.body.node_mut(id) {
            Some(node) => {
                f(node);
                self.update_physics_indices();
                true
            }
            None => false,
        }
    }

    /// Replace the options snapshot and hand it to every solver
    pub fn set_options(&mut self, options: PhysicsOptions) {
        for solver in &mut self.solvers {
            solver.set_options(&options);
        }
        self.options = options;
    }

    pub fn options(&self) -> &PhysicsOptions {
        &self.options
    }

    /// Deliver a pointer event to every solver immediately
    pub fn emit(&mut self, event: PointerEvent) {
        let pointer = event.pointer();
        debug!(event = %event.kind(), x = pointer.x, y = pointer.y, "pointer event");
        for solver in &mut self.solvers {
            solver.handle_event(&event);
        }
    }

    /// Zero the accumulator and let every solver add its contribution
    pub fn compute_forces(&mut self) -> &ForceAccumulator {
        self.physics.forces.reset(&self.physics.node_indices);
        let ctx = SolveContext {
            body: &self.body,
            node_indices: &self.physics.node_indices,
            edge_indices: &self.physics.edge_indices,
            velocities: &self.physics.velocities,
            viewport: &self.canvas,
        };
        for solver in &mut self.solvers {
            solver.solve(&ctx, &mut self.physics.forces);
        }
        &self.physics.forces
    }

    /// Run one step; returns the largest node velocity after integration
    pub fn tick(&mut self) -> f64 {
        self.compute_forces();
        let max_velocity = self.integrate();

        for node in self.body.nodes_mut() {
            node.shape.resize(node.selected);
        }

        self.iterations += 1;
        self.last_max_velocity = Some(max_velocity);
        max_velocity
    }

    fn integrate(&mut self) -> f64 {
        let opts = &self.options.simulation;
        let mut max_velocity: f64 = 0.0;

        for id in &self.physics.node_indices {
            let Some(node) = self.body.node_mut(id) else {
                continue;
            };

            let mut force = self.physics.forces.get(id);
            if !force.is_finite() {
                warn!(node = %id, "discarding non-finite force");
                force = Vector2::ZERO;
            }

            let mass = if node.mass > 0.0 { node.mass } else { 1.0 };
            let velocity = self.physics.velocities.get(id);
            let acceleration = (force - velocity * opts.damping) / mass;
            let velocity =
                (velocity + acceleration * opts.timestep).clamp_length(opts.max_velocity);

            node.position += velocity * opts.timestep;
            self.physics.velocities.set(id, velocity);
            max_velocity = max_velocity.max(velocity.length());
        }

        max_velocity
    }

    /// True once a tick has run with every velocity below the threshold
    pub fn is_stable(&self) -> bool {
        self.last_max_velocity
            .is_some_and(|v| v < self.options.simulation.min_velocity)
    }

    /// Tick until stable or `max_iterations` ticks have run
    ///
    /// Returns the number of ticks performed.
    pub fn stabilize(&mut self, max_iterations: usize) -> usize {
        let mut ticks = 0;
        while ticks < max_iterations {
            self.tick();
            ticks += 1;
            if self.is_stable() {
                break;
            }
        }

        if self.is_stable() {
            info!(ticks, "layout stabilized");
        } else {
            info!(
                ticks,
                max_velocity = self.last_max_velocity.unwrap_or_default(),
                "stopped before stabilizing"
            );
        }
        ticks
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn physics(&self) -> &PhysicsBody {
        &self.physics
    }

    pub fn forces(&self) -> &ForceAccumulator {
        &self.physics.forces
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    /// Node positions in insertion order
    pub fn positions(&self) -> Vec<NodePosition> {
        self.body
            .nodes()
            .map(|n| NodePosition {
                id: n.id.clone(),
                x: n.x(),
                y: n.y(),
            })
            .collect()
    }

    pub fn position(&self, id: &NodeId) -> Option<Vector2> {
        self.body.node(id).map(|n| n.position)
    }
}

/// Repulsion, springs, central gravity, containment and drag, in that order
pub fn default_solvers(options: &PhysicsOptions) -> Vec<Box<dyn Solver>> {
    vec![
        Box::new(RepulsionSolver::new(options)),
        Box::new(SpringSolver::new(options)),
        Box::new(CentralGravitySolver::new(options)),
        Box::new(BoundarySolver::new(options)),
        Box::new(DragSolver::new(options)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::RestitutionModel;
    use crate::physics::SequenceStream;

    fn graph(json: &str) -> GraphData {
        serde_json::from_str(json).unwrap()
    }

    fn triangle() -> GraphData {
        graph(
            r#"{
                "nodes": [
                    {"id": "a", "x": 0, "y": 0},
                    {"id": "b", "x": 40, "y": 0},
                    {"id": "c", "x": 0, "y": 40}
                ],
                "edges": [
                    {"from": "a", "to": "b"},
                    {"from": "b", "to": "c"},
                    {"from": "c", "to": "a"}
                ]
            }"#,
        )
    }

    fn boundary_and_drag(options: &PhysicsOptions) -> Vec<Box<dyn Solver>> {
        vec![
            Box::new(BoundarySolver::new(options)),
            Box::new(DragSolver::with_stream(
                options,
                Box::new(SequenceStream::new(vec![0.5])),
            )),
        ]
    }

    #[test]
    fn default_solver_order() {
        let sim =
            Simulation::from_graph_data(&triangle(), PhysicsOptions::default(), Canvas::default());
        assert_eq!(
            sim.solver_names(),
            ["repulsion", "spring", "central_gravity", "boundary", "drag"]
        );
    }

    #[test]
    fn fixed_and_hidden_nodes_are_not_simulated() {
        let data = graph(
            r#"{
                "nodes": [
                    {"id": "a"}, {"id": "b", "fixed": true}, {"id": "c", "hidden": true}
                ],
                "edges": [{"from": "a", "to": "b"}, {"from": "a", "to": "c"}]
            }"#,
        );
        let sim = Simulation::from_graph_data(&data, PhysicsOptions::default(), Canvas::default());
        assert_eq!(sim.physics().node_indices, [NodeId::from("a")]);
        // edges to fixed nodes still pull on the free end
        assert_eq!(sim.physics().edge_indices.len(), 1);
    }

    #[test]
    fn index_changes_are_tolerated_between_ticks() {
        let mut sim =
            Simulation::from_graph_data(&triangle(), PhysicsOptions::default(), Canvas::default());
        sim.tick();
        assert!(sim.remove_node(&NodeId::from("b")).is_some());
        sim.tick();
        assert_eq!(sim.forces().len(), 2);
        assert!(sim.set_fixed(&NodeId::from("a"), true));
        sim.tick();
        assert_eq!(sim.physics().node_indices, [NodeId::from("c")]);
        assert!(!sim.set_fixed(&NodeId::from("zzz"), true));
    }

    #[test]
    fn fixed_nodes_do_not_move() {
        let data = graph(r#"{"nodes": [{"id": "pin", "x": 500, "y": 900, "fixed": true}]}"#);
        let mut sim =
            Simulation::from_graph_data(&data, PhysicsOptions::default(), Canvas::default());
        sim.stabilize(20);
        assert_eq!(
            sim.position(&NodeId::from("pin")),
            Some(Vector2::new(500.0, 900.0))
        );
    }

    #[test]
    fn composed_forces_equal_sum_of_parts() {
        let data = graph(
            r#"{"nodes": [
                {"id": "top", "x": 10, "y": 290},
                {"id": "mid", "x": -5, "y": 0},
                {"id": "low", "x": 3, "y": -320}
            ]}"#,
        );
        let mut options = PhysicsOptions::default();
        options.boundary.model = RestitutionModel::Inverse;
        let body = Body::from_graph_data(&data);
        let canvas = Canvas::new(800.0, 600.0);

        let drive = |sim: &mut Simulation| {
            sim.emit(PointerEvent::DragStarted(Vector2::ZERO));
            sim.emit(PointerEvent::Drag(Vector2::new(12.0, -5.0)));
            sim.compute_forces().clone()
        };

        let mut both = Simulation::with_solvers(
            body.clone(),
            options.clone(),
            canvas,
            boundary_and_drag(&options),
        );
        let mut reversed_solvers = boundary_and_drag(&options);
        reversed_solvers.reverse();
        let mut reversed =
            Simulation::with_solvers(body.clone(), options.clone(), canvas, reversed_solvers);
        let mut boundary_only = Simulation::with_solvers(
            body.clone(),
            options.clone(),
            canvas,
            vec![Box::new(BoundarySolver::new(&options))],
        );
        let mut drag_only = Simulation::with_solvers(
            body,
            options.clone(),
            canvas,
            vec![Box::new(DragSolver::new(&options))],
        );

        let sum = drive(&mut both);
        let sum_reversed = drive(&mut reversed);
        let boundary = drive(&mut boundary_only);
        let drag = drive(&mut drag_only);

        for id in ["top", "mid", "low"] {
            let id = NodeId::from(id);
            let expected = boundary.get(&id) + drag.get(&id);
            assert!((sum.get(&id) - expected).length() < 1e-12);
            assert!((sum_reversed.get(&id) - expected).length() < 1e-12);
        }
        assert!(boundary.get(&NodeId::from("top")).y < 0.0);
        assert!(boundary.get(&NodeId::from("low")).y > 0.0);
        assert_eq!(boundary.get(&NodeId::from("mid")), Vector2::ZERO);
    }

    #[test]
    fn drag_moves_layout_in_drag_direction() {
        let data = graph(
            r#"{"nodes": [{"id": "a", "x": 0, "y": 0}, {"id": "b", "x": 0, "y": 100}]}"#,
        );
        let options = PhysicsOptions::default();
        let mut sim = Simulation::with_solvers(
            Body::from_graph_data(&data),
            options.clone(),
            Canvas::new(800.0, 600.0),
            vec![Box::new(DragSolver::new(&options))],
        );
        sim.emit(PointerEvent::DragStarted(Vector2::ZERO));
        sim.emit(PointerEvent::Drag(Vector2::new(10.0, 0.0)));
        for _ in 0..5 {
            sim.tick();
        }
        for position in sim.positions() {
            assert!(position.x > 0.0, "{} should move right", position.id);
        }

        sim.emit(PointerEvent::DragEnded(Vector2::new(20.0, 0.0)));
        sim.compute_forces();
        assert_eq!(sim.forces().get(&NodeId::from("a")), Vector2::ZERO);
    }

    #[test]
    fn options_reach_every_solver() {
        let mut sim =
            Simulation::from_graph_data(&triangle(), PhysicsOptions::default(), Canvas::default());
        let mut options = PhysicsOptions::default();
        options.boundary.margin = 42.0;
        options.simulation.timestep = 0.1;
        sim.set_options(options.clone());
        assert_eq!(sim.options(), &options);
    }

    #[test]
    fn boundary_keeps_layout_inside_viewport() {
        let data = graph(
            r#"{"nodes": [
                {"id": "escaped", "x": 0, "y": 400, "size": 10},
                {"id": "below", "x": 60, "y": -450, "size": 10}
            ]}"#,
        );
        let mut sim = Simulation::from_graph_data(
            &data,
            PhysicsOptions::default(),
            Canvas::new(800.0, 600.0),
        );
        sim.stabilize(2000);
        for position in sim.positions() {
            assert!(position.y.abs() < 300.0, "{} at {}", position.id, position.y);
        }
    }

    #[test]
    fn triangle_stabilizes() {
        let mut sim =
            Simulation::from_graph_data(&triangle(), PhysicsOptions::default(), Canvas::default());
        assert!(!sim.is_stable());
        let ticks = sim.stabilize(5000);
        assert!(sim.is_stable());
        assert!(ticks < 5000);
        assert_eq!(sim.iterations(), ticks);
        for position in sim.positions() {
            assert!(position.x.is_finite() && position.y.is_finite());
        }
    }

    #[test]
    fn empty_graph_is_immediately_stable() {
        let mut sim = Simulation::from_graph_data(
            &GraphData::default(),
            PhysicsOptions::default(),
            Canvas::default(),
        );
        assert_eq!(sim.stabilize(10), 1);
        assert!(sim.positions().is_empty());
    }

    #[derive(Debug)]
    struct Poison;

    impl Solver for Poison {
        fn name(&self) -> &'static str {
            "poison"
        }

        fn set_options(&mut self, _options: &PhysicsOptions) {}

        fn solve(&mut self, ctx: &SolveContext<'_>, forces: &mut ForceAccumulator) {
            for id in ctx.node_indices {
                forces.add(id, Vector2::new(f64::NAN, f64::INFINITY));
            }
        }
    }

    #[test]
    fn non_finite_forces_are_not_integrated() {
        let data = graph(r#"{"nodes": [{"id": "a", "x": 1, "y": 2}]}"#);
        let mut sim = Simulation::with_solvers(
            Body::from_graph_data(&data),
            PhysicsOptions::default(),
            Canvas::default(),
            vec![Box::new(Poison)],
        );
        sim.tick();
        assert_eq!(sim.position(&NodeId::from("a")), Some(Vector2::new(1.0, 2.0)));
    }

    #[test]
    fn velocity_is_capped() {
        let data = graph(r#"{"nodes": [{"id": "a", "x": 0, "y": 0}]}"#);
        let mut options = PhysicsOptions::default();
        options.drag.a = 1e6;
        let mut sim = Simulation::with_solvers(
            Body::from_graph_data(&data),
            options.clone(),
            Canvas::default(),
            vec![Box::new(DragSolver::new(&options))],
        );
        sim.emit(PointerEvent::DragStarted(Vector2::ZERO));
        sim.emit(PointerEvent::Drag(Vector2::new(100.0, 0.0)));
        let max = sim.tick();
        assert!((max - options.simulation.max_velocity).abs() < 1e-9);
    }

    #[test]
    fn selection_grows_node_over_ticks() {
        let data = graph(
            r#"{"nodes": [{
                "id": "a",
                "label_size": {"width": 20, "height": 10},
                "selected_width_delta": 10
            }]}"#,
        );
        let mut sim =
            Simulation::from_graph_data(&data, PhysicsOptions::default(), Canvas::default());
        let id = NodeId::from("a");
        let before = sim.body().node(&id).unwrap().distance_to_border();
        assert!(sim.set_selected(&id, true));
        for _ in 0..5 {
            sim.tick();
        }
        let after = sim.body().node(&id).unwrap().distance_to_border();
        assert!(after > before);
    }
}
