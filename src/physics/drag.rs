//! Pointer-driven force
//!
//! While a drag is in progress, every simulated node is pushed in the
//! direction the pointer last moved, so the whole layout follows a pan-like
//! gesture while still competing with the other forces. The vertical
//! component is damped.
//!
//! The interaction state only changes through [`DragInteractionState`]'s
//! transitions, driven by pointer events; `solve` reads a copy of it. A drag
//! ends only on `DragEnded`: if the event source never sends one, the last
//! delta keeps being applied.

use tracing::{debug, trace};

use crate::events::PointerEvent;
use crate::options::{DragOptions, PhysicsOptions};
use crate::vector::Vector2;

use super::random::{RandomStream, SeededStream};
use super::{ForceAccumulator, SolveContext, Solver};

/// Seed for the solver's own symmetry-breaking stream
pub const DRAG_SEED: &str = "DRAG SOLVER";

/// Floor for the stand-in distance, so a zero draw cannot divide by zero
const MIN_JITTER_DISTANCE: f64 = 1e-9;

/// Drag gesture state, updated only by pointer events
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragInteractionState {
    dragging: bool,
    last_pointer: Option<Vector2>,
    delta: Vector2,
}

impl DragInteractionState {
    /// Idle -> Dragging
    ///
    /// The previous gesture's delta is discarded.
    pub fn drag_started(&mut self, pointer: Vector2) {
        self.dragging = true;
        self.delta = Vector2::ZERO;
        self.last_pointer = Some(pointer);
    }

    /// Dragging -> Dragging
    pub fn drag(&mut self, pointer: Vector2) {
        self.track(pointer);
    }

    /// Dragging -> Idle
    pub fn drag_ended(&mut self, pointer: Vector2) {
        self.track(pointer);
        self.dragging = false;
    }

    /// Record the movement since the last pointer position
    ///
    /// Without a known previous position there is no movement to record.
    fn track(&mut self, pointer: Vector2) {
        if let Some(last) = self.last_pointer {
            self.delta = pointer - last;
        }
        self.last_pointer = Some(pointer);
    }

    pub fn apply(&mut self, event: &PointerEvent) {
        match *event {
            PointerEvent::DragStarted(p) => self.drag_started(p),
            PointerEvent::Drag(p) => self.drag(p),
            PointerEvent::DragEnded(p) => self.drag_ended(p),
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn last_pointer(&self) -> Option<Vector2> {
        self.last_pointer
    }

    /// Pointer movement between the last two events
    pub fn delta(&self) -> Vector2 {
        self.delta
    }
}

#[derive(Debug)]
pub struct DragSolver {
    options: DragOptions,
    state: DragInteractionState,
    rng: Box<dyn RandomStream>,
}

impl DragSolver {
    pub fn new(options: &PhysicsOptions) -> Self {
        Self::with_stream(options, Box::new(SeededStream::new(DRAG_SEED)))
    }

    /// Use a caller-supplied stream for the zero-movement fallback
    pub fn with_stream(options: &PhysicsOptions, rng: Box<dyn RandomStream>) -> Self {
        Self {
            options: options.drag.clone(),
            state: DragInteractionState::default(),
            rng,
        }
    }

    pub fn state(&self) -> &DragInteractionState {
        &self.state
    }

    pub fn drag_started(&mut self, pointer: Vector2) {
        self.state.drag_started(pointer);
    }

    pub fn drag(&mut self, pointer: Vector2) {
        self.state.drag(pointer);
    }

    pub fn drag_ended(&mut self, pointer: Vector2) {
        self.state.drag_ended(pointer);
    }

    /// Force applied to every simulated node for the given pointer delta
    ///
    /// A zero delta is replaced by a small random distance along x.
    fn drag_force(&mut self, delta: Vector2) -> Vector2 {
        let (mut dx, dy) = (delta.x, delta.y);
        let mut distance = (dx * dx + dy * dy).sqrt();

        if distance == 0.0 {
            distance = (self.options.jitter * self.rng.next_f64()).max(MIN_JITTER_DISTANCE);
            dx = distance;
            trace!(distance, "pointer did not move, using jitter");
        }

        let magnitude = (self.options.a * distance + self.options.b) / distance;
        Vector2::new(
            dx * magnitude,
            dy * magnitude * self.options.vertical_scale,
        )
    }
}

impl Solver for DragSolver {
    fn name(&self) -> &'static str {
        "drag"
    }

    fn set_options(&mut self, options: &PhysicsOptions) {
        self.options = options.drag.clone();
    }

    fn solve(&mut self, ctx: &SolveContext<'_>, forces: &mut ForceAccumulator) {
        let state = self.state;
        if !state.is_dragging() || ctx.node_indices.is_empty() {
            return;
        }

        let force = self.drag_force(state.delta());
        for id in ctx.node_indices {
            forces.add(id, force);
        }
    }

    fn handle_event(&mut self, event: &PointerEvent) {
        self.state.apply(event);
        debug!(
            event = %event.kind(),
            dragging = self.state.is_dragging(),
            dx = self.state.delta().x,
            dy = self.state.delta().y,
            "drag state updated"
        );
    }
}
