//! Node shape sizing
//!
//! Only the part of a shape the physics needs lives here: how large the node
//! is, including the bounce-eased growth it plays while selected. Drawing is
//! left to the renderer.

use serde::{Deserialize, Serialize};

use crate::easing::ease_out_bounce;

/// Duration passed to the easing curve for the selection growth
const POP_DURATION: f64 = 2.0;
/// Animation progress added per resize while selected
const POP_STEP: f64 = 0.05;

/// Space reserved around the label inside the shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    pub const NONE: Margins = Margins {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 5.0,
            right: 5.0,
            bottom: 5.0,
            left: 5.0,
        }
    }
}

/// Measured label box
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelSize {
    pub width: f64,
    pub height: f64,
}

/// A circle sized to fit its label
#[derive(Debug, Clone, PartialEq)]
pub struct CircleShape {
    label: LabelSize,
    margin: Margins,
    /// Extra diameter the circle grows by while selected
    selected_width_delta: f64,
    /// Selection animation progress in `[0, 1]`
    step: f64,
    diameter: f64,
    needs_refresh: bool,
    last_selected: bool,
}

impl CircleShape {
    pub fn new(label: LabelSize, margin: Margins, selected_width_delta: f64) -> Self {
        let mut shape = Self {
            label,
            margin,
            selected_width_delta,
            step: 0.0,
            diameter: 0.0,
            needs_refresh: true,
            last_selected: false,
        };
        shape.resize(false);
        shape
    }

    /// A circle of fixed diameter with no label margins
    pub fn with_diameter(diameter: f64) -> Self {
        Self::new(
            LabelSize {
                width: diameter,
                height: diameter,
            },
            Margins::NONE,
            0.0,
        )
    }

    /// Recompute the diameter, advancing the selection animation one step
    ///
    /// Deselecting rewinds the animation so the next selection pops again.
    pub fn resize(&mut self, selected: bool) {
        if !selected {
            self.step = 0.0;
        }
        let refresh = self.needs_refresh || selected != self.last_selected;

        if refresh || (selected && self.step < 1.0) {
            let mut diameter = f64::max(
                self.label.width + self.margin.left + self.margin.right,
                self.label.height + self.margin.top + self.margin.bottom,
            );

            if selected {
                let grow = ease_out_bounce(self.step, 0.0, self.selected_width_delta, POP_DURATION);
                if grow.is_finite() {
                    diameter += grow;
                }
                self.step += POP_STEP;
            }

            self.diameter = diameter;
            self.needs_refresh = false;
        }
        self.last_selected = selected;
    }

    /// Update the measured label and mark the shape for a resize
    pub fn set_label_size(&mut self, label: LabelSize) {
        self.label = label;
        self.needs_refresh = true;
    }

    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    /// Effective radius used by containment
    pub fn distance_to_border(&self) -> f64 {
        self.diameter * 0.5
    }

    /// Whether the selection animation has finished growing
    pub fn is_settled(&self) -> bool {
        self.step >= 1.0
    }
}
