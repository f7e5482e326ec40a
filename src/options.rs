//! Solver and driver configuration
//!
//! Options are a snapshot: callers replace the whole [`PhysicsOptions`] value
//! and every solver picks up its own section on the next tick. Missing keys
//! fall back to the defaults below and unknown keys are ignored.

use serde::{Deserialize, Serialize};

/// Complete configuration snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsOptions {
    pub boundary: BoundaryOptions,
    pub drag: DragOptions,
    pub repulsion: RepulsionOptions,
    pub spring: SpringOptions,
    pub central_gravity: CentralGravityOptions,
    pub simulation: SimulationOptions,
}

/// Force law used to push nodes back inside the viewport band
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestitutionModel {
    /// `r = d + 4/3`, contained against `H - radius`
    #[default]
    LinearQuadratic,
    /// `r = 0.05 * (1/d + 1)`, contained against `H - margin - radius`
    Inverse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryOptions {
    pub model: RestitutionModel,
    /// Extra inset from the viewport edge, used by the inverse model
    pub margin: f64,
}

impl Default for BoundaryOptions {
    fn default() -> Self {
        Self {
            model: RestitutionModel::default(),
            margin: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragOptions {
    /// Slope of the drag force approximation
    pub a: f64,
    /// Offset of the drag force approximation
    pub b: f64,
    /// Fraction of the force applied along y
    pub vertical_scale: f64,
    /// Scale of the random stand-in distance when the pointer has not moved
    pub jitter: f64,
}

impl Default for DragOptions {
    fn default() -> Self {
        Self {
            a: 0.8,
            b: 4.0 / 3.0,
            vertical_scale: 0.05,
            jitter: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepulsionOptions {
    /// Separation below which nodes start pushing each other apart (halved)
    pub node_distance: f64,
    pub strength: f64,
}

impl Default for RepulsionOptions {
    fn default() -> Self {
        Self {
            node_distance: 100.0,
            strength: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringOptions {
    /// Rest length
    pub length: f64,
    pub constant: f64,
}

impl Default for SpringOptions {
    fn default() -> Self {
        Self {
            length: 95.0,
            constant: 0.04,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CentralGravityOptions {
    pub strength: f64,
}

impl Default for CentralGravityOptions {
    fn default() -> Self {
        Self { strength: 0.2 }
    }
}

/// Integration and stabilization settings for the driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationOptions {
    pub timestep: f64,
    pub damping: f64,
    pub max_velocity: f64,
    /// The layout counts as stable once every velocity is below this
    pub min_velocity: f64,
    pub max_iterations: usize,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            timestep: 0.5,
            damping: 0.09,
            max_velocity: 50.0,
            min_velocity: 0.1,
            max_iterations: 1000,
        }
    }
}
