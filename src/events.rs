//! Pointer interaction events delivered to solvers

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::vector::Vector2;

/// Names an event source uses when publishing pointer gestures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    #[serde(rename = "dragStarted")]
    DragStarted,
    #[serde(rename = "drag")]
    Drag,
    #[serde(rename = "dragEnded")]
    DragEnded,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::DragStarted => "dragStarted",
            EventKind::Drag => "drag",
            EventKind::DragEnded => "dragEnded",
        }
    }

    /// Attach a pointer position to make a concrete event
    pub fn at(self, pointer: Vector2) -> PointerEvent {
        match self {
            EventKind::DragStarted => PointerEvent::DragStarted(pointer),
            EventKind::Drag => PointerEvent::Drag(pointer),
            EventKind::DragEnded => PointerEvent::DragEnded(pointer),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event name that is not one of the pointer gestures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown pointer event: {0}")]
pub struct ParseEventError(pub String);

impl FromStr for EventKind {
    type Err = ParseEventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dragStarted" => Ok(EventKind::DragStarted),
            "drag" => Ok(EventKind::Drag),
            "dragEnded" => Ok(EventKind::DragEnded),
            other => Err(ParseEventError(other.to_string())),
        }
    }
}

/// An edge-triggered pointer notification, in node coordinates
///
/// Every `DragStarted` must eventually be followed by a `DragEnded`, including
/// when the pointer is lost abnormally. Receivers cannot detect a missing end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    DragStarted(Vector2),
    Drag(Vector2),
    DragEnded(Vector2),
}

impl PointerEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            PointerEvent::DragStarted(_) => EventKind::DragStarted,
            PointerEvent::Drag(_) => EventKind::Drag,
            PointerEvent::DragEnded(_) => EventKind::DragEnded,
        }
    }

    pub fn pointer(&self) -> Vector2 {
        match *self {
            PointerEvent::DragStarted(p) | PointerEvent::Drag(p) | PointerEvent::DragEnded(p) => p,
        }
    }
}

/// One entry of a recorded interaction: an event delivered before `tick` runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptedEvent {
    pub tick: usize,
    pub event: EventKind,
    pub x: f64,
    pub y: f64,
}

impl ScriptedEvent {
    pub fn to_event(&self) -> PointerEvent {
        self.event.at(Vector2::new(self.x, self.y))
    }
}
