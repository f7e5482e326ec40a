//! The rendering surface the layout is contained in

/// Anything that can report its current rendered height
///
/// Implementations must return the live value; containment reads it on every
/// tick so resizes take effect immediately.
pub trait Viewport {
    fn client_height(&self) -> f64;

    fn client_width(&self) -> f64 {
        0.0
    }
}

/// A plain canvas of known size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    width: f64,
    height: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }
}

impl Viewport for Canvas {
    fn client_height(&self) -> f64 {
        self.height
    }

    fn client_width(&self) -> f64 {
        self.width
    }
}
