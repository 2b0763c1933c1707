use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Logical size of the drawing surface, in pixels.
///
/// The star sits at the center; its photosphere and the cull boundary are
/// both derived from the current size, so a resize moves them with it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn center(&self) -> Point2<f64> {
        Point2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn min_dimension(&self) -> f64 {
        self.width.min(self.height)
    }

    pub fn max_dimension(&self) -> f64 {
        self.width.max(self.height)
    }

    /// Radius of the visible star disk
    pub fn photosphere_radius(&self, fraction: f64) -> f64 {
        self.min_dimension() * fraction
    }

    /// Distance from the center beyond which particles are discarded
    pub fn cull_radius(&self, factor: f64) -> f64 {
        self.max_dimension() * factor
    }
}
