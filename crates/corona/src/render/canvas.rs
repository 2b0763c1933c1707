//! Drawing surface abstraction used by the painter.
//!
//! The operations mirror what a 2D immediate-mode canvas offers: filled and
//! stroked circles, stroked polylines, and solid or gradient paints, all
//! modulated by a global alpha.

use nalgebra::Point2;

use crate::color::Rgba;

/// A color stop at `offset` in [0, 1] along a gradient
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f64,
    pub color: Rgba,
}

/// Ordered color stops, sampled with clamping at both ends
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stops(Vec<ColorStop>);

impl Stops {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn with(mut self, offset: f64, color: Rgba) -> Self {
        self.0.push(ColorStop {
            offset: offset.clamp(0.0, 1.0),
            color,
        });
        self.0
            .sort_by(|a, b| a.offset.total_cmp(&b.offset));
        self
    }

    /// Color at position `t`; empty stops are transparent
    pub fn sample(&self, t: f64) -> Rgba {
        let (Some(first), Some(last)) = (self.0.first(), self.0.last()) else {
            return Rgba::TRANSPARENT;
        };
        if t <= first.offset {
            return first.color;
        }
        if t >= last.offset {
            return last.color;
        }

        self.0
            .windows(2)
            .find(|pair| t <= pair[1].offset)
            .map(|pair| {
                let span = pair[1].offset - pair[0].offset;
                if span <= f64::EPSILON {
                    pair[1].color
                } else {
                    pair[0].color.lerp(pair[1].color, (t - pair[0].offset) / span)
                }
            })
            .unwrap_or(last.color)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub start: Point2<f64>,
    pub end: Point2<f64>,
    pub stops: Stops,
}

/// Gradient between two circles, as in a 2D canvas `createRadialGradient`
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub inner_center: Point2<f64>,
    pub inner_radius: f64,
    pub outer_center: Point2<f64>,
    pub outer_radius: f64,
    pub stops: Stops,
}

impl RadialGradient {
    /// Concentric gradient from `inner_radius` to `outer_radius`
    pub fn centered(center: Point2<f64>, inner_radius: f64, outer_radius: f64, stops: Stops) -> Self {
        Self {
            inner_center: center,
            inner_radius,
            outer_center: center,
            outer_radius,
            stops,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Linear(LinearGradient),
    Radial(RadialGradient),
}

impl From<Rgba> for Paint {
    fn from(color: Rgba) -> Self {
        Paint::Solid(color)
    }
}

/// A surface the painter can draw a frame onto
pub trait Canvas {
    /// Width and height in pixels
    fn size(&self) -> (u32, u32);

    /// Opacity multiplied into every subsequent operation
    fn set_global_alpha(&mut self, alpha: f64);

    /// Paints every pixel of the surface
    fn fill_all(&mut self, paint: &Paint);

    fn fill_circle(&mut self, center: Point2<f64>, radius: f64, paint: &Paint);

    fn stroke_circle(&mut self, center: Point2<f64>, radius: f64, line_width: f64, paint: &Paint);

    /// Strokes connected segments through `points` with round joins and caps
    fn stroke_polyline(&mut self, points: &[Point2<f64>], line_width: f64, paint: &Paint);
}
