//! Software rasterizer writing RGBA8 pixels.
//!
//! [`Raster`] draws onto any borrowed RGBA8 buffer (a window's pixel buffer,
//! a browser `ImageData` copy), while [`Framebuffer`] owns one and can be
//! resized. Shapes are anti-aliased with a one-pixel coverage ramp and
//! composited source-over.

use nalgebra::Point2;

use crate::color::Rgba;
use crate::render::canvas::{Canvas, LinearGradient, Paint, RadialGradient};

const CHANNELS: usize = 4;

/// Canvas over a borrowed `width × height × 4` byte buffer
pub struct Raster<'a> {
    width: u32,
    height: u32,
    data: &'a mut [u8],
    global_alpha: f64,
}

impl<'a> Raster<'a> {
    /// Wraps `data`, or returns `None` when its length does not match the size
    pub fn new(width: u32, height: u32, data: &'a mut [u8]) -> Option<Self> {
        if data.len() != width as usize * height as usize * CHANNELS {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
            global_alpha: 1.0,
        })
    }

    /// RGBA bytes at `(x, y)`
    #[cfg(test)]
    pub(crate) fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let i = self.index(x, y)?;
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| (y as usize * self.width as usize + x as usize) * CHANNELS)
    }

    /// Source-over composite of `color` scaled by `coverage` and the global alpha
    fn blend(&mut self, x: u32, y: u32, color: Rgba, coverage: f64) {
        let alpha = (color.alpha * coverage * self.global_alpha).clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let Some(i) = self.index(x, y) else {
            return;
        };

        let over = |src: u8, dst: u8| -> u8 {
            (f64::from(src) * alpha + f64::from(dst) * (1.0 - alpha)).round() as u8
        };
        let px = &mut self.data[i..i + CHANNELS];
        px[0] = over(color.color.r, px[0]);
        px[1] = over(color.color.g, px[1]);
        px[2] = over(color.color.b, px[2]);
        let dst_alpha = f64::from(px[3]) / 255.0;
        px[3] = ((alpha + dst_alpha * (1.0 - alpha)) * 255.0).round() as u8;
    }

    /// Pixel bounds `[x0, x1) × [y0, y1)` covering the given box, clipped to the surface
    fn clip(&self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Option<(u32, u32, u32, u32)> {
        let x0 = min_x.floor().max(0.0);
        let y0 = min_y.floor().max(0.0);
        let x1 = (max_x.ceil() + 1.0).min(f64::from(self.width));
        let y1 = (max_y.ceil() + 1.0).min(f64::from(self.height));
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }

    /// Calls `f` with each pixel center inside the clipped box
    fn scan(
        &mut self,
        bounds: (f64, f64, f64, f64),
        mut f: impl FnMut(&mut Self, u32, u32, Point2<f64>),
    ) {
        let Some((x0, y0, x1, y1)) = self.clip(bounds.0, bounds.1, bounds.2, bounds.3) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                let p = Point2::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                f(self, x, y, p);
            }
        }
    }
}

impl Canvas for Raster<'_> {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.global_alpha = alpha.clamp(0.0, 1.0);
    }

    fn fill_all(&mut self, paint: &Paint) {
        let (w, h) = (f64::from(self.width), f64::from(self.height));
        self.scan((0.0, 0.0, w, h), |raster, x, y, p| {
            if let Some(color) = paint_at(paint, p) {
                raster.blend(x, y, color, 1.0);
            }
        });
    }

    fn fill_circle(&mut self, center: Point2<f64>, radius: f64, paint: &Paint) {
        if radius <= 0.0 || !radius.is_finite() {
            return;
        }
        let bounds = (
            center.x - radius,
            center.y - radius,
            center.x + radius,
            center.y + radius,
        );
        self.scan(bounds, |raster, x, y, p| {
            let coverage = edge_coverage(radius - (p - center).magnitude());
            if coverage > 0.0 {
                if let Some(color) = paint_at(paint, p) {
                    raster.blend(x, y, color, coverage);
                }
            }
        });
    }

    fn stroke_circle(&mut self, center: Point2<f64>, radius: f64, line_width: f64, paint: &Paint) {
        if radius <= 0.0 || line_width <= 0.0 || !radius.is_finite() {
            return;
        }
        let half = line_width / 2.0;
        let reach = radius + half;
        let bounds = (
            center.x - reach,
            center.y - reach,
            center.x + reach,
            center.y + reach,
        );
        self.scan(bounds, |raster, x, y, p| {
            let coverage = edge_coverage(half - ((p - center).magnitude() - radius).abs());
            if coverage > 0.0 {
                if let Some(color) = paint_at(paint, p) {
                    raster.blend(x, y, color, coverage);
                }
            }
        });
    }

    fn stroke_polyline(&mut self, points: &[Point2<f64>], line_width: f64, paint: &Paint) {
        if points.len() < 2 || line_width <= 0.0 {
            return;
        }
        let half = line_width / 2.0;
        let segments: Vec<(Point2<f64>, Point2<f64>)> =
            points.windows(2).map(|pair| (pair[0], pair[1])).collect();

        // Each pixel is painted once, by the segment that covers it best, so
        // joins are not composited twice.
        for (index, &(a, b)) in segments.iter().enumerate() {
            let bounds = (
                a.x.min(b.x) - half,
                a.y.min(b.y) - half,
                a.x.max(b.x) + half,
                a.y.max(b.y) + half,
            );
            self.scan(bounds, |raster, x, y, p| {
                let coverage = edge_coverage(half - segment_distance(p, a, b));
                if coverage <= 0.0 {
                    return;
                }
                let owned = segments.iter().enumerate().all(|(other, &(c, d))| {
                    if other == index {
                        return true;
                    }
                    let theirs = edge_coverage(half - segment_distance(p, c, d));
                    if other < index {
                        theirs < coverage
                    } else {
                        theirs <= coverage
                    }
                });
                if owned {
                    if let Some(color) = paint_at(paint, p) {
                        raster.blend(x, y, color, coverage);
                    }
                }
            });
        }
    }
}

/// Owned RGBA8 pixel buffer
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * CHANNELS],
        }
    }

    /// Reallocates the backing buffer; previous contents are discarded
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.data = vec![0; width as usize * height as usize * CHANNELS];
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn raster(&mut self) -> Raster<'_> {
        Raster {
            width: self.width,
            height: self.height,
            data: &mut self.data,
            global_alpha: 1.0,
        }
    }
}

/// Fraction of a pixel covered given the signed distance inside an edge
fn edge_coverage(inside: f64) -> f64 {
    (inside + 0.5).clamp(0.0, 1.0)
}

fn segment_distance(p: Point2<f64>, a: Point2<f64>, b: Point2<f64>) -> f64 {
    let ab = b - a;
    let len_sq = ab.magnitude_squared();
    if len_sq <= f64::EPSILON {
        return (p - a).magnitude();
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).magnitude()
}

/// Paint color at `p`, or `None` where a gradient is undefined
pub fn paint_at(paint: &Paint, p: Point2<f64>) -> Option<Rgba> {
    match paint {
        Paint::Solid(color) => Some(*color),
        Paint::Linear(gradient) => linear_t(gradient, p).map(|t| gradient.stops.sample(t)),
        Paint::Radial(gradient) => radial_t(gradient, p).map(|t| gradient.stops.sample(t)),
    }
}

fn linear_t(gradient: &LinearGradient, p: Point2<f64>) -> Option<f64> {
    let axis = gradient.end - gradient.start;
    let len_sq = axis.magnitude_squared();
    if len_sq <= f64::EPSILON {
        return None;
    }
    Some((p - gradient.start).dot(&axis) / len_sq)
}

/// Solves `|p - c(t)| = r(t)` for the largest `t` with `r(t) >= 0`, where
/// `c(t)` and `r(t)` interpolate from the inner circle to the outer one.
fn radial_t(gradient: &RadialGradient, p: Point2<f64>) -> Option<f64> {
    let r0 = gradient.inner_radius;
    let dr = gradient.outer_radius - r0;
    let cd = gradient.outer_center - gradient.inner_center;
    let pd = p - gradient.inner_center;

    let a = cd.dot(&cd) - dr * dr;
    let b = pd.dot(&cd) + r0 * dr;
    let c = pd.dot(&pd) - r0 * r0;
    let radius_ok = |t: f64| r0 + t * dr >= 0.0;

    if a.abs() < 1e-9 {
        if b.abs() < 1e-12 {
            return None;
        }
        let t = c / (2.0 * b);
        return radius_ok(t).then_some(t);
    }

    let discriminant = b * b - a * c;
    if discriminant < 0.0 {
        return None;
    }
    let root = discriminant.sqrt();
    let (t1, t2) = ((b + root) / a, (b - root) / a);
    let (high, low) = if t1 >= t2 { (t1, t2) } else { (t2, t1) };

    if radius_ok(high) {
        Some(high)
    } else if radius_ok(low) {
        Some(low)
    } else {
        None
    }
}
