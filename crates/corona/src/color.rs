use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::particle::ParticleKind;

/// Opaque 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const BLACK: Color = Color::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert hue/saturation/lightness to RGB
    ///
    /// # Arguments
    /// * `hue` - Degrees, wrapped into [0, 360)
    /// * `saturation` - Percent, clamped to [0, 100]
    /// * `lightness` - Percent, clamped to [0, 100]
    pub fn from_hsl(hue: f64, saturation: f64, lightness: f64) -> Self {
        let h = hue.rem_euclid(360.0) / 360.0;
        let s = saturation.clamp(0.0, 100.0) / 100.0;
        let l = lightness.clamp(0.0, 100.0) / 100.0;

        if s == 0.0 {
            let v = channel(l);
            return Self::new(v, v, v);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        Self {
            r: channel(hue_to_rgb(p, q, h + 1.0 / 3.0)),
            g: channel(hue_to_rgb(p, q, h)),
            b: channel(hue_to_rgb(p, q, h - 1.0 / 3.0)),
        }
    }

    pub fn with_alpha(self, alpha: f64) -> Rgba {
        Rgba {
            color: self,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }
}

/// A color plus straight (non-premultiplied) opacity, used for painting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub color: Color,
    pub alpha: f64,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba {
        color: Color::BLACK,
        alpha: 0.0,
    };

    pub const fn new(r: u8, g: u8, b: u8, alpha: f64) -> Self {
        Self {
            color: Color::new(r, g, b),
            alpha,
        }
    }

    /// Component-wise linear interpolation, `t` clamped to [0, 1]
    pub fn lerp(self, other: Rgba, t: f64) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
        Rgba {
            color: Color::new(
                mix(self.color.r, other.color.r),
                mix(self.color.g, other.color.g),
                mix(self.color.b, other.color.b),
            ),
            alpha: self.alpha + (other.alpha - self.alpha) * t,
        }
    }
}

impl From<Color> for Rgba {
    fn from(color: Color) -> Self {
        color.with_alpha(1.0)
    }
}

/// Pick a particle's color from its kind and temperature.
///
/// Each kind owns a fixed hue band; the random source only chooses where in
/// the band (and how light) the particle lands. Plasma is the one kind whose
/// hue follows temperature: 50 kK is red, 80 kK and above is yellow.
pub fn color_for<R: Rng + ?Sized>(kind: ParticleKind, temperature: f64, rng: &mut R) -> Color {
    let mut jitter = |width: f64| rng.random::<f64>() * width;

    match kind {
        ParticleKind::Cme => Color::from_hsl(280.0 + jitter(40.0), 70.0, 60.0 + jitter(30.0)),
        ParticleKind::Flare => Color::from_hsl(45.0 + jitter(30.0), 90.0, 80.0 + jitter(15.0)),
        ParticleKind::Corona => Color::from_hsl(120.0 + jitter(60.0), 60.0, 70.0 + jitter(20.0)),
        ParticleKind::Proton => Color::from_hsl(jitter(30.0), 80.0, 60.0 + jitter(25.0)),
        ParticleKind::Electron => Color::from_hsl(200.0 + jitter(60.0), 80.0, 60.0 + jitter(25.0)),
        ParticleKind::Plasma => {
            let hue = plasma_hue(temperature);
            Color::from_hsl(hue, 75.0, 65.0 + jitter(20.0))
        }
    }
}

/// Temperature-scaled hue for plasma, in degrees within [0, 60]
pub fn plasma_hue(temperature: f64) -> f64 {
    ((temperature - 50_000.0) / 20_000.0 * 60.0).clamp(0.0, 60.0)
}

fn hue_to_rgb(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn channel(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}
