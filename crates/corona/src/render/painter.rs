//! Paints one frame: the star body, its corona, the particles and any CME
//! shockwave.
//!
//! Nothing is cached between frames. Every gradient and path is rebuilt
//! from the scene each time, so a resized or half-drawn surface is simply
//! overwritten by the next call.

use std::f64::consts::{PI, TAU};

use nalgebra::{Point2, Vector2};
use rand::Rng;

use crate::color::{Color, Rgba};
use crate::config::RenderConfig;
use crate::particle::{Particle, ParticleKind};
use crate::render::canvas::{Canvas, LinearGradient, Paint, RadialGradient, Stops};
use crate::scheduler::SolarActivity;
use crate::viewport::Viewport;

const STREAMER_ALPHA: f64 = 0.4;
const STREAMER_SAMPLES: usize = 10;
const GRANULE_ALPHA: f64 = 0.8;
const GRANULE_REACH: f64 = 0.85;

/// Borrowed view of everything a frame depends on
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub viewport: Viewport,
    pub photosphere_radius: f64,
    /// Animation time in milliseconds
    pub elapsed_ms: f64,
    pub activity: &'a SolarActivity,
    pub particles: &'a [Particle],
}

impl Scene<'_> {
    fn center(&self) -> Point2<f64> {
        self.viewport.center()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Painter {
    config: RenderConfig,
}

impl Painter {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Paint a full frame. `rng` only scatters the granulation blobs.
    pub fn paint<C, R>(&self, canvas: &mut C, scene: &Scene, rng: &mut R)
    where
        C: Canvas + ?Sized,
        R: Rng + ?Sized,
    {
        self.paint_background(canvas, scene);
        self.paint_streamers(canvas, scene);
        self.paint_corona(canvas, scene);
        self.paint_photosphere(canvas, scene);
        self.paint_granulation(canvas, scene, rng);
        for particle in scene.particles {
            self.paint_particle(canvas, particle);
        }
        self.paint_shockwaves(canvas, scene);
        canvas.set_global_alpha(1.0);
    }

    fn paint_background<C: Canvas + ?Sized>(&self, canvas: &mut C, scene: &Scene) {
        let stops = Stops::new()
            .with(0.0, Rgba::new(0x0a, 0x0a, 0x0f, 1.0))
            .with(0.3, Rgba::new(0x1a, 0x0f, 0x2e, 1.0))
            .with(0.6, Rgba::new(0x0f, 0x0a, 0x1a, 1.0))
            .with(1.0, Rgba::new(0x00, 0x00, 0x00, 1.0));
        let gradient =
            RadialGradient::centered(scene.center(), 0.0, scene.viewport.max_dimension(), stops);

        canvas.set_global_alpha(1.0);
        canvas.fill_all(&Paint::Radial(gradient));
    }

    /// Wavy field lines radiating from the limb, phased by elapsed time
    fn paint_streamers<C: Canvas + ?Sized>(&self, canvas: &mut C, scene: &Scene) {
        let count = self.config.streamer_count;
        let radius = scene.photosphere_radius;
        let time = scene.elapsed_ms;
        let center = scene.center();

        canvas.set_global_alpha(STREAMER_ALPHA);
        for i in 0..count {
            let phase = i as f64;
            let angle = phase / count as f64 * TAU + time * 0.0003;
            let length = radius * (2.5 + (time * 0.001 + phase).sin() * 0.5);
            let direction = Vector2::new(angle.cos(), angle.sin());

            let stops = Stops::new()
                .with(0.0, Rgba::new(255, 200, 150, 0.6))
                .with(0.5, Rgba::new(150, 255, 200, 0.3))
                .with(1.0, Rgba::new(100, 150, 255, 0.1));
            let paint = Paint::Linear(LinearGradient {
                start: center + direction * radius,
                end: center + direction * length,
                stops,
            });

            let mut points = Vec::with_capacity(STREAMER_SAMPLES + 2);
            points.push(center + direction * radius);
            for step in 0..=STREAMER_SAMPLES {
                let t = step as f64 / STREAMER_SAMPLES as f64;
                let current = radius + (length - radius) * t;
                let wobble = (t * PI * 3.0 + time * 0.001).sin() * 20.0 * t;
                let bent = angle + wobble * 0.01;
                points.push(center + Vector2::new(bent.cos(), bent.sin()) * current);
            }

            let line_width = 2.0 + (time * 0.002 + phase).sin();
            canvas.stroke_polyline(&points, line_width, &paint);
        }
        canvas.set_global_alpha(1.0);
    }

    /// Concentric translucent rings, fading with each layer
    fn paint_corona<C: Canvas + ?Sized>(&self, canvas: &mut C, scene: &Scene) {
        let radius = scene.photosphere_radius;
        let center = scene.center();

        for layer in 0..self.config.corona_layers {
            let layer = layer as f64;
            let opacity = (0.3 - layer * 0.06).max(0.0);
            if opacity <= 0.0 {
                break;
            }
            let outer = radius * (2.0 + layer * 0.5);
            let stops = Stops::new()
                .with(0.0, Rgba::new(255, 220, 100, opacity))
                .with(0.3, Rgba::new(255, 180, 120, opacity * 0.7))
                .with(0.6, Rgba::new(200, 255, 150, opacity * 0.4))
                .with(1.0, Rgba::new(150, 200, 255, 0.0));
            let gradient = RadialGradient::centered(center, radius * (0.8 + layer * 0.2), outer, stops);
            canvas.fill_circle(center, outer, &Paint::Radial(gradient));
        }
    }

    /// Star disk lit from the upper left
    fn paint_photosphere<C: Canvas + ?Sized>(&self, canvas: &mut C, scene: &Scene) {
        let radius = scene.photosphere_radius;
        let center = scene.center();
        let stops = Stops::new()
            .with(0.0, Rgba::new(0xff, 0xff, 0x99, 1.0))
            .with(0.3, Rgba::new(0xff, 0xdd, 0x55, 1.0))
            .with(0.7, Rgba::new(0xff, 0x99, 0x33, 1.0))
            .with(1.0, Rgba::new(0xcc, 0x44, 0x00, 1.0));
        let gradient = RadialGradient {
            inner_center: center - Vector2::new(radius * 0.2, radius * 0.2),
            inner_radius: 0.0,
            outer_center: center,
            outer_radius: radius,
            stops,
        };
        canvas.fill_circle(center, radius, &Paint::Radial(gradient));
    }

    /// Convection cells scattered over the disk, drifting slowly with time
    fn paint_granulation<C, R>(&self, canvas: &mut C, scene: &Scene, rng: &mut R)
    where
        C: Canvas + ?Sized,
        R: Rng + ?Sized,
    {
        let radius = scene.photosphere_radius;
        let center = scene.center();

        canvas.set_global_alpha(GRANULE_ALPHA);
        for i in 0..self.config.granule_count {
            let angle = rng.random::<f64>() * TAU;
            let distance = rng.random::<f64>() * radius * GRANULE_REACH;
            let size = rng.random::<f64>() * 8.0 + 3.0;
            let drift = (scene.elapsed_ms * 0.0005 + i as f64) * 0.1;
            let position = center + Vector2::new((angle + drift).cos(), (angle + drift).sin()) * distance;

            let hot = Color::from_hsl(
                45.0 + rng.random::<f64>() * 15.0,
                90.0,
                85.0 + rng.random::<f64>() * 10.0,
            );
            let cool = Color::from_hsl(
                25.0 + rng.random::<f64>() * 20.0,
                80.0,
                45.0 + rng.random::<f64>() * 15.0,
            );
            let stops = Stops::new()
                .with(0.0, hot.into())
                .with(1.0, cool.into());
            let gradient = RadialGradient::centered(position, 0.0, size, stops);
            canvas.fill_circle(position, size, &Paint::Radial(gradient));
        }
        canvas.set_global_alpha(1.0);
    }

    fn paint_particle<C: Canvas + ?Sized>(&self, canvas: &mut C, particle: &Particle) {
        let alpha = particle.alpha();
        if alpha <= 0.0 {
            return;
        }
        let position = particle.position;
        let color = particle.color;

        canvas.set_global_alpha(alpha);
        if let Some(scale) = particle.kind.glow_scale() {
            let glow_radius = particle.size * scale;
            let stops = match particle.kind {
                ParticleKind::Flare => Stops::new()
                    .with(0.0, Rgba::new(255, 255, 255, alpha))
                    .with(0.5, color.with_alpha(alpha * 0.8))
                    .with(1.0, color.with_alpha(0.0)),
                _ => Stops::new()
                    .with(0.0, color.with_alpha(1.0))
                    .with(0.3, color.with_alpha(alpha * 0.6))
                    .with(1.0, color.with_alpha(0.0)),
            };
            let gradient = RadialGradient::centered(position, 0.0, glow_radius, stops);
            canvas.fill_circle(position, glow_radius, &Paint::Radial(gradient));

            if particle.kind == ParticleKind::Cme {
                let ring = Paint::Solid(color.with_alpha(alpha * 0.3));
                canvas.stroke_circle(position, particle.size * 2.0, 1.0, &ring);
            }
        }

        canvas.fill_circle(position, particle.size, &Paint::Solid(color.into()));

        if particle.energy > self.config.trail_energy_threshold {
            canvas.set_global_alpha(alpha * 0.3);
            canvas.stroke_polyline(
                &[particle.trail_start(), position],
                particle.size * 0.5,
                &Paint::Solid(color.into()),
            );
        }
        canvas.set_global_alpha(1.0);
    }

    /// Expanding rings while a strong CME is running
    fn paint_shockwaves<C: Canvas + ?Sized>(&self, canvas: &mut C, scene: &Scene) {
        let activity = scene.activity;
        if !activity.cme_active || activity.cme_intensity <= self.config.shockwave_threshold {
            return;
        }

        let intensity = activity.cme_intensity;
        let center = scene.center();
        let [primary, secondary, wake] = shockwave_radii(scene.photosphere_radius, intensity);
        let rings = [
            (Rgba::new(255, 100, 200, intensity * 0.6), 4.0, primary),
            (Rgba::new(150, 50, 255, intensity * 0.4), 2.0, secondary),
            (Rgba::new(100, 200, 255, intensity * 0.2), 1.0, wake),
        ];

        canvas.set_global_alpha(1.0);
        for (color, line_width, radius) in rings {
            canvas.stroke_circle(center, radius, line_width, &Paint::Solid(color));
        }
    }
}

/// Radii of the three shockwave rings for a given CME intensity
pub fn shockwave_radii(photosphere_radius: f64, intensity: f64) -> [f64; 3] {
    [
        photosphere_radius * (3.0 - intensity),
        photosphere_radius * (4.0 - intensity * 0.7),
        photosphere_radius * (5.0 - intensity * 0.5),
    ]
}
