use approx::assert_relative_eq;
use rand::SeedableRng;
use rand_chacha::ChaChaRng;

use crate::config::SimulationConfig;
use crate::frame_loop::{FrameLoop, FrameOutcome, SkipReason};
use crate::render::Framebuffer;

fn mounted(width: u32, height: u32) -> FrameLoop {
    FrameLoop::mount_seeded(SimulationConfig::default(), width, height, 42).unwrap()
}

#[test]
fn test_frame_ticks_and_paints() {
    let mut frame_loop = mounted(64, 48);
    let mut framebuffer = Framebuffer::new(64, 48);

    let outcome = frame_loop.frame(Some(&mut framebuffer.raster()));
    assert!(matches!(outcome, FrameOutcome::Rendered(_)));
    assert!(outcome.should_continue());
    assert_eq!(frame_loop.simulation().elapsed_ticks(), 1);

    // The background gradient is opaque, so every pixel has full alpha
    assert!(framebuffer.as_bytes().chunks(4).all(|px| px[3] == 255));
}

#[test]
fn test_missing_surface_skips_without_ticking() {
    let mut frame_loop = mounted(64, 48);

    let outcome = frame_loop.frame(None);
    assert_eq!(outcome, FrameOutcome::Skipped(SkipReason::SurfaceUnavailable));
    assert!(outcome.should_continue());
    assert_eq!(frame_loop.simulation().elapsed_ticks(), 0);
    assert!(frame_loop.is_running());
}

#[test]
fn test_unmount_stops_frames() {
    let mut frame_loop = mounted(64, 48);
    let mut framebuffer = Framebuffer::new(64, 48);
    frame_loop.frame(Some(&mut framebuffer.raster()));

    frame_loop.unmount();
    assert!(!frame_loop.is_running());

    // A frame the host had already queued still arrives
    let before = framebuffer.as_bytes().to_vec();
    let outcome = frame_loop.frame(Some(&mut framebuffer.raster()));
    assert_eq!(outcome, FrameOutcome::Skipped(SkipReason::Stopped));
    assert!(!outcome.should_continue());
    assert_eq!(frame_loop.simulation().elapsed_ticks(), 1);
    assert_eq!(framebuffer.as_bytes(), before.as_slice());

    frame_loop.unmount();
    assert_eq!(frame_loop.frame(None), FrameOutcome::Skipped(SkipReason::Stopped));
}

#[test]
fn test_unmount_before_first_frame() {
    let mut frame_loop = mounted(64, 48);
    frame_loop.unmount();
    assert_eq!(frame_loop.frame(None), FrameOutcome::Skipped(SkipReason::Stopped));
    assert_eq!(frame_loop.simulation().elapsed_ticks(), 0);
}

#[test]
fn test_resize_moves_the_star() {
    let mut frame_loop = mounted(64, 48);
    frame_loop.resize(200, 100);

    let simulation = frame_loop.simulation();
    assert_eq!(simulation.viewport().width, 200.0);
    assert_eq!(simulation.viewport().height, 100.0);
    assert_relative_eq!(simulation.photosphere_radius(), 12.0, epsilon = 1e-9);

    let mut framebuffer = Framebuffer::new(200, 100);
    assert!(matches!(
        frame_loop.frame(Some(&mut framebuffer.raster())),
        FrameOutcome::Rendered(_)
    ));
}

#[test]
fn test_ticks_per_frame_is_honored() {
    let mut config = SimulationConfig::default();
    config.render.ticks_per_frame = 3;
    let mut frame_loop = FrameLoop::mount(config, 32, 32, ChaChaRng::seed_from_u64(42)).unwrap();
    let mut framebuffer = Framebuffer::new(32, 32);

    for _ in 0..4 {
        frame_loop.frame(Some(&mut framebuffer.raster()));
    }
    assert_eq!(frame_loop.simulation().elapsed_ticks(), 12);
}

#[test]
fn test_invalid_config_fails_to_mount() {
    let mut config = SimulationConfig::default();
    config.emission.ambient_probability = -0.5;
    assert!(FrameLoop::mount_seeded(config, 64, 48, 42).is_err());
}
