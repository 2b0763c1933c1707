//! Desktop viewer: runs the animation in a resizable window.
//!
//! Usage: `corona-viewer [config.json]`. Set `RUST_LOG=info` to see flare
//! and CME announcements, `RUST_LOG=debug` for every event.

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use pixels::{Pixels, SurfaceTexture};
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use corona::config::SimulationConfig;
use corona::{FrameLoop, FrameOutcome, Raster};

fn main() -> Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => SimulationConfig::from_json_file(&path)
            .with_context(|| format!("loading config from {}", path))?,
        None => SimulationConfig::default(),
    };

    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title("Corona")
        .with_inner_size(LogicalSize::new(960.0, 720.0))
        .with_min_inner_size(LogicalSize::new(240.0, 180.0))
        .build(&event_loop)
        .context("creating window")?;

    let size = window.inner_size();
    let mut width = size.width.max(1);
    let mut height = size.height.max(1);
    let surface_texture = SurfaceTexture::new(width, height, &window);
    let mut pixels = Pixels::new(width, height, surface_texture).context("creating pixel surface")?;

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default();
    log::info!("seed {}", seed);
    let mut frame_loop = FrameLoop::mount_seeded(config, width, height, seed)?;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    frame_loop.unmount();
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            state: ElementState::Pressed,
                            virtual_keycode: Some(VirtualKeyCode::Escape),
                            ..
                        },
                    ..
                } => {
                    frame_loop.unmount();
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::Resized(new_size) => {
                    width = new_size.width.max(1);
                    height = new_size.height.max(1);
                    resize(&mut pixels, &mut frame_loop, width, height);
                }
                WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                    width = new_inner_size.width.max(1);
                    height = new_inner_size.height.max(1);
                    resize(&mut pixels, &mut frame_loop, width, height);
                }
                _ => {}
            },
            Event::MainEventsCleared => {
                if frame_loop.is_running() {
                    window.request_redraw();
                }
            }
            Event::RedrawRequested(_) => {
                let outcome = match Raster::new(width, height, pixels.frame_mut()) {
                    Some(mut raster) => frame_loop.frame(Some(&mut raster)),
                    None => frame_loop.frame(None),
                };

                match outcome {
                    FrameOutcome::Rendered(_) => {
                        if let Err(e) = pixels.render() {
                            log::error!("pixels.render() failed: {e}");
                            frame_loop.unmount();
                            *control_flow = ControlFlow::Exit;
                        }
                    }
                    outcome if !outcome.should_continue() => *control_flow = ControlFlow::Exit,
                    FrameOutcome::Skipped(_) => {}
                }
            }
            _ => {}
        }
    });
}

/// Keeps the window surface, the pixel buffer and the simulation viewport in step
fn resize(pixels: &mut Pixels, frame_loop: &mut FrameLoop, width: u32, height: u32) {
    if let Err(e) = pixels.resize_surface(width, height) {
        log::error!("resize surface error: {e}");
    }
    if let Err(e) = pixels.resize_buffer(width, height) {
        log::error!("resize buffer error: {e}");
    }
    frame_loop.resize(width, height);
}
