//! WASM bindings for the corona animation.
//!
//! Each mounted animation lives in thread-local storage (WASM is
//! single-threaded) and is addressed by an opaque ID. The page owns the
//! `<canvas>` and the animation-frame loop; every call to [`corona_frame`]
//! advances the simulation and hands back a fresh RGBA buffer.
//!
//! # Example Usage (JavaScript)
//!
//! ```javascript
//! const canvas = document.getElementById("sun");
//! const ctx = canvas.getContext("2d");
//! const id = corona_mount(canvas.width, canvas.height, 42);
//!
//! function draw() {
//!   const pixels = corona_frame(id);
//!   if (pixels === undefined) return; // unmounted
//!   const image = new ImageData(new Uint8ClampedArray(pixels), canvas.width, canvas.height);
//!   ctx.putImageData(image, 0, 0);
//!   requestAnimationFrame(draw);
//! }
//! requestAnimationFrame(draw);
//!
//! window.addEventListener("resize", () => {
//!   canvas.width = window.innerWidth;
//!   canvas.height = window.innerHeight;
//!   corona_resize(id, canvas.width, canvas.height);
//! });
//!
//! // On teardown
//! corona_unmount(id);
//! ```

use std::cell::RefCell;
use std::collections::HashMap;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use corona::config::SimulationConfig;
use corona::{FrameLoop, FrameOutcome, Framebuffer};

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsError::new(&e.to_string()))
}

fn from_js<T: serde::de::DeserializeOwned>(value: JsValue) -> Result<T, JsError> {
    serde_wasm_bindgen::from_value(value).map_err(|e| JsError::new(&e.to_string()))
}

/// A frame loop plus the pixel buffer it paints into
struct Mount {
    frame_loop: FrameLoop,
    framebuffer: Framebuffer,
}

thread_local! {
    static MOUNTS: RefCell<HashMap<u32, Mount>> = RefCell::new(HashMap::new());
    static NEXT_MOUNT_ID: RefCell<u32> = const { RefCell::new(0) };
}

/// Whether `id` was handed out by a mount, live or since unmounted
fn issued(id: u32) -> bool {
    NEXT_MOUNT_ID.with(|next_id| id < *next_id.borrow())
}

fn not_found(id: u32) -> JsError {
    JsError::new(&format!("Animation {} not found", id))
}

fn register(frame_loop: FrameLoop, width: u32, height: u32) -> u32 {
    let id = NEXT_MOUNT_ID.with(|next_id| {
        let mut id = next_id.borrow_mut();
        let current = *id;
        *id += 1;
        current
    });
    log::debug!("animation {} mounted at {}x{}", id, width, height);

    MOUNTS.with(|mounts| {
        mounts.borrow_mut().insert(
            id,
            Mount {
                frame_loop,
                framebuffer: Framebuffer::new(width, height),
            },
        );
    });

    id
}

fn mount(config: SimulationConfig, width: u32, height: u32, seed: u32) -> Result<u32, JsError> {
    let frame_loop = FrameLoop::mount_seeded(config, width, height, u64::from(seed))
        .map_err(|e| JsError::new(&e.to_string()))?;
    Ok(register(frame_loop, width, height))
}

// =============================================================================
// Lifecycle
// =============================================================================

/// Mount an animation with the default configuration.
///
/// # Arguments
/// * `width` - Canvas width in pixels
/// * `height` - Canvas height in pixels
/// * `seed` - Random seed; the same seed replays the same sequence of events
///
/// # Returns
/// The animation ID used by every other call
#[wasm_bindgen]
pub fn corona_mount(width: u32, height: u32, seed: u32) -> Result<u32, JsError> {
    mount(SimulationConfig::default(), width, height, seed)
}

/// Mount an animation with a configuration object.
///
/// Missing fields take their defaults, so `{ scheduler: { cmeBurstSize: 120 } }`
/// is enough to make ejections denser.
#[wasm_bindgen]
pub fn corona_mount_with_config(width: u32, height: u32, seed: u32, config: JsValue) -> Result<u32, JsError> {
    let config: SimulationConfig = from_js(config)?;
    mount(config, width, height, seed)
}

/// Advance one frame and return the canvas contents as RGBA bytes.
///
/// Returns `undefined` once the animation is unmounted, so a frame the
/// browser had already scheduled does nothing.
#[wasm_bindgen]
pub fn corona_frame(id: u32) -> Result<Option<Vec<u8>>, JsError> {
    MOUNTS.with(|mounts| {
        let mut mounts = mounts.borrow_mut();
        let Some(Mount {
            frame_loop,
            framebuffer,
        }) = mounts.get_mut(&id)
        else {
            return if issued(id) { Ok(None) } else { Err(not_found(id)) };
        };

        let mut raster = framebuffer.raster();
        match frame_loop.frame(Some(&mut raster)) {
            FrameOutcome::Rendered(_) => Ok(Some(framebuffer.as_bytes().to_vec())),
            FrameOutcome::Skipped(_) => Ok(None),
        }
    })
}

/// Resize the animation to a new canvas size. The next frame uses it.
///
/// A resize arriving after unmount is ignored.
#[wasm_bindgen]
pub fn corona_resize(id: u32, width: u32, height: u32) -> Result<(), JsError> {
    MOUNTS.with(|mounts| {
        let mut mounts = mounts.borrow_mut();
        let Some(mount) = mounts.get_mut(&id) else {
            return if issued(id) { Ok(()) } else { Err(not_found(id)) };
        };
        mount.framebuffer.resize(width, height);
        mount.frame_loop.resize(width, height);
        Ok(())
    })
}

/// Stop the animation and free its simulation. Safe to call more than once.
///
/// The ID is retired rather than reused, so late `corona_frame` calls
/// return `undefined` instead of failing.
#[wasm_bindgen]
pub fn corona_unmount(id: u32) {
    let removed = MOUNTS.with(|mounts| mounts.borrow_mut().remove(&id));
    if let Some(mut mount) = removed {
        mount.frame_loop.unmount();
    }
}

// =============================================================================
// State queries
// =============================================================================

/// Current flare and CME state
///
/// Returns `{ flareIntensity, cmeActive, cmeIntensity, nextFlareTime, nextCmeTime }`
#[wasm_bindgen]
pub fn corona_activity(id: u32) -> Result<JsValue, JsError> {
    MOUNTS.with(|mounts| {
        let mounts = mounts.borrow();
        let mount = mounts.get(&id).ok_or_else(|| not_found(id))?;
        to_js(mount.frame_loop.simulation().activity())
    })
}

/// Number of live particles
#[wasm_bindgen]
pub fn corona_particle_count(id: u32) -> Result<usize, JsError> {
    MOUNTS.with(|mounts| {
        let mounts = mounts.borrow();
        let mount = mounts.get(&id).ok_or_else(|| not_found(id))?;
        Ok(mount.frame_loop.simulation().particles().len())
    })
}
