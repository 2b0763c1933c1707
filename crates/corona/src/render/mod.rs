//! Frame rendering: the drawing surface abstraction, a software rasterizer
//! that implements it, and the painter that draws the star and particles.

pub mod canvas;
pub mod painter;
pub mod raster;


pub use canvas::{Canvas, ColorStop, LinearGradient, Paint, RadialGradient, Stops};
pub use painter::{Painter, Scene};
pub use raster::{Framebuffer, Raster};
