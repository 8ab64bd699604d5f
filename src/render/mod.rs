//! Rendering
//!
//! - [`surface`]: the drawing context abstraction the animation targets
//! - [`framebuffer`]: software implementation with PNG export
//! - [`trail`]: per-star trail segment rendering

pub mod framebuffer;
pub mod surface;
pub mod trail;

pub use framebuffer::{FrameBuffer, PixelFormat};
pub use surface::{DrawingSurface, Rgba};
pub use trail::{draw_trail, trail_alpha, FULL_OPACITY_SPEED};
