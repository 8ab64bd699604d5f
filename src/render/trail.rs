//! Trail rendering
//!
//! Each frame a star contributes one white segment from its previous to its
//! current position. Faster stars draw more opaque segments; older segments
//! fade because the driver overpaints the whole surface with translucent
//! black instead of clearing it.

use super::surface::{DrawingSurface, Rgba};
use crate::starfield::Star;

/// Speed (logical pixels per frame) at which a trail is fully opaque
pub const FULL_OPACITY_SPEED: f64 = 3.0;

/// Trail opacity for a given speed
pub fn trail_alpha(speed: f64) -> f64 {
    (speed / FULL_OPACITY_SPEED).clamp(0.0, 1.0)
}

/// Draw one star's trail segment
pub fn draw_trail<S>(star: &Star, surface: &mut S, stroke_width: f64)
where
    S: DrawingSurface + ?Sized,
{
    let color = Rgba::WHITE.with_alpha(trail_alpha(star.speed()));
    surface.stroke_line(
        star.previous_position(),
        star.position(),
        color,
        stroke_width,
    );
}
