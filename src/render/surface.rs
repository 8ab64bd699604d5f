//! Drawing surface abstraction
//!
//! The minimal 2-D immediate-mode context the animation needs: rectangle
//! fills, line strokes and a scale transform for density-aware backing
//! stores. All coordinates passed in are logical; implementations map them
//! to device pixels through the current transform.

use crate::starfield::Vec2;

/// Color with 8-bit channels and a fractional alpha in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Opacity (0.0 = transparent, 1.0 = opaque)
    pub a: f64,
}

impl Rgba {
    /// Opaque black
    pub const BLACK: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 1.0,
    };

    /// Opaque white
    pub const WHITE: Self = Self {
        r: 255,
        g: 255,
        b: 255,
        a: 1.0,
    };

    /// Create a new color; alpha is clamped to `[0, 1]`
    pub fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self {
            r,
            g,
            b,
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Same color with a different alpha
    pub fn with_alpha(self, a: f64) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Whether drawing with this color has any visible effect
    pub fn is_transparent(&self) -> bool {
        self.a <= 0.0
    }
}

/// 2-D immediate-mode drawing context
#[cfg_attr(test, mockall::automock)]
pub trait DrawingSurface {
    /// Fill a logical rectangle, compositing translucent colors source-over
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgba);

    /// Stroke a straight line segment of the given logical width
    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Rgba, width: f64);

    /// Reset the drawing transform to identity
    fn set_transform_identity(&mut self);

    /// Multiply the current transform by a scale
    fn scale(&mut self, sx: f64, sy: f64);

    /// Reallocate the backing store in device pixels
    ///
    /// Contents are discarded and the transform is reset, as a canvas does
    /// when its width or height attribute changes.
    fn resize_backing(&mut self, width: u32, height: u32);

    /// Backing store size in device pixels
    fn backing_size(&self) -> (u32, u32);
}
