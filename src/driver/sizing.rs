//! Backing-store sizing
//!
//! Computes the device-pixel size of the drawing surface from the host
//! element's logical size and pixel ratio, and suppresses redundant resize
//! notifications so observer noise cannot trigger repopulation storms.

/// Largest backing-store dimension in device pixels, as browsers cap
/// canvas size; larger requests are clamped
pub const MAX_BACKING_DIMENSION: u32 = 8192;

/// Backing-store size in device pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackingSize {
    /// Width in device pixels
    pub width: u32,
    /// Height in device pixels
    pub height: u32,
}

impl BackingSize {
    /// Device-pixel size for a logical size at a pixel ratio
    ///
    /// Each dimension is clamped to [`MAX_BACKING_DIMENSION`].
    pub fn for_logical(width: f64, height: f64, ratio: f64) -> Self {
        let to_device =
            |v: f64| (v * ratio).round().clamp(0.0, MAX_BACKING_DIMENSION as f64) as u32;
        Self {
            width: to_device(width),
            height: to_device(height),
        }
    }
}

/// Remembers the last applied size and pixel ratio
#[derive(Debug, Clone, Default)]
pub struct SurfaceSizer {
    last_ratio: Option<f64>,
    backing: Option<BackingSize>,
}

impl SurfaceSizer {
    /// Create a sizer that has not applied any size yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a size change
    ///
    /// Returns the new backing size, or `None` when neither the pixel ratio
    /// nor the computed backing size changed since the last applied call.
    pub fn apply(&mut self, width: f64, height: f64, ratio: f64) -> Option<BackingSize> {
        let next = BackingSize::for_logical(width, height, ratio);
        if self.last_ratio == Some(ratio) && self.backing == Some(next) {
            return None;
        }

        self.last_ratio = Some(ratio);
        self.backing = Some(next);
        Some(next)
    }

}
