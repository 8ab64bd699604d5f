//! Starfield simulation
//!
//! Stars spawn uniformly over the surface and accelerate outward along the
//! heading from the surface center they had at spawn. The horizontal
//! pointer position sets a single acceleration scalar shared by all stars.
//!
//! # Frame update
//!
//! ```text
//! pointer x ──> acceleration ──> velocity += heading * acc
//!                                  └─> previous = position
//!                                        └─> position += velocity
//!                                              └─> draw trail
//!                                                    └─> retire / replenish
//! ```
//!
//! # Options
//!
//! The snapshots this effect went through differed only in a handful of
//! knobs, all collected in [`StarfieldOptions`]:
//!
//! ```toml
//! [starfield]
//! star_count = 500
//! trail_fade = 0.08
//! density_aware = true
//! seed_previous_to_origin = false
//! ```

mod field;
mod pointer;
mod star;

pub use field::{acceleration_for, StarField};
pub use pointer::{PointerPosition, PointerState};
pub use star::{Star, Vec2};

use crate::error::{Result, StarfieldError};
use serde::{Deserialize, Serialize};

/// Tunables for the starfield effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarfieldOptions {
    /// Population kept alive every frame
    #[serde(default = "default_star_count")]
    pub star_count: usize,

    /// Opacity of the black overpaint each frame (lower = longer trails)
    #[serde(default = "default_trail_fade")]
    pub trail_fade: f64,

    /// Trail stroke width in logical pixels
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,

    /// Acceleration gained across the full surface width
    #[serde(default = "default_acceleration_scale")]
    pub acceleration_scale: f64,

    /// Acceleration with the pointer at the left edge
    #[serde(default = "default_acceleration_base")]
    pub acceleration_base: f64,

    /// Seed a new star's previous position at the origin (known defect)
    #[serde(default)]
    pub seed_previous_to_origin: bool,

    /// Size the backing store in device pixels (logical size x pixel ratio)
    #[serde(default = "default_true")]
    pub density_aware: bool,

    /// Drop all stars when the surface size changes
    #[serde(default = "default_true")]
    pub reset_on_resize: bool,
}

fn default_star_count() -> usize {
    500
}
fn default_trail_fade() -> f64 {
    0.08
}
fn default_stroke_width() -> f64 {
    2.0
}
fn default_acceleration_scale() -> f64 {
    0.2
}
fn default_acceleration_base() -> f64 {
    0.005
}
fn default_true() -> bool {
    true
}

impl Default for StarfieldOptions {
    fn default() -> Self {
        Self {
            star_count: default_star_count(),
            trail_fade: default_trail_fade(),
            stroke_width: default_stroke_width(),
            acceleration_scale: default_acceleration_scale(),
            acceleration_base: default_acceleration_base(),
            seed_previous_to_origin: false,
            density_aware: default_true(),
            reset_on_resize: default_true(),
        }
    }
}

impl StarfieldOptions {
    /// Check that every option is in range
    pub fn validate(&self) -> Result<()> {
        if self.star_count == 0 {
            return Err(StarfieldError::InvalidConfig(
                "star_count must be greater than 0".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.trail_fade) {
            return Err(StarfieldError::InvalidConfig(format!(
                "trail_fade ({}) must be between 0.0 and 1.0",
                self.trail_fade
            )));
        }

        if self.stroke_width.is_nan() || self.stroke_width <= 0.0 {
            return Err(StarfieldError::InvalidConfig(format!(
                "stroke_width ({}) must be positive",
                self.stroke_width
            )));
        }

        if !self.acceleration_scale.is_finite() || !self.acceleration_base.is_finite() {
            return Err(StarfieldError::InvalidConfig(
                "acceleration terms must be finite".to_string(),
            ));
        }

        Ok(())
    }

    /// Acceleration for a pointer at `pointer_x` on a surface `width` wide
    pub fn acceleration(&self, pointer_x: f64, width: f64) -> f64 {
        acceleration_for(
            pointer_x,
            width,
            self.acceleration_scale,
            self.acceleration_base,
        )
    }
}
