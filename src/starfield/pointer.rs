//! Pointer state
//!
//! Single-writer / single-reader cell: the pointer listener writes the
//! latest position and the frame routine reads it by value once per tick.

use parking_lot::Mutex;
use std::sync::Arc;

/// Pointer position in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerPosition {
    /// Horizontal position
    pub x: f64,
    /// Vertical position (tracked, not used for acceleration)
    pub y: f64,
}

/// Shared handle to the latest pointer position
#[derive(Debug, Clone, Default)]
pub struct PointerState {
    inner: Arc<Mutex<PointerPosition>>,
}

impl PointerState {
    /// Create pointer state at the origin
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pointer move
    pub fn set(&self, x: f64, y: f64) {
        *self.inner.lock() = PointerPosition { x, y };
    }

    /// Latest pointer position
    pub fn get(&self) -> PointerPosition {
        *self.inner.lock()
    }
}
