//! Host element geometry
//!
//! The element the surface is mounted into reports its on-screen logical
//! size and the device pixel ratio of the display it sits on.

use parking_lot::RwLock;
use std::sync::Arc;

/// Element the drawing surface is mounted into
pub trait HostElement: Send + Sync {
    /// Logical (CSS-pixel) width and height
    fn logical_size(&self) -> (f64, f64);

    /// Device pixels per logical pixel
    fn device_pixel_ratio(&self) -> f64;
}

/// Element geometry snapshot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementGeometry {
    /// Logical width
    pub width: f64,
    /// Logical height
    pub height: f64,
    /// Device pixel ratio
    pub device_pixel_ratio: f64,
}

/// In-memory element whose geometry can be changed from any thread
#[derive(Debug, Clone)]
pub struct VirtualElement {
    geometry: Arc<RwLock<ElementGeometry>>,
}

impl VirtualElement {
    /// Create an element with the given logical size and pixel ratio
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            geometry: Arc::new(RwLock::new(ElementGeometry {
                width,
                height,
                device_pixel_ratio,
            })),
        }
    }

    /// Change the logical size
    pub fn set_logical_size(&self, width: f64, height: f64) {
        let mut geometry = self.geometry.write();
        geometry.width = width;
        geometry.height = height;
    }

    /// Change the device pixel ratio (e.g. window moved to another display)
    pub fn set_device_pixel_ratio(&self, ratio: f64) {
        self.geometry.write().device_pixel_ratio = ratio;
    }

    /// Current geometry
    pub fn geometry(&self) -> ElementGeometry {
        *self.geometry.read()
    }
}

impl HostElement for VirtualElement {
    fn logical_size(&self) -> (f64, f64) {
        let geometry = self.geometry.read();
        (geometry.width, geometry.height)
    }

    fn device_pixel_ratio(&self) -> f64 {
        let ratio = self.geometry.read().device_pixel_ratio;
        if ratio > 0.0 {
            ratio
        } else {
            1.0
        }
    }
}
