//! Software framebuffer
//!
//! Renders into a memory framebuffer with source-over alpha compositing.
//! This is the drawing surface used by the headless host and by tests; the
//! contents can be exported as PNG.

use super::surface::{DrawingSurface, Rgba};
use crate::error::{Result, StarfieldError};
use crate::starfield::Vec2;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Pixel format for framebuffer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelFormat {
    /// 32-bit RGBA (Red, Green, Blue, Alpha)
    #[default]
    #[serde(alias = "rgba")]
    RGBA8888,
    /// 32-bit BGRA (Blue, Green, Red, Alpha)
    #[serde(alias = "bgra")]
    BGRA8888,
}

impl PixelFormat {
    /// Get bytes per pixel
    pub fn bytes_per_pixel(&self) -> usize {
        4
    }

    /// Byte offsets of the red, green, blue and alpha channels within a pixel
    fn channel_offsets(&self) -> [usize; 4] {
        match self {
            Self::RGBA8888 => [0, 1, 2, 3],
            Self::BGRA8888 => [2, 1, 0, 3],
        }
    }
}

/// Memory framebuffer implementing [`DrawingSurface`]
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
    format: PixelFormat,
    /// Current logical-to-device scale
    transform: (f64, f64),
}

impl FrameBuffer {
    /// Create a transparent framebuffer
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        info!("Creating framebuffer: {}x{} {:?}", width, height, format);

        Self {
            data: vec![0; Self::byte_len(width, height, format)],
            width,
            height,
            format,
            transform: (1.0, 1.0),
        }
    }

    fn byte_len(width: u32, height: u32, format: PixelFormat) -> usize {
        width as usize * height as usize * format.bytes_per_pixel()
    }

    /// Framebuffer dimensions in device pixels
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Pixel format
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Get stride (bytes per row)
    pub fn stride(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel()
    }

    /// Raw pixel data in the framebuffer's format
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Current transform scale factors
    pub fn transform(&self) -> (f64, f64) {
        self.transform
    }

    /// Read a device pixel as `[r, g, b, a]`
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = self.offset(x, y);
        let [r, g, b, a] = self.format.channel_offsets();
        let px = &self.data[offset..offset + 4];
        Some([px[r], px[g], px[b], px[a]])
    }

    /// Number of pixels whose color channels are not all zero
    pub fn lit_pixel_count(&self) -> usize {
        self.data
            .chunks_exact(self.format.bytes_per_pixel())
            .filter(|px| {
                let [r, g, b, _] = self.format.channel_offsets();
                px[r] != 0 || px[g] != 0 || px[b] != 0
            })
            .count()
    }

    /// Convert to an RGBA image for export
    pub fn to_image(&self) -> Result<image::RgbaImage> {
        let [r, g, b, a] = self.format.channel_offsets();
        let rgba: Vec<u8> = self
            .data
            .chunks_exact(self.format.bytes_per_pixel())
            .flat_map(|px| [px[r], px[g], px[b], px[a]])
            .collect();

        image::RgbaImage::from_raw(self.width, self.height, rgba).ok_or_else(|| {
            StarfieldError::Surface(format!(
                "buffer does not match {}x{}",
                self.width, self.height
            ))
        })
    }

    /// Write the framebuffer as a PNG file
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.to_image()?
            .save_with_format(path, image::ImageFormat::Png)?;
        info!("Saved {}x{} snapshot to {}", self.width, self.height, path.display());
        Ok(())
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.stride() + x as usize * self.format.bytes_per_pixel()
    }

    fn to_device(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x * self.transform.0, p.y * self.transform.1)
    }

    /// Clamp a device-space span to `[0, limit]`
    fn clamp_span(start: f64, end: f64, limit: u32) -> (u32, u32) {
        let lo = start.max(0.0).min(limit as f64) as u32;
        let hi = end.max(0.0).min(limit as f64) as u32;
        (lo, hi)
    }

    /// Composite one color onto a device pixel (source-over)
    fn blend(&mut self, x: u32, y: u32, color: Rgba) {
        let offset = self.offset(x, y);
        let [ri, gi, bi, ai] = self.format.channel_offsets();
        let px = &mut self.data[offset..offset + 4];

        if color.a >= 1.0 {
            px[ri] = color.r;
            px[gi] = color.g;
            px[bi] = color.b;
            px[ai] = 255;
            return;
        }

        let src_a = color.a;
        let keep = 1.0 - src_a;
        let mix = |src: u8, dst: u8| (src as f64 * src_a + dst as f64 * keep).round() as u8;

        px[ri] = mix(color.r, px[ri]);
        px[gi] = mix(color.g, px[gi]);
        px[bi] = mix(color.b, px[bi]);
        px[ai] = (255.0 * src_a + px[ai] as f64 * keep).round() as u8;
    }
}

impl DrawingSurface for FrameBuffer {
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgba) {
        if color.is_transparent() {
            return;
        }

        let a = self.to_device(Vec2::new(x, y));
        let b = self.to_device(Vec2::new(x + width, y + height));

        let (x0, x1) = Self::clamp_span(a.x.min(b.x).round(), a.x.max(b.x).round(), self.width);
        let (y0, y1) = Self::clamp_span(a.y.min(b.y).round(), a.y.max(b.y).round(), self.height);

        for py in y0..y1 {
            for px in x0..x1 {
                self.blend(px, py, color);
            }
        }
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Rgba, width: f64) {
        if color.is_transparent() || width <= 0.0 {
            return;
        }

        let a = self.to_device(from);
        let b = self.to_device(to);
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let len_sq = dx * dx + dy * dy;

        // Butt caps: a zero-length segment covers nothing
        if len_sq < f64::EPSILON {
            return;
        }

        let half = width * (self.transform.0 + self.transform.1) / 4.0;
        let (x0, x1) = Self::clamp_span(
            (a.x.min(b.x) - half).floor(),
            (a.x.max(b.x) + half).ceil(),
            self.width,
        );
        let (y0, y1) = Self::clamp_span(
            (a.y.min(b.y) - half).floor(),
            (a.y.max(b.y) + half).ceil(),
            self.height,
        );

        for py in y0..y1 {
            for px in x0..x1 {
                let cx = px as f64 + 0.5;
                let cy = py as f64 + 0.5;

                let t = ((cx - a.x) * dx + (cy - a.y) * dy) / len_sq;
                if !(0.0..=1.0).contains(&t) {
                    continue;
                }

                let qx = a.x + t * dx - cx;
                let qy = a.y + t * dy - cy;
                if qx * qx + qy * qy <= half * half {
                    self.blend(px, py, color);
                }
            }
        }
    }

    fn set_transform_identity(&mut self) {
        self.transform = (1.0, 1.0);
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.transform.0 *= sx;
        self.transform.1 *= sy;
    }

    fn resize_backing(&mut self, width: u32, height: u32) {
        debug!(
            "Resizing framebuffer: {}x{} -> {}x{}",
            self.width, self.height, width, height
        );

        self.data = vec![0; Self::byte_len(width, height, self.format)];
        self.width = width;
        self.height = height;
        self.transform = (1.0, 1.0);
    }

    fn backing_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
