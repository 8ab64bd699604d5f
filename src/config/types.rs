//! Configuration type definitions

use crate::render::PixelFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Drawing surface configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Logical width of the host element
    pub width: u32,

    /// Logical height of the host element
    pub height: u32,

    /// Device pixels per logical pixel
    pub device_pixel_ratio: f64,

    /// Framebuffer pixel format ("RGBA8888"/"rgba", "BGRA8888"/"bgra")
    pub pixel_format: PixelFormat,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            device_pixel_ratio: 1.0,
            pixel_format: PixelFormat::default(),
        }
    }
}

/// Repaint tick configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Repaint ticks per second
    pub target_fps: u32,

    /// Stop after this many rendered frames (0 = run until shutdown)
    pub max_frames: u64,
}

impl FrameConfig {
    /// Time between repaint ticks
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.target_fps.max(1) as f64)
    }

    /// Frame limit, if any
    pub fn frame_limit(&self) -> Option<u64> {
        (self.max_frames > 0).then_some(self.max_frames)
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            max_frames: 0,
        }
    }
}

/// Deployment environment; selects the health endpoint origin
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development: backend on its own port
    #[default]
    Development,
    /// Production: backend served from the production origin
    Production,
}

/// Health status widget configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Probe the health endpoint on startup
    pub enabled: bool,

    /// Which origin to use
    pub environment: Environment,

    /// Backend origin during development
    pub development_url: String,

    /// Backend origin in production
    pub production_url: String,

    /// Endpoint path
    pub endpoint: String,

    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

fn default_endpoint() -> String {
    "/api/health".to_string()
}

fn default_timeout_ms() -> u64 {
    5000
}

impl HealthConfig {
    /// Full URL of the health endpoint for the configured environment
    pub fn url(&self) -> String {
        let origin = match self.environment {
            Environment::Development => &self.development_url,
            Environment::Production => &self.production_url,
        };
        format!("{}{}", origin.trim_end_matches('/'), self.endpoint)
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            environment: Environment::Development,
            development_url: "http://localhost:8080".to_string(),
            production_url: "http://127.0.0.1:8080".to_string(),
            endpoint: default_endpoint(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level ("trace", "debug", "info", "warn", "error")
    pub level: String,

    /// Output format ("pretty", "compact", "json")
    pub format: String,

    /// Also write logs to this file
    pub log_file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            log_file: None,
        }
    }
}
