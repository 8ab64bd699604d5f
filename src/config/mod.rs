//! Configuration management
//!
//! Handles loading, validation, and merging of configuration from:
//! - TOML files
//! - Environment variables
//! - CLI arguments

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod types;

pub use types::{Environment, FrameConfig, HealthConfig, LoggingConfig, SurfaceConfig};

use crate::driver::MAX_BACKING_DIMENSION;
use crate::starfield::StarfieldOptions;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Fixed RNG seed for reproducible frames
    #[serde(default)]
    pub seed: Option<u64>,
    /// Starfield effect options
    #[serde(default)]
    pub starfield: StarfieldOptions,
    /// Drawing surface configuration
    #[serde(default)]
    pub surface: SurfaceConfig,
    /// Repaint tick configuration
    #[serde(default)]
    pub frame: FrameConfig,
    /// Health widget configuration
    #[serde(default)]
    pub health: HealthConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Values supplied on the command line, applied over the file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Logical surface width
    pub width: Option<u32>,
    /// Logical surface height
    pub height: Option<u32>,
    /// Device pixel ratio
    pub device_pixel_ratio: Option<f64>,
    /// Repaint rate
    pub target_fps: Option<u32>,
    /// Frame limit
    pub max_frames: Option<u64>,
    /// Star population
    pub star_count: Option<usize>,
    /// Force the health probe on
    pub health: bool,
    /// RNG seed
    pub seed: Option<u64>,
    /// Log output format
    pub log_format: Option<String>,
    /// Log file
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Create default configuration
    pub fn default_config() -> Self {
        Self::default()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.starfield
            .validate()
            .context("Invalid [starfield] section")?;

        if self.surface.width == 0 || self.surface.height == 0 {
            anyhow::bail!(
                "Surface size must be non-zero, got {}x{}",
                self.surface.width,
                self.surface.height
            );
        }

        if self.surface.width > MAX_BACKING_DIMENSION
            || self.surface.height > MAX_BACKING_DIMENSION
        {
            anyhow::bail!(
                "Surface size {}x{} exceeds the {} pixel limit",
                self.surface.width,
                self.surface.height,
                MAX_BACKING_DIMENSION
            );
        }

        if !(self.surface.device_pixel_ratio > 0.0 && self.surface.device_pixel_ratio.is_finite())
        {
            anyhow::bail!(
                "Invalid device pixel ratio: {}",
                self.surface.device_pixel_ratio
            );
        }

        if !(1..=240).contains(&self.frame.target_fps) {
            anyhow::bail!(
                "target_fps ({}) must be between 1 and 240",
                self.frame.target_fps
            );
        }

        if self.health.enabled {
            if !self.health.endpoint.starts_with('/') {
                anyhow::bail!("Health endpoint must start with '/': {}", self.health.endpoint);
            }
            if self.health.timeout_ms == 0 {
                anyhow::bail!("Health timeout must be greater than 0");
            }
        }

        match self.logging.format.as_str() {
            "pretty" | "compact" | "json" => {}
            _ => anyhow::bail!("Invalid log format: {}", self.logging.format),
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Invalid log level: {}", self.logging.level),
        }

        Ok(())
    }

    /// Override config with CLI arguments
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(width) = overrides.width {
            self.surface.width = width;
        }
        if let Some(height) = overrides.height {
            self.surface.height = height;
        }
        if let Some(ratio) = overrides.device_pixel_ratio {
            self.surface.device_pixel_ratio = ratio;
        }
        if let Some(fps) = overrides.target_fps {
            self.frame.target_fps = fps;
        }
        if let Some(frames) = overrides.max_frames {
            self.frame.max_frames = frames;
        }
        if let Some(count) = overrides.star_count {
            self.starfield.star_count = count;
        }
        if overrides.health {
            self.health.enabled = true;
        }
        if overrides.seed.is_some() {
            self.seed = overrides.seed;
        }
        if let Some(format) = &overrides.log_format {
            self.logging.format = format.clone();
        }
        if overrides.log_file.is_some() {
            self.logging.log_file = overrides.log_file.clone();
        }

        self
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
