//! Error types for the starfield crate
//!
//! The animation itself has no failure modes worth reporting; errors only
//! come from the edges (configuration, image export, the health probe and
//! the host event channel).

use thiserror::Error;

/// Result type for starfield operations
pub type Result<T> = std::result::Result<T, StarfieldError>;

/// Starfield error types
#[derive(Error, Debug)]
pub enum StarfieldError {
    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Framebuffer could not be converted or exported
    #[error("Surface error: {0}")]
    Surface(String),

    /// PNG encoding failed
    #[error("Image export failed: {0}")]
    Image(#[from] image::ImageError),

    /// HTTP request to the health endpoint failed
    #[error("Health request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The host loop has stopped and no longer accepts events
    #[error("Host event channel closed")]
    HostClosed,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
