//! # warp-starfield
//!
//! Pointer-steered "warp speed" starfield, rendered headlessly into a
//! software framebuffer, with a one-shot backend health status widget.
//!
//! # Architecture
//!
//! ```text
//! warp-starfield
//!   ├─> Host (tokio repaint interval, lifecycle events, pointer moves)
//!   │     └─> Animation Driver (mount/tick/pause/resize/unmount)
//!   │           ├─> Star Field (population, retirement, replenishment)
//!   │           │     └─> Star (kinematics)
//!   │           └─> Renderer (trail strokes onto a DrawingSurface)
//!   └─> Health Widget (single GET against /api/health)
//! ```
//!
//! # Data Flow
//!
//! **Frame Path:** Pointer X → acceleration → per-star velocity update →
//! position update → trail stroke → retire off-surface stars → replenish →
//! next frame requested
//!
//! **Lifecycle Path:** Host events → Driver state machine → Scheduler

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Starfield configuration
pub mod config;

/// Animation driver state machine
pub mod driver;

/// Error types
pub mod error;

/// Health status widget
pub mod health;

/// Headless host: repaint ticks, lifecycle events, element geometry
pub mod host;

/// Drawing surfaces and trail rendering
pub mod render;

/// Star kinematics and the star population
pub mod starfield;

pub use config::Config;
pub use driver::{AnimationDriver, DriverState, FrameStats};
pub use error::{Result, StarfieldError};
pub use host::{HostHandle, HostReport, StarfieldHost};
pub use render::{DrawingSurface, FrameBuffer};
pub use starfield::{Star, StarField, StarfieldOptions};
