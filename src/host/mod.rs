//! Headless starfield host
//!
//! Plays the part of the page the animation is mounted into: a repaint
//! tick at a fixed rate, visibility and resize notifications, and pointer
//! moves. The host mounts the driver, forwards lifecycle events to it and
//! unmounts it when the loop ends.
//!
//! # Architecture
//!
//! ```text
//! HostHandle ──mpsc──> HostEvent ─┐
//!     │                           ├─> StarfieldHost::run (tokio::select!)
//!     │        repaint interval ──┘          │
//!     │                                      ├─> AnimationDriver::tick
//!     └─> PointerState (written directly) ───┘
//! ```
//!
//! Events are polled before repaint ticks so a visibility change queued
//! ahead of a tick always wins.

pub mod element;
pub mod scheduler;

pub use element::{ElementGeometry, HostElement, VirtualElement};
pub use scheduler::{FrameHandle, FrameScheduler, TickScheduler};

use crate::config::{Config, FrameConfig};
use crate::driver::{AnimationDriver, DriverState, FrameStats};
use crate::error::{Result, StarfieldError};
use crate::render::{DrawingSurface, FrameBuffer};
use crate::starfield::PointerState;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Capacity of the host event channel
const EVENT_CHANNEL_SIZE: usize = 64;

/// Lifecycle events delivered to the host loop
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// Element logical size changed
    Resize {
        /// New logical width
        width: f64,
        /// New logical height
        height: f64,
    },
    /// Device pixel ratio changed
    DevicePixelRatio(f64),
    /// Page visibility changed
    Visibility(bool),
    /// Stop the loop and unmount
    Shutdown,
}

/// Cloneable handle for delivering events to a running host
#[derive(Debug, Clone)]
pub struct HostHandle {
    sender: mpsc::Sender<HostEvent>,
    pointer: PointerState,
}

impl HostHandle {
    /// Report a new element size
    pub async fn resize(&self, width: f64, height: f64) -> Result<()> {
        self.send(HostEvent::Resize { width, height }).await
    }

    /// Report a new device pixel ratio
    pub async fn set_device_pixel_ratio(&self, ratio: f64) -> Result<()> {
        self.send(HostEvent::DevicePixelRatio(ratio)).await
    }

    /// Report a page visibility change
    pub async fn set_visible(&self, visible: bool) -> Result<()> {
        self.send(HostEvent::Visibility(visible)).await
    }

    /// Ask the host to unmount and stop
    pub async fn shutdown(&self) -> Result<()> {
        self.send(HostEvent::Shutdown).await
    }

    /// Record a pointer move
    ///
    /// Written straight into the shared pointer cell; the next frame reads it.
    pub fn pointer_move(&self, x: f64, y: f64) {
        self.pointer.set(x, y);
    }

    async fn send(&self, event: HostEvent) -> Result<()> {
        self.sender
            .send(event)
            .await
            .map_err(|_| StarfieldError::HostClosed)
    }
}

/// Outcome of a host run
#[derive(Debug)]
pub struct HostReport<S> {
    /// Surface as it was when the loop stopped
    pub surface: S,
    /// Driver counters
    pub stats: FrameStats,
    /// Driver state after the loop (normally `TornDown`)
    pub final_state: DriverState,
}

/// Host that runs an [`AnimationDriver`] on a tokio repaint interval
pub struct StarfieldHost<S> {
    driver: AnimationDriver<S>,
    element: Option<VirtualElement>,
    scheduler: TickScheduler,
    events: mpsc::Receiver<HostEvent>,
    frame_interval: Duration,
    max_frames: Option<u64>,
}

impl StarfieldHost<FrameBuffer> {
    /// Build a framebuffer-backed host from configuration
    pub fn from_config(config: &Config) -> (Self, HostHandle) {
        let surface = FrameBuffer::new(
            config.surface.width,
            config.surface.height,
            config.surface.pixel_format,
        );
        let element = VirtualElement::new(
            config.surface.width as f64,
            config.surface.height as f64,
            config.surface.device_pixel_ratio,
        );
        let pointer = PointerState::new();
        let driver = match config.seed {
            Some(seed) => {
                AnimationDriver::with_seed(surface, config.starfield.clone(), pointer, seed)
            }
            None => AnimationDriver::new(surface, config.starfield.clone(), pointer),
        };
        Self::with_driver(driver, Some(element), &config.frame)
    }
}

impl<S: DrawingSurface> StarfieldHost<S> {
    /// Create a host around an existing driver
    ///
    /// Without an element the driver is never mounted and the loop only
    /// waits for shutdown.
    pub fn with_driver(
        driver: AnimationDriver<S>,
        element: Option<VirtualElement>,
        frame: &FrameConfig,
    ) -> (Self, HostHandle) {
        let (sender, events) = mpsc::channel(EVENT_CHANNEL_SIZE);
        let handle = HostHandle {
            sender,
            pointer: driver.pointer().clone(),
        };

        let host = Self {
            driver,
            element,
            scheduler: TickScheduler::new(),
            events,
            frame_interval: frame.frame_interval(),
            max_frames: frame.frame_limit(),
        };
        (host, handle)
    }

    /// Mount the driver and run until shutdown, channel close or frame limit
    pub async fn run(self) -> Result<HostReport<S>> {
        let Self {
            mut driver,
            element,
            mut scheduler,
            mut events,
            frame_interval,
            max_frames,
        } = self;

        if !driver.mount(element.as_ref(), &mut scheduler) {
            info!("Starfield host started without a surface; waiting for shutdown");
        }

        let mut interval = tokio::time::interval(frame_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            "Starfield host running at {:.1} fps",
            1.0 / frame_interval.as_secs_f64()
        );

        loop {
            tokio::select! {
                biased;

                event = events.recv() => {
                    let Some(event) = event else {
                        debug!("All host handles dropped");
                        break;
                    };
                    let Some(element) = element.as_ref() else {
                        if event == HostEvent::Shutdown {
                            break;
                        }
                        continue;
                    };

                    match event {
                        HostEvent::Resize { width, height } => {
                            let valid = |v: f64| v.is_finite() && v >= 0.0;
                            if valid(width) && valid(height) {
                                element.set_logical_size(width, height);
                                driver.resize(element);
                            } else {
                                warn!("Ignoring invalid element size {}x{}", width, height);
                            }
                        }
                        HostEvent::DevicePixelRatio(ratio) => {
                            if ratio > 0.0 {
                                element.set_device_pixel_ratio(ratio);
                                driver.resize(element);
                            } else {
                                warn!("Ignoring invalid device pixel ratio {}", ratio);
                            }
                        }
                        HostEvent::Visibility(visible) => {
                            driver.set_visible(visible, element, &mut scheduler);
                        }
                        HostEvent::Shutdown => {
                            info!("Starfield host shutdown requested");
                            break;
                        }
                    }
                }

                _ = interval.tick() => {
                    let (Some(handle), Some(element)) = (scheduler.take_due(), element.as_ref()) else {
                        continue;
                    };
                    driver.tick(handle, element, &mut scheduler);

                    if let Some(limit) = max_frames {
                        if driver.stats().frames_rendered >= limit {
                            info!("Frame limit {} reached", limit);
                            break;
                        }
                    }
                }
            }
        }

        driver.unmount(&mut scheduler);

        let stats = driver.stats().clone();
        let final_state = driver.state();
        Ok(HostReport {
            surface: driver.into_surface(),
            stats,
            final_state,
        })
    }
}
