//! Health status widget
//!
//! Fetches the backend health endpoint once and exposes the text to show:
//! a loading placeholder, the raw response body, or a fixed failure message.
//! There is no retry and no polling.

pub mod probe;

pub use probe::{HealthProbe, HttpHealthProbe};

use std::fmt;
use tracing::{error, info};

/// Text shown when the request fails for any reason
pub const FETCH_FAILED_TEXT: &str = "Failed to fetch health status";

/// Text shown before the request completes
pub const LOADING_TEXT: &str = "Loading...";

/// Current widget status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Request not finished
    Loading,
    /// Raw response body
    Ready(String),
    /// Request failed
    Failed,
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loading => f.write_str(LOADING_TEXT),
            Self::Ready(body) => f.write_str(body),
            Self::Failed => f.write_str(FETCH_FAILED_TEXT),
        }
    }
}

/// Health widget state around a probe
pub struct HealthWidget<P> {
    probe: P,
    status: HealthStatus,
}

impl<P: HealthProbe> HealthWidget<P> {
    /// Create a widget in the loading state
    pub fn new(probe: P) -> Self {
        Self {
            probe,
            status: HealthStatus::Loading,
        }
    }

    /// Issue the single request and record the outcome
    pub async fn refresh(&mut self) -> &HealthStatus {
        self.status = match self.probe.fetch().await {
            Ok(body) => {
                info!("Health check answered: {}", body.trim());
                HealthStatus::Ready(body)
            }
            Err(e) => {
                error!("Error fetching health status: {}", e);
                HealthStatus::Failed
            }
        };
        &self.status
    }

    /// Current status
    pub fn status(&self) -> &HealthStatus {
        &self.status
    }

    /// Line rendered by the widget
    pub fn display(&self) -> String {
        format!("Health Check: {}", self.status)
    }
}
