//! Health endpoint probes

use async_trait::async_trait;
use tracing::debug;

use crate::config::HealthConfig;
use crate::error::Result;

/// Source of the raw health endpoint body
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// Fetch the response body once
    async fn fetch(&self) -> Result<String>;
}

/// Probe that issues a single HTTP GET
#[derive(Debug, Clone)]
pub struct HttpHealthProbe {
    client: reqwest::Client,
    url: String,
}

impl HttpHealthProbe {
    /// Build a probe for the configured environment
    pub fn from_config(config: &HealthConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            client,
            url: config.url(),
        })
    }

    /// Endpoint being probed
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl HealthProbe for HttpHealthProbe {
    async fn fetch(&self) -> Result<String> {
        debug!("GET {}", self.url);
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("Health endpoint answered {} ({} bytes)", status, body.len());
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;

    #[test]
    fn test_probe_url_from_config() {
        let config = HealthConfig {
            environment: Environment::Development,
            development_url: "http://localhost:9000/".to_string(),
            ..HealthConfig::default()
        };
        let probe = HttpHealthProbe::from_config(&config).unwrap();
        assert_eq!(probe.url(), "http://localhost:9000/api/health");
    }
}
