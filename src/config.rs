//! Client credentials and configuration.

use crate::error::{Error, Result};
use crate::paapi::regions::Region;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Amazon Associates credentials, immutable for the client's lifetime.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub associate_tag: String,
    pub access_key_id: String,
    pub access_key_secret: String,
}

impl Credentials {
    /// Creates credentials, rejecting empty values.
    pub fn new(
        associate_tag: impl Into<String>,
        access_key_id: impl Into<String>,
        access_key_secret: impl Into<String>,
    ) -> Result<Self> {
        let credentials = Self {
            associate_tag: associate_tag.into(),
            access_key_id: access_key_id.into(),
            access_key_secret: access_key_secret.into(),
        };

        if credentials.associate_tag.is_empty()
            || credentials.access_key_id.is_empty()
            || credentials.access_key_secret.is_empty()
        {
            return Err(Error::Config(
                "your Amazon credentials are required and cannot be empty".into(),
            ));
        }

        Ok(credentials)
    }
}

/// Client configuration with validated limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Marketplace region
    #[serde(default)]
    pub region: Region,

    /// API version string
    #[serde(default = "default_version")]
    pub version: String,

    /// Service name sent with every request
    #[serde(default = "default_service")]
    pub service: String,

    /// Requests-per-second cap; None disables throttling
    #[serde(default)]
    pub qps: Option<f64>,

    /// Per-request timeout; None uses the transport default
    #[serde(default)]
    pub timeout: Option<Duration>,

    /// Additional attempts after the first failed request
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Fixed sleep between attempts
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff: Duration,
}

fn default_version() -> String {
    "2013-08-01".to_string()
}

fn default_service() -> String {
    "AWSECommerceService".to_string()
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff() -> Duration {
    Duration::from_secs(3)
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            region: Region::Us,
            version: default_version(),
            service: default_service(),
            qps: None,
            timeout: None,
            retry_count: default_retry_count(),
            retry_backoff: default_retry_backoff(),
        }
    }
}

impl ClientConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks limits that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if let Some(qps) = self.qps {
            if !qps.is_finite() || qps <= 0.0 {
                return Err(Error::Config(format!(
                    "qps (queries per second) must be a positive number, got {}",
                    qps
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.region, Region::Us);
        assert_eq!(config.version, "2013-08-01");
        assert_eq!(config.service, "AWSECommerceService");
        assert!(config.qps.is_none());
        assert!(config.timeout.is_none());
        assert_eq!(config.retry_count, 3);
        assert_eq!(config.retry_backoff, Duration::from_secs(3));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_credentials_required() {
        assert!(Credentials::new("tag-20", "AKIAEXAMPLE", "secret").is_ok());

        let err = Credentials::new("", "AKIAEXAMPLE", "secret").unwrap_err();
        assert!(err.to_string().contains("credentials"));
        assert!(Credentials::new("tag-20", "", "secret").is_err());
        assert!(Credentials::new("tag-20", "AKIAEXAMPLE", "").is_err());
    }

    #[test]
    fn test_qps_must_be_positive() {
        let mut config = ClientConfig::new();
        config.qps = Some(2.0);
        assert!(config.validate().is_ok());

        config.qps = Some(0.0);
        assert!(config.validate().is_err());

        config.qps = Some(-1.0);
        assert!(config.validate().is_err());

        config.qps = Some(f64::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_json() {
        let config: ClientConfig = serde_json::from_str(r#"{"region": "uk", "qps": 1.5}"#).unwrap();
        assert_eq!(config.region, Region::Uk);
        assert_eq!(config.qps, Some(1.5));
        // untouched fields keep their defaults
        assert_eq!(config.retry_count, 3);
        assert_eq!(config.service, "AWSECommerceService");
    }
}
