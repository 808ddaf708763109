//! Run configuration.
//!
//! Defaults match the documented behaviour (20 concurrent requests, one
//! round). A TOML file can override any field; the CLI layers its flags on
//! top and calls [`ReplayConfig::validate`] before dispatching.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::ConfigError;

pub const DEFAULT_CONCURRENCY_LIMIT: usize = 20;
pub const DEFAULT_ROUNDS: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Maximum number of envelopes executing past the gate at once.
    pub concurrency_limit: usize,

    /// Number of sequential passes over the batch.
    pub rounds: u32,

    pub transport: TransportConfig,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            concurrency_limit: DEFAULT_CONCURRENCY_LIMIT,
            rounds: DEFAULT_ROUNDS,
            transport: TransportConfig::default(),
        }
    }
}

impl ReplayConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency_limit == 0 {
            return Err(ConfigError::MustBePositive {
                field: "concurrency_limit",
            });
        }
        if self.concurrency_limit > tokio::sync::Semaphore::MAX_PERMITS {
            return Err(ConfigError::TooLarge {
                field: "concurrency_limit",
                max: tokio::sync::Semaphore::MAX_PERMITS,
            });
        }
        if self.rounds == 0 {
            return Err(ConfigError::MustBePositive { field: "rounds" });
        }
        Ok(())
    }
}

/// HTTP client settings.
///
/// These apply to the client as a whole. The per-envelope `timeoutSeconds`
/// from the recording is not enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    pub connect_timeout_ms: Option<u64>,
    pub request_timeout_ms: Option<u64>,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: Some(10_000),
            request_timeout_ms: None,
            user_agent: concat!("replayer/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl TransportConfig {
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_ms.map(Duration::from_millis)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}
