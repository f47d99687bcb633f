//! Configuration management for RAX FTP Client
//!
//! Holds the server registry (name -> encrypted credential blob) together
//! with the knobs of the bulk transfer engine: pool size, retry budget,
//! and backoff shape.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::engine::BackoffPolicy;

/// Complete client configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    /// Number of parallel worker sessions for bulk transfers
    #[serde(default = "default_connections")]
    pub connections: usize,

    /// Attempt budget per transfer item before it is reported as failed
    #[serde(default = "default_retries")]
    pub retries: usize,

    /// Server used when no session, server name, or credentials are given
    #[serde(default = "default_server")]
    pub default_server: String,

    /// Named servers: each value is an encrypted credential blob that the
    /// configured vault decrypts to connection-descriptor JSON
    #[serde(default)]
    pub servers: HashMap<String, String>,

    /// Fixed delay added to every retry backoff, in milliseconds
    #[serde(default = "default_backoff_floor_ms")]
    pub backoff_floor_ms: u64,

    /// Base delay doubled per attempt, in milliseconds
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,

    /// Upper bound on a single backoff sleep, in seconds
    #[serde(default = "default_backoff_cap_secs")]
    pub backoff_cap_secs: u64,
}

fn default_connections() -> usize {
    5
}

fn default_retries() -> usize {
    5
}

fn default_server() -> String {
    "main".to_string()
}

fn default_backoff_floor_ms() -> u64 {
    200
}

fn default_backoff_base_ms() -> u64 {
    1_000
}

fn default_backoff_cap_secs() -> u64 {
    60
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connections: default_connections(),
            retries: default_retries(),
            default_server: default_server(),
            servers: HashMap::new(),
            backoff_floor_ms: default_backoff_floor_ms(),
            backoff_base_ms: default_backoff_base_ms(),
            backoff_cap_secs: default_backoff_cap_secs(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from client.toml with environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        // Try production path first, then development path
        Self::load_from(&["rax-ftp-client/client", "client"])
    }

    /// Load configuration from the first path that yields a readable source
    pub fn load_from(config_paths: &[&str]) -> Result<Self, ConfigError> {
        let mut last_error = None;

        for config_path in config_paths {
            match Config::builder()
                .add_source(File::with_name(config_path))
                .add_source(Environment::with_prefix("RAX_FTP_CLIENT").separator("_"))
                .build()
            {
                Ok(settings) => {
                    let config: ClientConfig = settings.try_deserialize()?;
                    config.validate()?;
                    return Ok(config);
                }
                Err(e) => {
                    last_error = Some(e);
                    continue;
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ConfigError::Message(format!(
                "no configuration source found, tried: {config_paths:?}"
            ))
        }))
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.connections == 0 {
            return Err(ConfigError::Message(
                "connections must be greater than 0".into(),
            ));
        }

        if self.retries == 0 {
            return Err(ConfigError::Message(
                "retries must be greater than 0".into(),
            ));
        }

        if self.default_server.is_empty() {
            return Err(ConfigError::Message(
                "default_server cannot be empty".into(),
            ));
        }

        if self.backoff_cap_secs == 0 {
            return Err(ConfigError::Message(
                "backoff_cap_secs must be greater than 0".into(),
            ));
        }

        if self.backoff_floor_ms > self.backoff_cap_secs * 1000 {
            return Err(ConfigError::Message(
                "backoff_floor_ms must not exceed backoff_cap_secs".into(),
            ));
        }

        Ok(())
    }

    /// Get the retry backoff shape as a policy
    pub fn backoff(&self) -> BackoffPolicy {
        BackoffPolicy::new(
            Duration::from_millis(self.backoff_floor_ms),
            Duration::from_millis(self.backoff_base_ms),
            Duration::from_secs(self.backoff_cap_secs),
        )
    }
}
