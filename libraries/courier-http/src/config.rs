/// Networking configuration
use crate::compression::CompressionRules;
use crate::error::{NetworkingError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkingConfig {
    /// Whole-request timeout applied by the HTTP client
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// URL patterns whose JSON uploads are gzip-compressed
    #[serde(default)]
    pub compressed_uploads: Vec<CompressionRuleConfig>,
}

/// One entry of the upload compression whitelist.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CompressionRuleConfig {
    pub key: String,
    /// Regular expression that must match the whole request URL
    pub pattern: String,
}

impl NetworkingConfig {
    /// Load configuration from an optional TOML file and the environment.
    ///
    /// Environment variables use the `COURIER_` prefix, e.g.
    /// `COURIER_TIMEOUT_SECS=60`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = path {
            settings = settings.add_source(config::File::from(path.to_path_buf()));
        }

        settings = settings.add_source(
            config::Environment::with_prefix("COURIER")
                .prefix_separator("_")
                .try_parsing(true),
        );

        let config: Self = settings
            .build()
            .map_err(|e| NetworkingError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| NetworkingError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 || self.connect_timeout_secs == 0 {
            return Err(NetworkingError::Config(
                "timeouts must be greater than zero".to_string(),
            ));
        }

        if self.user_agent.trim().is_empty() {
            return Err(NetworkingError::Config(
                "user agent cannot be empty".to_string(),
            ));
        }

        self.compression_rules().map(|_| ())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Build a fresh rule table from `compressed_uploads`.
    pub fn compression_rules(&self) -> Result<CompressionRules> {
        let rules = CompressionRules::new();
        for rule in &self.compressed_uploads {
            rules.enable(&rule.pattern, &rule.key).map_err(|e| {
                NetworkingError::Config(format!(
                    "invalid compression pattern for '{}': {}",
                    rule.key, e
                ))
            })?;
        }
        Ok(rules)
    }
}

// Default values
fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("Courier/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for NetworkingConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: default_user_agent(),
            compressed_uploads: Vec::new(),
        }
    }
}
