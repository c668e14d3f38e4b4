//! Restrictor configuration.
//!
//! # Example (TOML)
//!
//! ```toml
//! [restrictor]
//! mode = "policy"
//! policy_location = "/etc/jmxgate/access-policy.json"
//! require_policy = true
//! ```
//!
//! Every key can be overridden from the environment, e.g.
//! `JMXGATE__RESTRICTOR__MODE=deny-all`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// How the restrictor is chosen at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RestrictorMode {
    /// Compile the policy at `policy_location`.
    #[default]
    Policy,
    /// Allow every request.
    AllowAll,
    /// Deny every request.
    DenyAll,
}

/// Access restriction configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RestrictorConfig {
    /// Restrictor selection.
    pub mode: RestrictorMode,

    /// Path to the policy document (JSON tree form).
    pub policy_location: Option<PathBuf>,

    /// Refuse to start in `policy` mode when no policy location is set,
    /// instead of allowing every request.
    pub require_policy: bool,
}

/// Root configuration file layout.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub restrictor: RestrictorConfig,
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// An invalid configuration value was provided.
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    /// A required configuration value is missing.
    #[error("Missing required configuration: {0}")]
    Missing(String),

    /// The configuration sources could not be loaded or deserialized.
    #[error("Failed to load configuration: {0}")]
    Load(String),
}

impl RestrictorConfig {
    /// Configuration that compiles the policy at `location`.
    #[must_use]
    pub fn with_policy(location: impl Into<PathBuf>) -> Self {
        Self {
            mode: RestrictorMode::Policy,
            policy_location: Some(location.into()),
            require_policy: true,
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if a policy is required but no location
    /// is set, and `ConfigError::InvalidValue` if the location is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self
            .policy_location
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            return Err(ConfigError::InvalidValue(
                "policy_location cannot be empty".to_string(),
            ));
        }

        if self.mode == RestrictorMode::Policy
            && self.require_policy
            && self.policy_location.is_none()
        {
            return Err(ConfigError::Missing(
                "policy_location (require_policy is set)".to_string(),
            ));
        }

        Ok(())
    }
}

pub mod loader {
    use super::{AppConfig, ConfigError};
    use config::{Config, Environment, File};
    use std::path::Path;

    /// Load configuration from an optional TOML file plus `JMXGATE__*`
    /// environment overrides, then validate it.
    pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
        let mut builder = Config::builder();
        if let Some(p) = path {
            if !p.exists() {
                return Err(ConfigError::Load(format!(
                    "config file '{}' not found",
                    p.display()
                )));
            }
            builder = builder.add_source(File::from(p));
        }
        // Environment variable overrides, e.g., JMXGATE__RESTRICTOR__MODE=deny-all
        builder = builder.add_source(
            Environment::with_prefix("JMXGATE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );
        let cfg = builder
            .build()
            .map_err(|e| ConfigError::Load(format!("config build error: {e}")))?;
        let merged: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| ConfigError::Load(format!("config deserialize error: {e}")))?;
        merged.restrictor.validate()?;
        Ok(merged)
    }
}
