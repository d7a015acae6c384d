//! Agent configuration: `agent.toml` plus command-line overrides.

use serde::{Deserialize, Serialize};

use cloudprint_core::error::{AppError, ErrorKind};

/// Agent configuration.
///
/// Loaded from a key/value TOML file (recognized options: `api`,
/// `server_id`, `license_key`, `dev_mode`), then overridden by
/// command-line flags. Flag > file > default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Backend base URL.
    #[serde(default = "default_api")]
    pub api: String,
    /// Explicit agent identity; derived from the machine when unset.
    #[serde(default)]
    pub server_id: Option<String>,
    /// The license key credential.
    #[serde(default)]
    pub license_key: Option<String>,
    /// Enables the simulated print sink.
    #[serde(default)]
    pub dev_mode: bool,
    /// Where the simulated sink writes its output.
    #[serde(default = "default_dev_output_dir")]
    pub dev_output_dir: String,
    /// Normal poll interval.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    /// Longer backoff applied after an authorization failure.
    #[serde(default = "default_auth_backoff")]
    pub auth_backoff_seconds: u64,
}

/// Command-line values that shadow the config file.
#[derive(Debug, Clone, Default)]
pub struct AgentOverrides {
    /// Backend base URL.
    pub api: Option<String>,
    /// Explicit agent identity.
    pub server_id: Option<String>,
    /// The license key credential.
    pub license_key: Option<String>,
    /// Enable dev mode. A flag can only switch it on, never off.
    pub dev: bool,
}

impl AgentConfig {
    /// Load configuration from a TOML file plus `CLOUDPRINT_AGENT_`
    /// environment variables. A missing file yields the defaults.
    pub fn load(path: &str) -> Result<Self, AppError> {
        config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("CLOUDPRINT_AGENT"))
            .build()
            .and_then(config::Config::try_deserialize)
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    format!("Failed to load agent configuration from '{path}': {e}"),
                    e,
                )
            })
    }

    /// Apply command-line overrides on top of the file values.
    pub fn apply_overrides(&mut self, overrides: AgentOverrides) {
        if let Some(api) = overrides.api {
            self.api = api;
        }
        if overrides.server_id.is_some() {
            self.server_id = overrides.server_id;
        }
        if overrides.license_key.is_some() {
            self.license_key = overrides.license_key;
        }
        if overrides.dev {
            self.dev_mode = true;
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            api: default_api(),
            server_id: None,
            license_key: None,
            dev_mode: false,
            dev_output_dir: default_dev_output_dir(),
            poll_interval_seconds: default_poll_interval(),
            auth_backoff_seconds: default_auth_backoff(),
        }
    }
}

fn default_api() -> String {
    "http://localhost:8080".to_string()
}

fn default_dev_output_dir() -> String {
    ".".to_string()
}

fn default_poll_interval() -> u64 {
    5
}

fn default_auth_backoff() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn flags_override_file_values() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            "api = \"http://backend.example:9000\"\nlicense_key = \"file-key\"\ndev_mode = false"
        )
        .unwrap();

        let mut cfg = AgentConfig::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(cfg.api, "http://backend.example:9000");
        assert_eq!(cfg.license_key.as_deref(), Some("file-key"));

        cfg.apply_overrides(AgentOverrides {
            api: None,
            server_id: Some("server-override".to_string()),
            license_key: Some("flag-key".to_string()),
            dev: true,
        });

        // Untouched flags keep the file value; set flags win.
        assert_eq!(cfg.api, "http://backend.example:9000");
        assert_eq!(cfg.server_id.as_deref(), Some("server-override"));
        assert_eq!(cfg.license_key.as_deref(), Some("flag-key"));
        assert!(cfg.dev_mode);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = AgentConfig::load("/nonexistent/agent.toml").unwrap();
        assert_eq!(cfg.api, "http://localhost:8080");
        assert_eq!(cfg.license_key, None);
        assert!(!cfg.dev_mode);
        assert_eq!(cfg.poll_interval_seconds, 5);
        assert_eq!(cfg.auth_backoff_seconds, 10);
    }
}
