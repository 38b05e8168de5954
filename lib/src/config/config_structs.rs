// lib/src/config/config_structs.rs

use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use models::{GraphError, GraphResult};

use crate::config::config_defaults::*;

/// Output options for `DiGraph::to_json`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonOptions {
    /// Two-space indentation when true, most compact form otherwise.
    #[serde(default = "default_pretty_json")]
    pub pretty: bool,
}

impl Default for JsonOptions {
    fn default() -> Self {
        JsonOptions {
            pretty: default_pretty_json(),
        }
    }
}

impl JsonOptions {
    pub fn pretty() -> Self {
        JsonOptions { pretty: true }
    }

    pub fn compact() -> Self {
        JsonOptions { pretty: false }
    }
}

/// Top-level settings, usually read from a TOML file:
///
/// ```toml
/// [json]
/// pretty = true
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphConfig {
    #[serde(default)]
    pub json: JsonOptions,
}

impl GraphConfig {
    pub fn from_toml_str(content: &str) -> GraphResult<Self> {
        toml::from_str(content)
            .map_err(|e| GraphError::ConfigurationError(format!("Failed to parse TOML: {}", e)))
    }

    /// Loads settings from `path`, falling back to defaults when the file does not exist.
    pub fn load_from_file(path: &Path) -> GraphResult<Self> {
        if !path.exists() {
            info!("Config file not found at {:?}, using defaults", path);
            return Ok(GraphConfig::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| {
            GraphError::ConfigurationError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&content)?;
        debug!("Loaded graph config from {:?}: {:?}", path, config);
        Ok(config)
    }

    /// Defaults overridden by the process environment, after loading any `.env` file.
    pub fn from_env() -> GraphResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for the known variables.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> GraphResult<Self> {
        let mut config = GraphConfig::default();
        if let Some(raw) = lookup(PRETTY_JSON_ENV_VAR) {
            config.json.pretty = parse_flag(PRETTY_JSON_ENV_VAR, &raw)?;
        }
        Ok(config)
    }
}

fn parse_flag(key: &str, raw: &str) -> GraphResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(GraphError::ConfigurationError(format!(
            "{} must be a boolean, got '{}'",
            key, other
        ))),
    }
}
