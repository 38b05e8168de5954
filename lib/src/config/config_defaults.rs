// lib/src/config/config_defaults.rs

/// Environment variable read by `GraphConfig::from_env`.
pub const PRETTY_JSON_ENV_VAR: &str = "DIGRAPH_JSON_PRETTY";

/// Indentation used for pretty JSON output.
pub const PRETTY_JSON_INDENT: &[u8] = b"  ";

pub fn default_pretty_json() -> bool {
    false
}
