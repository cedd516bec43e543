// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./triage.toml` > `~/.config/triage/triage.toml` > `/etc/triage/triage.toml`
//! with environment variable overrides via `TRIAGE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::TriageConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/triage/triage.toml";

/// Config file in the working directory.
pub const LOCAL_CONFIG_PATH: &str = "triage.toml";

/// Env var prefixes (lowercased, `TRIAGE_` stripped) and the dotted section
/// each one maps to. Longer prefixes must come first.
const ENV_SECTIONS: &[(&str, &str)] = &[
    ("classifier_rate_limit_", "classifier.rate_limit."),
    ("classifier_", "classifier."),
    ("storage_", "storage."),
    ("server_", "server."),
    ("app_", "app."),
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/triage/triage.toml` (system-wide)
/// 3. `~/.config/triage/triage.toml` (user XDG config)
/// 4. `./triage.toml` (local directory)
/// 5. `TRIAGE_*` environment variables
pub fn load_config() -> Result<TriageConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<TriageConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TriageConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TriageConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TriageConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Path of the per-user config file, if the platform has a config dir.
pub fn user_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("triage/triage.toml"))
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(TriageConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_PATH))
        .merge(env_provider())
}

/// Map a lowercased, prefix-stripped env var name to its dotted config key.
///
/// Uses explicit section prefixes rather than splitting on `_`, because key
/// names themselves contain underscores: `TRIAGE_CLASSIFIER_RATE_LIMIT_MAX_CALLS`
/// must become `classifier.rate_limit.max_calls`.
pub fn map_env_key(key: &str) -> String {
    for (prefix, section) in ENV_SECTIONS {
        if let Some(rest) = key.strip_prefix(prefix) {
            return format!("{section}{rest}");
        }
    }
    key.to_string()
}

fn env_provider() -> Env {
    Env::prefixed("TRIAGE_").map(|key| map_env_key(key.as_str()).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_sections() {
        assert_eq!(map_env_key("app_log_level"), "app.log_level");
        assert_eq!(map_env_key("storage_database_path"), "storage.database_path");
        assert_eq!(map_env_key("server_port"), "server.port");
        assert_eq!(map_env_key("classifier_api_key"), "classifier.api_key");
        assert_eq!(
            map_env_key("classifier_rate_limit_max_calls"),
            "classifier.rate_limit.max_calls"
        );
    }

    #[test]
    fn unknown_env_prefix_is_left_alone() {
        assert_eq!(map_env_key("mystery"), "mystery");
    }
}
