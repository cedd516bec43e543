// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as non-empty paths, sane rate limits, and temperature bounds.

use crate::diagnostic::ConfigError;
use crate::model::TriageConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &TriageConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    let host = config.server.host.trim();
    if host.is_empty() {
        fail("server.host must not be empty".to_string());
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            fail(format!(
                "server.host `{host}` is not a valid IP address or hostname"
            ));
        }
    }

    let classifier = &config.classifier;
    if classifier.model.trim().is_empty() {
        fail("classifier.model must not be empty".to_string());
    }

    if !(0.0..=2.0).contains(&classifier.temperature) {
        fail(format!(
            "classifier.temperature must be between 0.0 and 2.0, got {}",
            classifier.temperature
        ));
    }

    if classifier.max_tokens == 0 {
        fail("classifier.max_tokens must be at least 1".to_string());
    }

    if classifier.timeout_secs == 0 {
        fail("classifier.timeout_secs must be at least 1".to_string());
    }

    if !classifier.base_url.starts_with("http://") && !classifier.base_url.starts_with("https://")
    {
        fail(format!(
            "classifier.base_url `{}` must start with http:// or https://",
            classifier.base_url
        ));
    }

    let rate_limit = &classifier.rate_limit;
    if rate_limit.max_calls == 0 {
        fail("classifier.rate_limit.max_calls must be at least 1".to_string());
    }

    if rate_limit.window_seconds == 0 {
        fail("classifier.rate_limit.window_seconds must be at least 1".to_string());
    }

    if rate_limit.key.trim().is_empty() {
        fail("classifier.rate_limit.key must not be empty".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_error(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        let config = TriageConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = TriageConfig::default();
        config.storage.database_path = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "database_path"));
    }

    #[test]
    fn out_of_range_temperature_fails_validation() {
        let mut config = TriageConfig::default();
        config.classifier.temperature = 3.5;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "classifier.temperature"));
    }

    #[test]
    fn zero_rate_limit_fails_validation() {
        let mut config = TriageConfig::default();
        config.classifier.rate_limit.max_calls = 0;
        config.classifier.rate_limit.window_seconds = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "rate_limit.max_calls"));
        assert!(has_error(&errors, "rate_limit.window_seconds"));
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = TriageConfig::default();
        config.storage.database_path = " ".to_string();
        config.server.host = "".to_string();
        config.classifier.rate_limit.key = "".to_string();
        config.classifier.timeout_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn invalid_host_fails_validation() {
        let mut config = TriageConfig::default();
        config.server.host = "bad host!".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "server.host"));
    }

    #[test]
    fn non_http_base_url_fails_validation() {
        let mut config = TriageConfig::default();
        config.classifier.base_url = "ftp://example.com".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "base_url"));
    }
}
