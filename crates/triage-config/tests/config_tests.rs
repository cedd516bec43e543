// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Triage configuration system.

use triage_config::diagnostic::ConfigError;
use triage_config::model::TriageConfig;
use triage_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_triage_config() {
    let toml = r#"
[app]
name = "helpdesk"
log_level = "debug"

[storage]
database_path = "/tmp/tickets.db"
wal_mode = false

[server]
host = "0.0.0.0"
port = 9000

[classifier]
enabled = true
api_key = "sk-test"
base_url = "http://localhost:11434/v1"
model = "gpt-4o-mini"
max_tokens = 150
temperature = 0.0
timeout_secs = 10

[classifier.rate_limit]
max_calls = 3
window_seconds = 30
key = "tickets"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.app.name, "helpdesk");
    assert_eq!(config.app.log_level, "debug");
    assert_eq!(config.storage.database_path, "/tmp/tickets.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 9000);
    assert!(config.classifier.enabled);
    assert_eq!(config.classifier.api_key.as_deref(), Some("sk-test"));
    assert_eq!(config.classifier.base_url, "http://localhost:11434/v1");
    assert_eq!(config.classifier.model, "gpt-4o-mini");
    assert_eq!(config.classifier.max_tokens, 150);
    assert_eq!(config.classifier.temperature, 0.0);
    assert_eq!(config.classifier.timeout_secs, 10);
    assert_eq!(config.classifier.rate_limit.max_calls, 3);
    assert_eq!(config.classifier.rate_limit.window_seconds, 30);
    assert_eq!(config.classifier.rate_limit.key, "tickets");
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.app.name, "triage");
    assert_eq!(config.app.log_level, "info");
    assert!(config.storage.wal_mode);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8080);
    assert!(!config.classifier.enabled);
    assert!(config.classifier.api_key.is_none());
    assert_eq!(config.classifier.model, "gpt-3.5-turbo");
    assert_eq!(config.classifier.max_tokens, 200);
    assert!((config.classifier.temperature - 0.3).abs() < f32::EPSILON);
    assert_eq!(config.classifier.rate_limit.max_calls, 10);
    assert_eq!(config.classifier.rate_limit.window_seconds, 60);
    assert_eq!(config.classifier.rate_limit.key, "openai_classify_rate_limit");
}

/// A partial rate limit section keeps defaults for the missing keys.
#[test]
fn partial_rate_limit_section_keeps_defaults() {
    let toml = r#"
[classifier.rate_limit]
max_calls = 2
"#;
    let config = load_config_from_str(toml).unwrap();
    assert_eq!(config.classifier.rate_limit.max_calls, 2);
    assert_eq!(config.classifier.rate_limit.window_seconds, 60);
}

/// Dotted overrides (the shape env vars are mapped into) reach nested keys.
#[test]
fn dotted_override_reaches_nested_rate_limit() {
    use figment::{
        Figment,
        providers::{Format, Serialized, Toml},
    };

    let toml_content = r#"
[classifier.rate_limit]
max_calls = 5
"#;

    let config: TriageConfig = Figment::new()
        .merge(Serialized::defaults(TriageConfig::default()))
        .merge(Toml::string(toml_content))
        .merge(("classifier.rate_limit.max_calls", 99))
        .merge(("classifier.enabled", true))
        .extract()
        .expect("should merge env-style override");

    assert_eq!(config.classifier.rate_limit.max_calls, 99);
    assert!(config.classifier.enabled);
}

/// Missing config files are silently skipped.
#[test]
fn missing_config_files_silently_skipped() {
    let config = triage_config::load_config_from_path(std::path::Path::new(
        "/nonexistent/path/triage.toml",
    ))
    .expect("missing file should be silently skipped");
    assert_eq!(config.app.name, "triage");
}

/// Unexpected top-level section is rejected by deny_unknown_fields.
#[test]
fn deny_unknown_fields_at_top_level() {
    let toml = r#"
[logging]
level = "debug"
"#;

    let err = load_config_from_str(toml).expect_err("unknown top-level section should be rejected");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("logging"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// Unknown key "enabeld" in [classifier] produces an UnknownKey with a suggestion.
#[test]
fn diagnostic_error_includes_unknown_key_and_suggestion() {
    let toml = r#"
[classifier]
enabeld = true
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    let has_unknown_key = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys, .. } if {
            key == "enabeld"
                && suggestion.as_deref() == Some("enabled")
                && valid_keys.contains("rate_limit")
        })
    });
    assert!(
        has_unknown_key,
        "should have UnknownKey error for 'enabeld' with suggestion 'enabled', got: {errors:?}"
    );
}

/// A rate-limit key written under [classifier] points at its real table.
#[test]
fn misplaced_rate_limit_key_names_its_section() {
    let toml = r#"
[classifier]
enabled = false
max_calls = 5
"#;

    let errors = load_and_validate_str(toml).expect_err("misplaced key should fail");
    let error = errors
        .iter()
        .find(|e| matches!(e, ConfigError::UnknownKey { key, .. } if key == "max_calls"))
        .unwrap_or_else(|| panic!("no UnknownKey for max_calls: {errors:?}"));

    let ConfigError::UnknownKey { section, belongs_in, .. } = error else {
        unreachable!();
    };
    assert_eq!(section, "classifier");
    assert_eq!(belongs_in.as_deref(), Some("classifier.rate_limit"));

    use miette::Diagnostic;
    let help = error.help().map(|h| h.to_string()).unwrap_or_default();
    assert!(help.contains("belongs in [classifier.rate_limit]"), "got: {help}");
}

/// Invalid type (string where number expected) produces clear message.
#[test]
fn diagnostic_invalid_type_message() {
    let toml = r#"
[server]
port = "eighty"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject invalid type");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { .. })),
        "got: {errors:?}"
    );
}

/// ConfigError can be rendered using miette's graphical handler.
#[test]
fn config_error_renders_with_miette() {
    use miette::{Diagnostic, GraphicalReportHandler};

    let error = ConfigError::UnknownKey {
        key: "enabeld".to_string(),
        section: "classifier".to_string(),
        suggestion: Some("enabled".to_string()),
        belongs_in: None,
        valid_keys: "enabled, api_key, model".to_string(),
        span: None,
        src: None,
    };

    let help = error.help().expect("should have help text").to_string();
    assert!(help.contains("did you mean `enabled`"), "got: {help}");

    let handler = GraphicalReportHandler::new();
    let mut buf = String::new();
    handler
        .render_report(&mut buf, &error)
        .expect("should render without error");
    assert!(buf.contains("enabeld"));
}

/// Validation runs after a successful parse.
#[test]
fn validation_catches_zero_window() {
    let toml = r#"
[classifier.rate_limit]
window_seconds = 0
"#;

    let errors = load_and_validate_str(toml).expect_err("zero window should fail");
    assert!(errors.iter().any(|e| {
        matches!(e, ConfigError::Validation { message } if message.contains("window_seconds"))
    }));
}

/// Environment variables override file values through the `TRIAGE_` prefix.
#[test]
#[serial_test::serial]
fn env_var_overrides_rate_limit() {
    // SAFETY: serialized with other env-mutating tests.
    unsafe {
        std::env::set_var("TRIAGE_CLASSIFIER_RATE_LIMIT_MAX_CALLS", "7");
    }
    let config = triage_config::load_config_from_path(std::path::Path::new(
        "/nonexistent/path/triage.toml",
    ));
    unsafe {
        std::env::remove_var("TRIAGE_CLASSIFIER_RATE_LIMIT_MAX_CALLS");
    }
    assert_eq!(config.unwrap().classifier.rate_limit.max_calls, 7);
}
