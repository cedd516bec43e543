// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns figment extraction failures into miette diagnostics.
//!
//! Unknown keys get a typo suggestion, or a pointer to the section the key
//! actually belongs to (`max_calls` written under `[classifier]` instead of
//! `[classifier.rate_limit]` is the usual slip).

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use figment::error::Kind;
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Minimum Jaro-Winkler similarity score to suggest a correction.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// Every config section and the keys it accepts. Must follow `model.rs`.
const SECTIONS: &[(&str, &[&str])] = &[
    ("", &["app", "storage", "server", "classifier"]),
    ("app", &["name", "log_level"]),
    ("storage", &["database_path", "wal_mode"]),
    ("server", &["host", "port"]),
    (
        "classifier",
        &[
            "enabled",
            "api_key",
            "base_url",
            "model",
            "max_tokens",
            "temperature",
            "timeout_secs",
            "rate_limit",
        ],
    ),
    ("classifier.rate_limit", &["max_calls", "window_seconds", "key"]),
];

/// A configuration error with rich diagnostic information.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key the section does not accept.
    #[error("unknown key `{key}` in {}", section_label(.section))]
    #[diagnostic(
        code(triage::config::unknown_key),
        help("{}", unknown_key_help(key, belongs_in.as_deref(), suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        /// Dotted section path; empty for the top level.
        section: String,
        /// Closest valid key in the same section.
        suggestion: Option<String>,
        /// Another section that accepts `key` verbatim.
        belongs_in: Option<String>,
        /// Valid keys for the section, comma separated.
        valid_keys: String,
        #[label("not accepted here")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value that does not deserialize into the key's type.
    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(triage::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        key: String,
        detail: String,
        expected: String,
        #[label("wrong type here")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(triage::config::missing_key),
        help("add `{key} = <value>` to your triage.toml")
    )]
    MissingKey { key: String },

    /// A semantic validation error for a config value.
    #[error("validation error: {message}")]
    #[diagnostic(code(triage::config::validation))]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(triage::config::other))]
    Other(String),
}

fn unknown_key_help(
    key: &str,
    belongs_in: Option<&str>,
    suggestion: Option<&str>,
    valid_keys: &str,
) -> String {
    match (belongs_in, suggestion) {
        (Some(home), _) => format!("`{key}` belongs in {}", section_label(home)),
        (None, Some(s)) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        (None, None) => format!("valid keys: {valid_keys}"),
    }
}

fn section_label(section: &str) -> String {
    if section.is_empty() {
        "the top level".to_string()
    } else {
        format!("[{section}]")
    }
}

/// Find a section other than `current` that accepts `key`.
pub fn home_section(key: &str, current: &str) -> Option<&'static str> {
    SECTIONS
        .iter()
        .find(|(section, keys)| *section != current && keys.contains(&key))
        .map(|(section, _)| *section)
}

/// Suggest a similar key name using Jaro-Winkler string similarity.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Convert a `figment::Error` into one diagnostic per underlying error.
///
/// `toml_sources` pairs file paths with their contents so spans can point
/// at the offending line.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    let sources = Sources(toml_sources);
    err.into_iter()
        .map(|error| {
            let section = error.path.join(".");
            match &error.kind {
                Kind::UnknownField(field, expected) => {
                    let (span, src) = sources.locate(&error, &error.path, field);
                    ConfigError::UnknownKey {
                        belongs_in: home_section(field, &section).map(String::from),
                        suggestion: suggest_key(field, expected),
                        valid_keys: expected.join(", "),
                        key: field.clone(),
                        section,
                        span,
                        src,
                    }
                }
                Kind::MissingField(field) => ConfigError::MissingKey {
                    key: field.clone().into_owned(),
                },
                Kind::InvalidType(actual, expected) => {
                    let (parent, field) = match error.path.split_last() {
                        Some((field, parent)) => (parent, field.as_str()),
                        None => (&error.path[..], ""),
                    };
                    let (span, src) = sources.locate(&error, parent, field);
                    ConfigError::InvalidType {
                        key: section,
                        detail: format!("found {actual}, expected {expected}"),
                        expected: expected.to_string(),
                        span,
                        src,
                    }
                }
                _ => ConfigError::Other(error.to_string()),
            }
        })
        .collect()
}

/// TOML file contents keyed by path.
struct Sources<'a>(&'a [(String, String)]);

impl Sources<'_> {
    fn locate(
        &self,
        error: &figment::error::Error,
        section: &[String],
        field: &str,
    ) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
        if field.is_empty() {
            return (None, None);
        }
        let Some(figment::Source::File(path)) = error.metadata.as_ref().and_then(|m| m.source.as_ref())
        else {
            return (None, None);
        };
        let path = path.display().to_string();
        let Some((name, content)) = self.0.iter().find(|(p, _)| *p == path) else {
            return (None, None);
        };
        match find_key_offset(content, section, field) {
            Some(offset) => (
                Some(SourceSpan::new(offset.into(), field.len())),
                Some(NamedSource::new(name, content.clone())),
            ),
            None => (None, None),
        }
    }
}

/// Byte offset of `field` inside the `[section]` table of `content`.
///
/// An empty `section` searches the top level (before the first header).
pub fn find_key_offset(content: &str, section: &[String], field: &str) -> Option<usize> {
    let wanted = format!("[{}]", section.join("."));
    let mut in_section = section.is_empty();
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if trimmed.starts_with('[') {
            in_section = trimmed.trim_end() == wanted;
        } else if in_section
            && let Some(rest) = trimmed.strip_prefix(field)
            && rest.trim_start().starts_with('=')
        {
            return Some(offset + line.len() - trimmed.len());
        }
        offset += line.len();
    }

    None
}

/// Render a list of `ConfigError`s to stderr using miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        match handler.render_report(&mut buf, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{buf}"),
            Err(_) => eprintln!("Error: {error}"),
        }
    }
}
