// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `triage config` command implementation.

use triage_config::TriageConfig;
use triage_core::TriageError;

/// Render the effective configuration as TOML with secrets masked.
pub fn render_config(config: &TriageConfig) -> Result<String, TriageError> {
    let mut shown = config.clone();
    if shown.classifier.api_key.is_some() {
        shown.classifier.api_key = Some("[redacted]".to_string());
    }
    toml::to_string_pretty(&shown)
        .map_err(|e| TriageError::Internal(format!("failed to render config: {e}")))
}

pub fn run_config(config: &TriageConfig) -> Result<(), TriageError> {
    print!("{}", render_config(config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendered_config_round_trips_and_masks_key() {
        let mut config = TriageConfig::default();
        config.classifier.api_key = Some("sk-secret".into());

        let rendered = render_config(&config).unwrap();
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("[classifier.rate_limit]"));

        let parsed = triage_config::load_and_validate_str(&rendered).unwrap();
        assert_eq!(parsed.classifier.rate_limit.max_calls, 10);
        assert_eq!(parsed.classifier.api_key.as_deref(), Some("[redacted]"));
    }
}
