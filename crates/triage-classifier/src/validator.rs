// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structural and domain checks for raw backend payloads.

use serde_json::Value;
use triage_core::types::{ClassificationResult, ClassificationSource};

/// Lowest accepted confidence.
pub const MIN_CONFIDENCE: i64 = 1;
/// Highest accepted confidence.
pub const MAX_CONFIDENCE: i64 = 100;

/// Convert a raw payload into a classification if every constraint holds.
///
/// The payload must be an object with a `category` that is an exact member of
/// `known_categories`, an integer `confidence` in 1..=100, and an
/// `explanation` that is non-blank. Anything else yields `None`.
pub fn parse_valid(raw: &Value, known_categories: &[String]) -> Option<ClassificationResult> {
    let object = raw.as_object()?;

    let category = object.get("category")?.as_str()?;
    if !known_categories.iter().any(|known| known == category) {
        return None;
    }

    let confidence = object.get("confidence")?.as_i64()?;
    if !(MIN_CONFIDENCE..=MAX_CONFIDENCE).contains(&confidence) {
        return None;
    }

    let explanation = object.get("explanation")?.as_str()?;
    if explanation.trim().is_empty() {
        return None;
    }

    Some(ClassificationResult {
        category: category.to_string(),
        explanation: explanation.to_string(),
        confidence: u8::try_from(confidence).ok()?,
        source: ClassificationSource::Backend,
    })
}

/// Boolean view of [`parse_valid`].
pub fn validate(raw: &Value, known_categories: &[String]) -> bool {
    parse_valid(raw, known_categories).is_some()
}
