// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Randomized classification used when the backend is off, failing, or wrong.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use strum::Display;
use triage_core::DEFAULT_CATEGORIES;
use triage_core::types::{ClassificationResult, ClassificationSource};

/// Fallback confidences are drawn uniformly from this range.
pub const FALLBACK_CONFIDENCE: std::ops::RangeInclusive<u8> = 10..=95;

/// Why the fallback path was taken. Rendered into the explanation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum FallbackReason {
    #[strum(serialize = "feature disabled")]
    FeatureDisabled,
    #[strum(serialize = "invalid response")]
    InvalidResponse,
    #[strum(serialize = "upstream error")]
    UpstreamError,
}

/// Produces plausible classifications without calling the backend.
pub struct FallbackClassifier {
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl FallbackClassifier {
    /// Entropy-seeded classifier.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic classifier for reproducible tests.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(rng: impl RngCore + Send + 'static) -> Self {
        Self {
            rng: Mutex::new(Box::new(rng)),
        }
    }

    /// Pick a random category from the vocabulary (or the default three when
    /// it is empty) with a random confidence.
    pub fn classify(&self, reason: FallbackReason, known_categories: &[String]) -> ClassificationResult {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let rng: &mut Box<dyn RngCore + Send> = &mut rng;

        let category = if known_categories.is_empty() {
            DEFAULT_CATEGORIES
                .choose(rng)
                .map(|c| c.to_string())
                .unwrap_or_default()
        } else {
            known_categories.choose(rng).cloned().unwrap_or_default()
        };

        ClassificationResult {
            category,
            explanation: fallback_explanation(reason),
            confidence: rng.gen_range(FALLBACK_CONFIDENCE),
            source: ClassificationSource::Fallback,
        }
    }
}

impl Default for FallbackClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// The explanation stored on tickets classified by the fallback path.
pub fn fallback_explanation(reason: FallbackReason) -> String {
    format!("Automatically classified using fallback system ({reason})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reasons_render_as_phrases() {
        assert_eq!(FallbackReason::FeatureDisabled.to_string(), "feature disabled");
        assert_eq!(FallbackReason::InvalidResponse.to_string(), "invalid response");
        assert_eq!(FallbackReason::UpstreamError.to_string(), "upstream error");
    }

    #[test]
    fn picks_from_vocabulary_with_bounded_confidence() {
        let fallback = FallbackClassifier::seeded(7);
        let vocab = vec!["Billing".to_string(), "Outage".to_string()];
        for _ in 0..200 {
            let result = fallback.classify(FallbackReason::UpstreamError, &vocab);
            assert!(vocab.contains(&result.category));
            assert!(FALLBACK_CONFIDENCE.contains(&result.confidence));
            assert_eq!(
                result.explanation,
                "Automatically classified using fallback system (upstream error)"
            );
            assert_eq!(result.source, ClassificationSource::Fallback);
        }
    }

    #[test]
    fn empty_vocabulary_uses_defaults() {
        let fallback = FallbackClassifier::seeded(1);
        for _ in 0..50 {
            let result = fallback.classify(FallbackReason::FeatureDisabled, &[]);
            assert!(DEFAULT_CATEGORIES.contains(&result.category.as_str()));
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let vocab: Vec<String> = (0..10).map(|i| format!("C{i}")).collect();
        let a = FallbackClassifier::seeded(42);
        let b = FallbackClassifier::seeded(42);
        for _ in 0..20 {
            assert_eq!(
                a.classify(FallbackReason::InvalidResponse, &vocab),
                b.classify(FallbackReason::InvalidResponse, &vocab)
            );
        }
    }
}
