// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket auto-classification for the Triage ticket tracker.
//!
//! The [`ClassificationService`] loads a ticket, asks the
//! [`ClassificationEngine`] for a category, and hands the result to the
//! [`TicketUpdateApplier`]. The engine gates backend calls behind a
//! [`RateLimiter`], validates what comes back, and substitutes a
//! [`FallbackClassifier`] result whenever the backend is disabled, failing,
//! or returning nonsense.

pub mod applier;
pub mod engine;
pub mod fallback;
pub mod policy;
pub mod prompt;
pub mod rate_limit;
pub mod service;
pub mod validator;

pub use applier::TicketUpdateApplier;
pub use engine::ClassificationEngine;
pub use fallback::{FallbackClassifier, FallbackReason};
pub use policy::{CategoryDecision, SkipReason};
pub use rate_limit::RateLimiter;
pub use service::{ClassificationOutcome, ClassificationService, ClassificationStatus};
