// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Triage ticket tracker.
//!
//! This crate provides the error type, domain types, and collaborator traits
//! used throughout the Triage workspace. Storage and classification backends
//! implement traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::TriageError;
pub use types::{
    Category, CategoryWithCount, ClassificationResult, ClassificationSource, DEFAULT_CATEGORIES,
    HealthStatus, RateLimitStatus, Ticket, TicketStatus, TicketWithCategory,
};

pub use traits::{
    BackendOutcome, BackendRequest, ClassificationBackend, Clock, PluginAdapter, SystemClock,
    TicketStore,
};
