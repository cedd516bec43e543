// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions.
//!
//! Persistence and classification backends are injected behind these traits
//! so the classification engine can be exercised with in-memory fakes.

pub mod adapter;
pub mod backend;
pub mod clock;
pub mod store;

pub use adapter::PluginAdapter;
pub use backend::{BackendOutcome, BackendRequest, ClassificationBackend};
pub use clock::{Clock, SystemClock};
pub use store::TicketStore;
