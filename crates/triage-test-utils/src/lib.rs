// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Triage integration tests.
//!
//! Provides mock collaborators and a test harness for fast, deterministic,
//! CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MockBackend`] - classification backend with queued outcomes
//! - [`InMemoryStore`] - `TicketStore` held in process memory
//! - [`ManualClock`] - clock that only moves when told to
//! - [`TestHarness`] - temp SQLite store wired to a classification service

pub mod clock;
pub mod harness;
pub mod memory_store;
pub mod mock_backend;

pub use clock::ManualClock;
pub use harness::{TestHarness, TestHarnessBuilder};
pub use memory_store::InMemoryStore;
pub use mock_backend::MockBackend;
