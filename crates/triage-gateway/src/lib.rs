// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON HTTP API for tickets, categories, and classification.
//!
//! Every body uses the same envelope (`success`, plus `message`, `data`,
//! `pagination`, or `errors` as applicable). Domain errors map to status
//! codes in one place, [`response::ApiError`].

pub mod handlers;
pub mod query;
pub mod response;
pub mod server;
pub mod validation;

pub use server::{GatewayState, HealthState, ServerConfig, router, start_server};
