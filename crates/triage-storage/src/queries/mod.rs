// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for ticket and category storage.

pub mod categories;
pub mod tickets;
