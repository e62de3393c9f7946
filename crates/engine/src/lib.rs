// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! lr-engine: The routing engine and history query service.
//!
//! The engine is the sole writer of lead routing state: every command is a
//! short read-modify-write section under the store lock, committing exactly
//! one event. Queries clone a snapshot under the same lock and aggregate
//! outside it.

mod history;
mod routing;

pub use history::{GlobalLead, HistoryService, HistoryView, PersonalLead};
pub use routing::{RouteOutcome, RoutingEngine};
