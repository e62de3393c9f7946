// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! lr-storage: Durability for the Lead Router.
//!
//! An append-only route journal (one JSON event per line) plus the
//! [`RoutingState`] materialized from replaying it. The [`Store`] ties the
//! two together: a commit appends to the journal, flushes, then applies to
//! state, so recovered state always matches what was acknowledged.

mod journal;
mod state;
mod store;

pub use journal::{Journal, JournalEntry, StorageError};
pub use state::RoutingState;
pub use store::Store;
