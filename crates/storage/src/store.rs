// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The store: journal + materialized state committed as one unit.

use std::path::Path;

use lr_core::RouteEvent;
use tracing::info;

use crate::journal::{Journal, StorageError};
use crate::state::RoutingState;

/// Journal-backed routing state.
///
/// Callers serialize access externally (the engine wraps the store in a
/// mutex); within that lock, [`commit`](Self::commit) makes the journal
/// append durable before the in-memory state changes, so acknowledged
/// commands survive a crash.
pub struct Store {
    journal: Journal,
    state: RoutingState,
}

impl Store {
    /// Open the journal at `path` and replay it into state.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let (journal, entries) = Journal::open(path)?;
        let mut state = RoutingState::default();
        let replayed = entries.len();
        for entry in entries {
            state.apply(&entry.event);
        }
        if replayed > 0 {
            info!(
                entries = replayed,
                leads = state.leads.len(),
                "replayed route journal"
            );
        }
        Ok(Self { journal, state })
    }

    /// Durably record an event, then apply it to state. All-or-nothing: a
    /// journal failure leaves state untouched.
    pub fn commit(&mut self, event: RouteEvent) -> Result<(), StorageError> {
        self.journal.append(&event)?;
        self.journal.flush()?;
        self.state.apply(&event);
        Ok(())
    }

    pub fn state(&self) -> &RoutingState {
        &self.state
    }

    /// Clone of the current state for lock-free aggregation.
    pub fn snapshot(&self) -> RoutingState {
        self.state.clone()
    }

    pub fn write_seq(&self) -> u64 {
        self.journal.write_seq()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
