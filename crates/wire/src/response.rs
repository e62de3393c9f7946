// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use lr_core::{LeadId, StageName};
use serde::{Deserialize, Serialize};

use super::{HistoryEntryDetail, HistoryViewDetail};

/// Response from daemon to client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Response {
    /// Generic success
    Ok,

    /// Health check response
    Pong,

    /// Version handshake response
    Hello { version: String, full_name: String },

    /// Daemon is shutting down
    ShuttingDown,

    /// New lead routed into the pipeline
    Routed { lead: LeadId, to: StageName },

    /// Lead moved to another department
    Moved { to: StageName },

    /// Lead finished its lifecycle at a terminal stage
    Completed,

    /// Stages available as transfer targets
    TransferTargets { stages: Vec<StageName> },

    /// Role-appropriate lead history
    History { view: HistoryViewDetail },

    /// Full routing history of a single lead
    DepartmentHistory { entries: Vec<HistoryEntryDetail> },

    /// Daemon status
    Status {
        uptime_secs: u64,
        leads_total: usize,
        leads_done: usize,
        leads_rejected: usize,
    },

    /// Error response
    Error { message: String },
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
