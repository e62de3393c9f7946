// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use lr_core::{LeadId, StageName, UserId};
use serde::{Deserialize, Serialize};

/// Request from client to daemon
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Request {
    /// Health check ping
    Ping,

    /// Version handshake; must be the first frame on a connection.
    /// The daemon resolves `user` against its directory.
    Hello { version: String, user: UserId },

    /// Route a new lead into the pipeline
    CreateLead { lead_name: String },

    /// Current department marks its work done
    MarkDone { lead: LeadId },

    /// Return the lead to the previous department for rework
    SendBack { lead: LeadId },

    /// Reject the lead back to the first department
    Reject { lead: LeadId },

    /// Transfer the lead to an arbitrary stage, bypassing pipeline order
    OverrideTransfer {
        lead: LeadId,
        target_stage: StageName,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        notes: Option<String>,
    },

    /// Stages a lead in `current_department` could be transferred to
    TransferTargets { current_department: StageName },

    /// Role-appropriate lead history. Admins may filter by user; no
    /// filter gives admins the global completed/rejected view.
    LeadHistory {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        user: Option<UserId>,
    },

    /// Full routing history of a single lead
    DepartmentHistory { lead: LeadId },

    /// Get daemon status
    Status,

    /// Request daemon shutdown
    Shutdown,
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
