// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lead routing state: current department, status, and history log.

use serde::{Deserialize, Serialize};

use crate::actor::UserId;
use crate::history::{RouteAction, RoutingHistoryEntry};
use crate::stage::StageName;

crate::define_id! {
    /// Unique identifier for a lead.
    ///
    /// Leads imported from the CRM keep their CRM document name; leads
    /// created through the routing API get a generated `lead-` ID.
    pub struct LeadId("lead-");
}

/// Where a lead stands within its current department.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepartmentStatus {
    /// The current department is working the lead.
    Working,
    /// The lead completed its lifecycle at a terminal stage.
    Done,
    /// The lead was rejected (only under the `mark` reject policy).
    Rejected,
}

crate::simple_display! {
    DepartmentStatus {
        Working => "working",
        Done => "done",
        Rejected => "rejected",
    }
}

/// Per-lead routing state.
///
/// The routing engine is the sole writer of `current_department` and
/// `department_status`, and the sole appender to `history`; everything else
/// reads snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub lead_name: String,
    /// `None` only before first assignment.
    pub current_department: Option<StageName>,
    pub department_status: DepartmentStatus,
    pub modified_at_ms: u64,
    /// Append-only, ordered by `acted_at_ms`.
    #[serde(default)]
    pub history: Vec<RoutingHistoryEntry>,
}

impl Lead {
    /// Create a lead entering the pipeline at `stage`, with its Initial
    /// history entry attributed to `actor`.
    pub fn new(
        id: LeadId,
        lead_name: impl Into<String>,
        stage: StageName,
        actor: UserId,
        epoch_ms: u64,
    ) -> Self {
        Self {
            id,
            lead_name: lead_name.into(),
            current_department: Some(stage.clone()),
            department_status: DepartmentStatus::Working,
            modified_at_ms: epoch_ms,
            history: vec![RoutingHistoryEntry {
                department: stage,
                action: RouteAction::Initial,
                actor,
                notes: None,
                acted_at_ms: epoch_ms,
            }],
        }
    }

    /// True once the lead finished its lifecycle at a terminal stage.
    /// Completed leads accept no further routing commands.
    pub fn is_completed(&self) -> bool {
        self.department_status == DepartmentStatus::Done
    }

    /// Most recent history entry overall.
    pub fn last_entry(&self) -> Option<&RoutingHistoryEntry> {
        self.history.last()
    }

    /// Most recent history entry authored by `user`.
    pub fn last_entry_by(&self, user: &UserId) -> Option<&RoutingHistoryEntry> {
        self.history.iter().rev().find(|e| e.actor == *user)
    }

    /// Append a history entry and bump the modified stamp.
    pub fn append_entry(&mut self, entry: RoutingHistoryEntry) {
        self.modified_at_ms = entry.acted_at_ms;
        self.history.push(entry);
    }
}

crate::builder! {
    pub struct LeadBuilder => Lead {
        into {
            id: LeadId = "lead-test-1",
            lead_name: String = "Test Lead",
        }
        set {
            department_status: DepartmentStatus = DepartmentStatus::Working,
            modified_at_ms: u64 = 0,
            history: Vec<RoutingHistoryEntry> = Vec::new(),
        }
        option {
            current_department: StageName = Some(StageName::new("Onboarding")),
        }
    }
}

#[cfg(test)]
#[path = "lead_tests.rs"]
mod tests;
