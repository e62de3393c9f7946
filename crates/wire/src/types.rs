// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! DTOs carried inside responses.

use lr_core::{DepartmentStatus, LeadId, RouteAction, StageName, UserId};
use serde::{Deserialize, Serialize};

/// Compact lead representation for list views.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeadSummary {
    pub id: LeadId,
    pub lead_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_department: Option<StageName>,
    pub department_status: DepartmentStatus,
    pub modified_at_ms: u64,
}

/// One routing history entry, with the actor's display name resolved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntryDetail {
    pub department: StageName,
    pub action: RouteAction,
    pub actor: UserId,
    pub actor_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub acted_at_ms: u64,
}

/// Personal-view row: a lead plus the user's latest action on it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersonalLeadEntry {
    pub lead: LeadSummary,
    pub action: RouteAction,
    pub department: StageName,
    pub acted_at_ms: u64,
}

/// Global-view row: a completed/rejected lead plus its last handler.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GlobalLeadEntry {
    pub lead: LeadSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_action: Option<RouteAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_handled_by: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_handled_by_name: Option<String>,
}

/// Role-appropriate lead history view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "view")]
pub enum HistoryViewDetail {
    Personal {
        user: UserId,
        full_name: String,
        leads: Vec<PersonalLeadEntry>,
    },
    Global {
        leads: Vec<GlobalLeadEntry>,
        done_count: usize,
        rejected_count: usize,
    },
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
