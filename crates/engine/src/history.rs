// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! History query service: role-based views over routing history.
//!
//! Non-admin users see the leads they previously acted on; admins see all
//! completed/rejected leads globally, or a specific user's history when the
//! user filter is set.

use std::sync::Arc;

use parking_lot::Mutex;

use lr_core::{
    Actor, DepartmentStatus, Directory, Lead, RouteAction, RoutingError, StageName, UserId,
};
use lr_storage::Store;

/// A lead in the personal view, annotated with the user's most recent
/// action on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalLead {
    pub lead: Lead,
    pub user_action: RouteAction,
    pub action_department: StageName,
    pub action_at_ms: u64,
}

/// A lead in the global view, annotated with whoever last handled it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalLead {
    pub lead: Lead,
    pub last_action: Option<RouteAction>,
    pub last_handled_by: Option<UserId>,
    pub last_handled_by_name: Option<String>,
}

/// Role-appropriate lead history, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryView {
    Personal {
        user: UserId,
        full_name: String,
        leads: Vec<PersonalLead>,
    },
    Global {
        leads: Vec<GlobalLead>,
        done_count: usize,
        rejected_count: usize,
    },
}

/// Read-only aggregation over routing history for the dashboard.
///
/// Queries clone a snapshot under the store lock and aggregate outside it;
/// they never block routing commands for longer than the clone.
pub struct HistoryService {
    store: Arc<Mutex<Store>>,
    directory: Directory,
}

impl HistoryService {
    pub fn new(store: Arc<Mutex<Store>>, directory: Directory) -> Self {
        Self { store, directory }
    }

    /// Main entry point: role-appropriate lead history.
    ///
    /// Admins may pass an arbitrary `user` filter (personal view for that
    /// user) or none (global completed/rejected view). Everyone else gets
    /// their own personal view; asking for another user's fails.
    pub fn my_lead_history(
        &self,
        user: Option<&UserId>,
        actor: &Actor,
    ) -> Result<HistoryView, RoutingError> {
        match user {
            Some(u) if *u != actor.user && !actor.admin => Err(RoutingError::permission_denied(
                &actor.user,
                "view other users' lead history",
            )),
            Some(u) => Ok(self.personal(u)),
            None if actor.admin => Ok(self.global()),
            None => Ok(self.personal(&actor.user)),
        }
    }

    /// Leads where `user` authored at least one history entry, each
    /// annotated with that user's most recent action on the lead.
    fn personal(&self, user: &UserId) -> HistoryView {
        let snapshot = self.store.lock().snapshot();
        let mut leads: Vec<PersonalLead> = snapshot
            .leads()
            .filter_map(|lead| {
                lead.last_entry_by(user).map(|entry| PersonalLead {
                    user_action: entry.action,
                    action_department: entry.department.clone(),
                    action_at_ms: entry.acted_at_ms,
                    lead: lead.clone(),
                })
            })
            .collect();
        leads.sort_by(|a, b| b.action_at_ms.cmp(&a.action_at_ms));

        HistoryView::Personal {
            user: user.clone(),
            full_name: self.directory.full_name(user),
            leads,
        }
    }

    /// All leads with status Done or Rejected, annotated with who last
    /// handled them, plus counts for the dashboard stat cards.
    fn global(&self) -> HistoryView {
        let snapshot = self.store.lock().snapshot();
        let mut leads: Vec<GlobalLead> = snapshot
            .leads()
            .filter(|lead| {
                matches!(
                    lead.department_status,
                    DepartmentStatus::Done | DepartmentStatus::Rejected
                )
            })
            .map(|lead| {
                let last = lead.last_entry();
                GlobalLead {
                    last_action: last.map(|e| e.action),
                    last_handled_by: last.map(|e| e.actor.clone()),
                    last_handled_by_name: last.map(|e| self.directory.full_name(&e.actor)),
                    lead: lead.clone(),
                }
            })
            .collect();
        leads.sort_by(|a, b| b.lead.modified_at_ms.cmp(&a.lead.modified_at_ms));

        let done_count = leads
            .iter()
            .filter(|l| l.lead.department_status == DepartmentStatus::Done)
            .count();
        let rejected_count = leads
            .iter()
            .filter(|l| l.lead.department_status == DepartmentStatus::Rejected)
            .count();

        HistoryView::Global {
            leads,
            done_count,
            rejected_count,
        }
    }
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;
