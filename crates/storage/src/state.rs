// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialized routing state, derived from journal replay.

use std::collections::HashMap;

use lr_core::{DepartmentStatus, Lead, LeadId, RouteEvent, RoutingHistoryEntry};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// All lead routing state, materialized from [`RouteEvent`]s.
///
/// Events are facts about what happened; state is derived from those facts.
/// Replaying the same journal always reconstructs the same state.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct RoutingState {
    pub leads: HashMap<LeadId, Lead>,
}

impl RoutingState {
    pub fn get_lead(&self, id: &LeadId) -> Option<&Lead> {
        self.leads.get(id)
    }

    pub fn leads(&self) -> impl Iterator<Item = &Lead> {
        self.leads.values()
    }

    /// Apply an event to derive state changes.
    ///
    /// Replay-safe: a `LeadCreated` for an existing lead is skipped, and
    /// events for unknown leads are dropped with a warning rather than
    /// panicking mid-replay.
    pub fn apply(&mut self, event: &RouteEvent) {
        match event {
            RouteEvent::LeadCreated {
                id,
                lead_name,
                stage,
                actor,
                at_ms,
            } => {
                if self.leads.contains_key(id) {
                    return;
                }
                let lead = Lead::new(
                    id.clone(),
                    lead_name.clone(),
                    stage.clone(),
                    actor.clone(),
                    *at_ms,
                );
                self.leads.insert(id.clone(), lead);
            }

            RouteEvent::LeadRouted {
                id,
                action,
                from: _,
                to,
                actor,
                notes,
                status,
                at_ms,
            } => {
                let Some(lead) = self.leads.get_mut(id) else {
                    warn!(lead = %id, "routed event for unknown lead");
                    return;
                };
                lead.current_department = Some(to.clone());
                lead.department_status = *status;
                lead.append_entry(RoutingHistoryEntry {
                    department: to.clone(),
                    action: *action,
                    actor: actor.clone(),
                    notes: notes.clone(),
                    acted_at_ms: *at_ms,
                });
            }

            RouteEvent::LeadCompleted { id, at_ms, .. } => {
                let Some(lead) = self.leads.get_mut(id) else {
                    warn!(lead = %id, "completed event for unknown lead");
                    return;
                };
                // Completion ends the lifecycle in place; no move entry.
                lead.department_status = DepartmentStatus::Done;
                lead.modified_at_ms = *at_ms;
            }
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
