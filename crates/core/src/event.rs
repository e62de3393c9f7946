// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Routing events: the facts the journal records and state is derived from.

use serde::{Deserialize, Serialize};

use crate::actor::UserId;
use crate::history::RouteAction;
use crate::lead::{DepartmentStatus, LeadId};
use crate::stage::StageName;

/// A committed routing fact.
///
/// Each successful routing command produces exactly one event; the journal
/// appends it and [`RoutingState`](../../lr-storage) applies it. Serializes
/// with `{"type": "lead:...", ...fields}` format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RouteEvent {
    /// A lead entered the pipeline.
    #[serde(rename = "lead:created")]
    LeadCreated {
        id: LeadId,
        lead_name: String,
        /// Stage the lead starts in (first stage, or the creator's own
        /// department for department users).
        stage: StageName,
        actor: UserId,
        at_ms: u64,
    },

    /// A lead moved between departments.
    #[serde(rename = "lead:routed")]
    LeadRouted {
        id: LeadId,
        action: RouteAction,
        from: StageName,
        to: StageName,
        actor: UserId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        notes: Option<String>,
        /// Resulting live status (Working, or Rejected under the `mark`
        /// reject policy).
        status: DepartmentStatus,
        at_ms: u64,
    },

    /// A lead finished its lifecycle at a terminal stage.
    #[serde(rename = "lead:completed")]
    LeadCompleted {
        id: LeadId,
        stage: StageName,
        actor: UserId,
        at_ms: u64,
    },
}

impl RouteEvent {
    /// The lead this event belongs to.
    pub fn lead_id(&self) -> &LeadId {
        match self {
            RouteEvent::LeadCreated { id, .. }
            | RouteEvent::LeadRouted { id, .. }
            | RouteEvent::LeadCompleted { id, .. } => id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_tag_with_type_field() {
        let event = RouteEvent::LeadCompleted {
            id: "lead-1".into(),
            stage: "Compliance".into(),
            actor: "admin@example.com".into(),
            at_ms: 7,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "lead:completed");
    }

    #[test]
    fn routed_event_roundtrip_keeps_notes() {
        let event = RouteEvent::LeadRouted {
            id: "lead-1".into(),
            action: RouteAction::ManagerOverride,
            from: "Onboarding".into(),
            to: "Compliance".into(),
            actor: "mgr@example.com".into(),
            notes: Some("expedite".into()),
            status: DepartmentStatus::Working,
            at_ms: 12,
        };
        let json = serde_json::to_string(&event).unwrap();
        let parsed: RouteEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }
}
