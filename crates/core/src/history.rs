// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Routing history: immutable audit records of transition actions.

use serde::{Deserialize, Serialize};

use crate::actor::UserId;
use crate::stage::StageName;

/// The kind of transition action taken on a lead.
///
/// Closed set; presentation mapping (labels, badge colors) lives entirely in
/// the UI layer via an exhaustive match over this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteAction {
    /// First assignment when the lead enters the pipeline.
    Initial,
    /// Current department marked its work done; lead moved to the next stage.
    Forward,
    /// Lead sent back to the previous stage.
    Backward,
    /// Lead rejected back to the onboarding stage.
    Reject,
    /// Manager transferred the lead to an arbitrary stage.
    ManagerOverride,
}

crate::simple_display! {
    RouteAction {
        Initial => "initial",
        Forward => "forward",
        Backward => "backward",
        Reject => "reject",
        ManagerOverride => "manager_override",
    }
}

/// One immutable audit record of a transition action taken on a lead.
///
/// Appended by the engine (via event application) when the lead enters
/// `department`; never mutated afterwards. A lead's history is strictly
/// ordered by `acted_at_ms`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingHistoryEntry {
    /// The stage the lead entered with this action.
    pub department: StageName,
    pub action: RouteAction,
    /// Who executed the routing command.
    pub actor: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub acted_at_ms: u64,
}
