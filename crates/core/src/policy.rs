// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Routing policy toggles.
//!
//! Two behaviors the product has not pinned down are exposed as config
//! rather than hard-coded. Defaults: rejected leads restart at onboarding
//! with a working status, and override transfers need a manager role.

use serde::{Deserialize, Serialize};

/// What happens to a lead's live status when it is rejected to onboarding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectBehavior {
    /// Restart the pipeline: live status returns to Working, the Reject
    /// is retained in the history entry.
    #[default]
    Restart,
    /// Keep a distinct Rejected status on the lead at the onboarding stage.
    Mark,
}

/// Who may execute a manager-override transfer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideAccess {
    /// Admins and stage managers only.
    #[default]
    Managers,
    /// Any directory user.
    All,
}

/// Configurable routing behavior, loaded with the pipeline config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingPolicy {
    pub reject: RejectBehavior,
    pub override_access: OverrideAccess,
}
