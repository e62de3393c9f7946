// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures and proptest strategies for tests across the workspace.

#![allow(clippy::panic)]

use crate::actor::{Actor, ActorBuilder};
use crate::history::{RouteAction, RoutingHistoryEntry};
use crate::stage::{PipelineStage, StageRegistry};

/// The three-stage pipeline used throughout the test suite:
/// Onboarding(0) → Verification(1) → Compliance(2, terminal).
pub fn three_stage_registry() -> StageRegistry {
    match StageRegistry::new(vec![
        PipelineStage::new("Onboarding", 0),
        PipelineStage::new("Verification", 1),
        PipelineStage::new("Compliance", 2).terminal(),
    ]) {
        Ok(registry) => registry,
        Err(e) => panic!("fixture registry invalid: {e}"),
    }
}

/// Department user for a single stage.
pub fn dept_actor(user: &str, stage: &str) -> Actor {
    ActorBuilder::default().user(user).full_name(user).department(stage).build()
}

/// Admin actor.
pub fn admin_actor(user: &str) -> Actor {
    ActorBuilder::default().user(user).full_name(user).admin(true).build()
}

/// Manager of a single stage.
pub fn manager_actor(user: &str, stage: &str) -> Actor {
    ActorBuilder::default().user(user).full_name(user).managed(stage).build()
}

/// Bare history entry.
pub fn entry(department: &str, action: RouteAction, actor: &str, at_ms: u64) -> RoutingHistoryEntry {
    RoutingHistoryEntry {
        department: department.into(),
        action,
        actor: actor.into(),
        notes: None,
        acted_at_ms: at_ms,
    }
}

pub mod strategies {
    use proptest::prelude::*;

    use crate::history::RouteAction;

    pub fn route_action() -> impl Strategy<Value = RouteAction> {
        prop_oneof![
            Just(RouteAction::Initial),
            Just(RouteAction::Forward),
            Just(RouteAction::Backward),
            Just(RouteAction::Reject),
            Just(RouteAction::ManagerOverride),
        ]
    }
}
