// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Routing error taxonomy.
//!
//! All request-scoped validation failures, surfaced to the caller verbatim.
//! A failed command leaves lead state and history untouched.

use thiserror::Error;

use crate::actor::UserId;
use crate::lead::LeadId;
use crate::stage::StageName;

#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("unknown stage: {0}")]
    UnknownStage(StageName),

    #[error("lead not found: {0}")]
    LeadNotFound(LeadId),

    #[error("lead {0} has already completed its lifecycle")]
    LeadAlreadyCompleted(LeadId),

    #[error("no next stage configured after {0}")]
    NoNextStage(StageName),

    #[error("no previous stage configured before {0}")]
    NoPreviousStage(StageName),

    #[error("invalid transfer target: {0}")]
    InvalidTarget(StageName),

    #[error("{user} does not have permission to {action}")]
    PermissionDenied { user: UserId, action: String },

    #[error("storage error: {0}")]
    Storage(String),
}

impl RoutingError {
    pub fn permission_denied(user: &UserId, action: impl Into<String>) -> Self {
        RoutingError::PermissionDenied {
            user: user.clone(),
            action: action.into(),
        }
    }
}
