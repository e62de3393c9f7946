// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! lr-core: Domain model for the Lead Router (lr) daemon.
//!
//! Pipeline stages, leads, routing history, actors, routing policy,
//! and the events that the storage layer journals and replays.

pub mod macros;

pub mod actor;
pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod history;
pub mod lead;
pub mod policy;
pub mod stage;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use actor::{Actor, Directory, UserId};
#[cfg(any(test, feature = "test-support"))]
pub use actor::ActorBuilder;
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{ConfigError, PipelineConfig};
pub use error::RoutingError;
pub use event::RouteEvent;
pub use history::{RouteAction, RoutingHistoryEntry};
#[cfg(any(test, feature = "test-support"))]
pub use lead::LeadBuilder;
pub use lead::{DepartmentStatus, Lead, LeadId};
pub use policy::{OverrideAccess, RejectBehavior, RoutingPolicy};
pub use stage::{PipelineStage, RegistryError, StageName, StageRegistry};
