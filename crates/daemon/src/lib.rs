// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lead routing daemon library.
//!
//! Exposes the lifecycle and listener for in-process integration tests;
//! `main.rs` wires the same pieces into the `lrd` binary.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod env;
pub mod lifecycle;
pub mod listener;

pub use lifecycle::{startup, Config, DaemonState, LifecycleError, StartupResult};
pub use listener::Listener;
