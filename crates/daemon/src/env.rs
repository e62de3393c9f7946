// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;

use crate::lifecycle::LifecycleError;

/// Protocol version (from Cargo.toml)
pub const PROTOCOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Resolve state directory: LR_STATE_DIR > XDG_STATE_HOME/lr > ~/.local/state/lr
pub fn state_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("LR_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("lr"));
    }
    let home = std::env::var("HOME").map_err(|_| LifecycleError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/lr"))
}

/// Pipeline config override; defaults to `pipeline.toml` in the state dir.
pub fn pipeline_path(state_dir: &std::path::Path) -> PathBuf {
    match std::env::var("LR_PIPELINE_CONFIG") {
        Ok(path) => PathBuf::from(path),
        Err(_) => state_dir.join("pipeline.toml"),
    }
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
