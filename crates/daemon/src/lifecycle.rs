// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup, shutdown, recovery.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use fs2::FileExt;
use parking_lot::Mutex;
use thiserror::Error;
use tokio::net::UnixListener;
use tokio::sync::Notify;
use tracing::info;

use lr_core::{ConfigError, PipelineConfig};
use lr_engine::{HistoryService, RoutingEngine};
use lr_storage::{StorageError, Store};

use crate::env::{pipeline_path, state_dir};

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Root state directory (e.g. ~/.local/state/lr)
    pub state_dir: PathBuf,
    /// Path to Unix socket
    pub socket_path: PathBuf,
    /// Path to lock/PID file
    pub lock_path: PathBuf,
    /// Path to daemon log file
    pub log_path: PathBuf,
    /// Path to routing journal
    pub journal_path: PathBuf,
    /// Path to the pipeline definition
    pub pipeline_path: PathBuf,
}

impl Config {
    /// Load configuration for the user-level daemon.
    ///
    /// Uses fixed paths under `~/.local/state/lr/` (or `$XDG_STATE_HOME/lr/`).
    pub fn load() -> Result<Self, LifecycleError> {
        let state_dir = state_dir()?;
        Ok(Self::for_state_dir(state_dir))
    }

    /// Build paths rooted at an explicit state directory.
    pub fn for_state_dir(state_dir: PathBuf) -> Self {
        Self {
            socket_path: state_dir.join("daemon.sock"),
            lock_path: state_dir.join("daemon.pid"),
            log_path: state_dir.join("daemon.log"),
            journal_path: state_dir.join("routes.journal"),
            pipeline_path: pipeline_path(&state_dir),
            state_dir,
        }
    }
}

/// Daemon state during operation.
///
/// The socket listener is returned separately from startup to be spawned
/// as a task.
pub struct DaemonState {
    pub config: Config,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
    /// Routing journal and materialized state
    pub store: Arc<Mutex<Store>>,
    /// Routing engine (shared with the listener)
    pub engine: Arc<RoutingEngine>,
    /// History query service (shared with the listener)
    pub history: Arc<HistoryService>,
    /// Pipeline definition loaded at startup
    pub pipeline: PipelineConfig,
    /// When daemon started
    pub start_time: Instant,
    /// Signalled by the listener on a Shutdown request
    pub shutdown: Arc<Notify>,
}

/// Result of daemon startup: the daemon state and the socket listener.
pub struct StartupResult {
    pub daemon: DaemonState,
    pub listener: UnixListener,
}

impl std::fmt::Debug for StartupResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StartupResult").finish_non_exhaustive()
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Could not determine state directory")]
    NoStateDir,

    #[error("Failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("Failed to bind socket at {0}: {1}")]
    BindFailed(PathBuf, std::io::Error),

    #[error("Pipeline config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Start the daemon
pub fn startup(config: &Config) -> Result<StartupResult, LifecycleError> {
    match startup_inner(config) {
        Ok(result) => Ok(result),
        Err(e) => {
            // Don't clean up if we failed to acquire the lock;
            // those files belong to the already-running daemon.
            if !matches!(e, LifecycleError::LockFailed(_)) {
                cleanup_on_failure(config);
            }
            Err(e)
        }
    }
}

fn startup_inner(config: &Config) -> Result<StartupResult, LifecycleError> {
    // 1. Create state directory (needed for socket, lock, journal)
    std::fs::create_dir_all(&config.state_dir)?;

    // 2. Acquire lock file FIRST - prevents races
    // Use OpenOptions to avoid truncating the file before we hold the lock,
    // which would wipe the running daemon's PID.
    let lock_file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&config.lock_path)?;
    lock_file.try_lock_exclusive().map_err(LifecycleError::LockFailed)?;

    // Write PID to lock file (truncate now that we hold the lock)
    let mut lock_file = lock_file;
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;
    let lock_file = lock_file;

    // 3. Load the pipeline definition; startup fails on a bad pipeline
    let pipeline = PipelineConfig::load(&config.pipeline_path)?;
    info!(
        stages = pipeline.registry.iter_enabled().count(),
        users = pipeline.directory.len(),
        "loaded pipeline definition"
    );

    // 4. Replay the routing journal
    let store = Store::open(&config.journal_path)?;
    info!(leads = store.state().leads().count(), "recovered routing state");
    let store = Arc::new(Mutex::new(store));

    let engine = Arc::new(RoutingEngine::new(
        pipeline.registry.clone(),
        pipeline.policy,
        Arc::clone(&store),
        lr_core::SystemClock,
    ));
    let history = Arc::new(HistoryService::new(
        Arc::clone(&store),
        pipeline.directory.clone(),
    ));

    // 5. Remove stale socket and bind (LAST - only after all validation passes)
    if config.socket_path.exists() {
        std::fs::remove_file(&config.socket_path)?;
    }
    let listener = UnixListener::bind(&config.socket_path)
        .map_err(|e| LifecycleError::BindFailed(config.socket_path.clone(), e))?;

    Ok(StartupResult {
        daemon: DaemonState {
            config: config.clone(),
            lock_file,
            store,
            engine,
            history,
            pipeline,
            start_time: Instant::now(),
            shutdown: Arc::new(Notify::new()),
        },
        listener,
    })
}

/// Remove startup artifacts after a failed launch.
fn cleanup_on_failure(config: &Config) {
    let _ = std::fs::remove_file(&config.socket_path);
    let _ = std::fs::remove_file(&config.lock_path);
}

impl DaemonState {
    /// Shutdown the daemon gracefully.
    pub fn shutdown(&self) -> Result<(), LifecycleError> {
        info!("Shutting down daemon...");
        std::fs::remove_file(&self.config.socket_path)?;
        std::fs::remove_file(&self.config.lock_path)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
