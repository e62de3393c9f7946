// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;
use tempfile::TempDir;

const PIPELINE: &str = r#"
[[stage]]
name = "Onboarding"
order = 0

[[stage]]
name = "Verification"
order = 1

[[stage]]
name = "Compliance"
order = 2
terminal = true

[[user]]
user = "root@example.com"
full_name = "Root"
admin = true
"#;

fn config_in(dir: &TempDir) -> Config {
    let config = Config::for_state_dir(dir.path().join("state"));
    std::fs::create_dir_all(&config.state_dir).unwrap();
    std::fs::write(&config.pipeline_path, PIPELINE).unwrap();
    config
}

#[test]
#[serial]
fn config_paths_are_rooted_at_state_dir() {
    let config = Config::for_state_dir(PathBuf::from("/tmp/lr-test"));
    assert_eq!(config.socket_path, PathBuf::from("/tmp/lr-test/daemon.sock"));
    assert_eq!(config.lock_path, PathBuf::from("/tmp/lr-test/daemon.pid"));
    assert_eq!(config.journal_path, PathBuf::from("/tmp/lr-test/routes.journal"));
}

#[tokio::test]
#[serial]
async fn startup_binds_socket_and_writes_pid() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);

    let result = startup(&config).unwrap();

    assert!(config.socket_path.exists());
    let pid = std::fs::read_to_string(&config.lock_path).unwrap();
    assert_eq!(pid.trim(), std::process::id().to_string());
    assert_eq!(result.daemon.pipeline.directory.len(), 1);
}

#[tokio::test]
#[serial]
async fn second_startup_fails_while_lock_held() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);

    let _running = startup(&config).unwrap();
    let err = startup(&config).unwrap_err();
    assert!(matches!(err, LifecycleError::LockFailed(_)));

    // The running daemon's socket must survive the failed second launch.
    assert!(config.socket_path.exists());
}

#[tokio::test]
#[serial]
async fn startup_fails_without_pipeline_definition() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::for_state_dir(dir.path().join("state"));

    let err = startup(&config).unwrap_err();
    assert!(matches!(err, LifecycleError::Config(_)));

    // Failed launch leaves no stale lock behind.
    assert!(!config.lock_path.exists());
}

#[tokio::test]
#[serial]
async fn startup_replays_existing_journal() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);

    {
        let result = startup(&config).unwrap();
        let admin = result.daemon.pipeline.directory.resolve(&"root@example.com".into());
        result
            .daemon
            .engine
            .create_lead("Acme Corp", admin.unwrap())
            .unwrap();
        result.daemon.shutdown().unwrap();
    }

    let result = startup(&config).unwrap();
    assert_eq!(result.daemon.store.lock().state().leads().count(), 1);
}

#[tokio::test]
#[serial]
async fn shutdown_removes_socket_and_lock() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);

    let result = startup(&config).unwrap();
    result.daemon.shutdown().unwrap();

    assert!(!config.socket_path.exists());
    assert!(!config.lock_path.exists());
}
