// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
#[serial]
fn state_dir_prefers_explicit_override() {
    std::env::set_var("LR_STATE_DIR", "/tmp/lr-override");
    std::env::set_var("XDG_STATE_HOME", "/tmp/xdg");

    let dir = state_dir().unwrap();
    assert_eq!(dir, PathBuf::from("/tmp/lr-override"));

    std::env::remove_var("LR_STATE_DIR");
    std::env::remove_var("XDG_STATE_HOME");
}

#[test]
#[serial]
fn state_dir_falls_back_to_xdg_state_home() {
    std::env::remove_var("LR_STATE_DIR");
    std::env::set_var("XDG_STATE_HOME", "/tmp/xdg");

    let dir = state_dir().unwrap();
    assert_eq!(dir, PathBuf::from("/tmp/xdg/lr"));

    std::env::remove_var("XDG_STATE_HOME");
}

#[test]
#[serial]
fn state_dir_defaults_under_home() {
    std::env::remove_var("LR_STATE_DIR");
    std::env::remove_var("XDG_STATE_HOME");
    let original_home = std::env::var("HOME").ok();
    std::env::set_var("HOME", "/home/vera");

    let dir = state_dir().unwrap();
    assert_eq!(dir, PathBuf::from("/home/vera/.local/state/lr"));

    match original_home {
        Some(home) => std::env::set_var("HOME", home),
        None => std::env::remove_var("HOME"),
    }
}

#[test]
#[serial]
fn state_dir_fails_without_any_root() {
    std::env::remove_var("LR_STATE_DIR");
    std::env::remove_var("XDG_STATE_HOME");
    let original_home = std::env::var("HOME").ok();
    std::env::remove_var("HOME");

    let err = state_dir().unwrap_err();
    assert!(matches!(err, LifecycleError::NoStateDir));

    if let Some(home) = original_home {
        std::env::set_var("HOME", home);
    }
}

#[test]
#[serial]
fn pipeline_path_override_wins_over_state_dir() {
    std::env::set_var("LR_PIPELINE_CONFIG", "/etc/lr/pipeline.toml");

    let path = pipeline_path(std::path::Path::new("/var/lib/lr"));
    assert_eq!(path, PathBuf::from("/etc/lr/pipeline.toml"));

    std::env::remove_var("LR_PIPELINE_CONFIG");
}

#[test]
#[serial]
fn pipeline_path_defaults_into_state_dir() {
    std::env::remove_var("LR_PIPELINE_CONFIG");

    let path = pipeline_path(std::path::Path::new("/var/lib/lr"));
    assert_eq!(path, PathBuf::from("/var/lib/lr/pipeline.toml"));
}
