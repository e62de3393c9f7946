// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline configuration: stages, policy, and the user directory.
//!
//! One TOML file loaded at daemon startup:
//!
//! ```toml
//! [[stage]]
//! name = "Seller Onboarding"
//! order = 0
//!
//! [[stage]]
//! name = "Compliance"
//! order = 2
//! terminal = true
//!
//! [policy]
//! reject = "restart"
//! override_access = "managers"
//!
//! [[user]]
//! user = "alice@example.com"
//! full_name = "Alice"
//! departments = ["Seller Onboarding"]
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::actor::{Actor, Directory, UserId};
use crate::policy::RoutingPolicy;
use crate::stage::{PipelineStage, RegistryError, StageName, StageRegistry};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("user {user} references unknown stage {stage}")]
    UnknownStageRef { user: UserId, stage: StageName },
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(rename = "stage", default)]
    stages: Vec<StageEntry>,
    #[serde(default)]
    policy: RoutingPolicy,
    #[serde(rename = "user", default)]
    users: Vec<UserEntry>,
}

#[derive(Debug, Deserialize)]
struct StageEntry {
    name: String,
    order: u32,
    #[serde(default)]
    terminal: bool,
    #[serde(default = "default_true")]
    enabled: bool,
}

#[derive(Debug, Deserialize)]
struct UserEntry {
    user: String,
    full_name: String,
    #[serde(default)]
    admin: bool,
    #[serde(default)]
    departments: Vec<String>,
    #[serde(default)]
    manages: Vec<String>,
}

fn default_true() -> bool {
    true
}

/// Validated pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub registry: StageRegistry,
    pub policy: RoutingPolicy,
    pub directory: Directory,
}

impl PipelineConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(text)?;

        let stages: Vec<PipelineStage> = file
            .stages
            .into_iter()
            .map(|s| PipelineStage {
                name: StageName::new(s.name),
                sequence_order: s.order,
                is_terminal: s.terminal,
                enabled: s.enabled,
            })
            .collect();
        let registry = StageRegistry::new(stages)?;

        let mut actors = Vec::with_capacity(file.users.len());
        for entry in file.users {
            let user = UserId::new(entry.user);
            let departments = resolve_stage_refs(&registry, &user, entry.departments)?;
            let manages = resolve_stage_refs(&registry, &user, entry.manages)?;
            actors.push(Actor {
                user,
                full_name: entry.full_name,
                admin: entry.admin,
                departments,
                manages,
            });
        }

        Ok(Self {
            registry,
            policy: file.policy,
            directory: Directory::new(actors),
        })
    }
}

fn resolve_stage_refs(
    registry: &StageRegistry,
    user: &UserId,
    names: Vec<String>,
) -> Result<BTreeSet<StageName>, ConfigError> {
    let mut set = BTreeSet::new();
    for name in names {
        let stage = StageName::new(name);
        registry.get(&stage).map_err(|_| ConfigError::UnknownStageRef {
            user: user.clone(),
            stage: stage.clone(),
        })?;
        set.insert(stage);
    }
    Ok(set)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
