// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline stages and the validated stage registry.
//!
//! A stage is one department step in the lead pipeline. Traversal order is
//! the ascending `sequence_order` over enabled stages, never insertion
//! order. The registry validates the ordering invariants once at load time
//! so the engine can treat `next_stage`/`previous_stage` as total over
//! registered stages.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use thiserror::Error;

use crate::error::RoutingError;

/// Name of a department pipeline stage (unique within the registry).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageName(pub SmolStr);

impl StageName {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StageName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for StageName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for StageName {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for StageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for StageName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for StageName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A department stage in the lead pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStage {
    pub name: StageName,
    /// Position in the pipeline; injective across the registry.
    pub sequence_order: u32,
    /// Terminal stages may end a lead's lifecycle; no forward movement past them.
    #[serde(default)]
    pub is_terminal: bool,
    /// Disabled stages are invisible to traversal and transfer targets.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl PipelineStage {
    pub fn new(name: impl Into<StageName>, sequence_order: u32) -> Self {
        Self {
            name: name.into(),
            sequence_order,
            is_terminal: false,
            enabled: true,
        }
    }

    pub fn terminal(mut self) -> Self {
        self.is_terminal = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Registry construction failures (load-time validation).
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("duplicate stage name: {0}")]
    DuplicateName(StageName),

    #[error("stages {first} and {second} share sequence_order {order}")]
    DuplicateOrder {
        first: StageName,
        second: StageName,
        order: u32,
    },

    #[error("pipeline has no enabled stages")]
    EmptyPipeline,
}

/// Ordered registry of department pipeline stages.
///
/// Holds all configured stages sorted by `sequence_order`; traversal and
/// lookup only see enabled stages. Queries against an unknown (or disabled)
/// stage fail with [`RoutingError::UnknownStage`].
#[derive(Debug, Clone)]
pub struct StageRegistry {
    /// All stages, sorted ascending by sequence_order.
    stages: Vec<PipelineStage>,
}

impl StageRegistry {
    pub fn new(mut stages: Vec<PipelineStage>) -> Result<Self, RegistryError> {
        stages.sort_by_key(|s| s.sequence_order);

        for pair in stages.windows(2) {
            if pair[0].sequence_order == pair[1].sequence_order {
                return Err(RegistryError::DuplicateOrder {
                    first: pair[0].name.clone(),
                    second: pair[1].name.clone(),
                    order: pair[0].sequence_order,
                });
            }
        }
        for (i, stage) in stages.iter().enumerate() {
            if stages[..i].iter().any(|s| s.name == stage.name) {
                return Err(RegistryError::DuplicateName(stage.name.clone()));
            }
        }
        if !stages.iter().any(|s| s.enabled) {
            return Err(RegistryError::EmptyPipeline);
        }

        Ok(Self { stages })
    }

    /// Look up an enabled stage by name.
    pub fn get(&self, name: &StageName) -> Result<&PipelineStage, RoutingError> {
        self.stages
            .iter()
            .find(|s| s.enabled && s.name == *name)
            .ok_or_else(|| RoutingError::UnknownStage(name.clone()))
    }

    /// The enabled stage with the next-higher sequence_order, or `None`
    /// when `current` is terminal or last.
    pub fn next_stage(&self, current: &StageName) -> Result<Option<&PipelineStage>, RoutingError> {
        let stage = self.get(current)?;
        if stage.is_terminal {
            return Ok(None);
        }
        Ok(self
            .stages
            .iter()
            .find(|s| s.enabled && s.sequence_order > stage.sequence_order))
    }

    /// The enabled stage with the next-lower sequence_order, or `None`
    /// when `current` is first.
    pub fn previous_stage(
        &self,
        current: &StageName,
    ) -> Result<Option<&PipelineStage>, RoutingError> {
        let stage = self.get(current)?;
        Ok(self
            .stages
            .iter()
            .rev()
            .find(|s| s.enabled && s.sequence_order < stage.sequence_order))
    }

    /// The first enabled stage, i.e. the onboarding stage rejects reset to.
    pub fn first_stage(&self) -> &PipelineStage {
        match self.stages.iter().find(|s| s.enabled) {
            Some(stage) => stage,
            // Construction rejects a pipeline with no enabled stages.
            None => unreachable!(),
        }
    }

    pub fn is_terminal(&self, name: &StageName) -> Result<bool, RoutingError> {
        Ok(self.get(name)?.is_terminal)
    }

    /// All enabled stages except `current`, sorted by name for display.
    pub fn transfer_targets(
        &self,
        current: &StageName,
    ) -> Result<Vec<&PipelineStage>, RoutingError> {
        self.get(current)?;
        let mut targets: Vec<&PipelineStage> = self
            .stages
            .iter()
            .filter(|s| s.enabled && s.name != *current)
            .collect();
        targets.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(targets)
    }

    /// Enabled stages in traversal order.
    pub fn iter_enabled(&self) -> impl Iterator<Item = &PipelineStage> {
        self.stages.iter().filter(|s| s.enabled)
    }
}

#[cfg(test)]
#[path = "stage_tests.rs"]
mod tests;
