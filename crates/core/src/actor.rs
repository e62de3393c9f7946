// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Actors and the user directory.
//!
//! An [`Actor`] is the capability object passed explicitly into every routing
//! command: resolved once per session from the [`Directory`], never looked up
//! ambiently mid-command.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::stage::StageName;

/// Identity of a directory user (typically an email address).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub SmolStr);

impl UserId {
    pub fn new(id: impl Into<SmolStr>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for UserId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for UserId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// The authenticated identity executing a routing command.
///
/// Role membership is resolved once per request from the directory; commands
/// receive the resolved capability, not the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user: UserId,
    pub full_name: String,
    /// Admins pass every role gate.
    #[serde(default)]
    pub admin: bool,
    /// Stages where this user holds the department role.
    #[serde(default)]
    pub departments: BTreeSet<StageName>,
    /// Stages where this user holds the manager role.
    #[serde(default)]
    pub manages: BTreeSet<StageName>,
}

impl Actor {
    /// Can this actor execute routing commands on a lead sitting at `stage`?
    ///
    /// Department users and managers of the stage qualify; admins always do.
    pub fn can_route(&self, stage: &StageName) -> bool {
        self.admin || self.departments.contains(stage) || self.manages.contains(stage)
    }

    /// Does this actor manage any stage (or hold admin)?
    pub fn is_manager(&self) -> bool {
        self.admin || !self.manages.is_empty()
    }

    /// The department a lead created by this actor starts in, if any.
    ///
    /// A department user's new leads stay in their own department; the first
    /// department role wins when a user somehow holds several.
    pub fn home_department(&self) -> Option<&StageName> {
        self.departments.iter().next()
    }
}

crate::builder! {
    pub struct ActorBuilder => Actor {
        into {
            user: UserId = "user@example.com",
            full_name: String = "Test User",
        }
        set {
            admin: bool = false,
            departments: BTreeSet<StageName> = BTreeSet::new(),
            manages: BTreeSet<StageName> = BTreeSet::new(),
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
impl ActorBuilder {
    /// Add a department role.
    pub fn department(mut self, stage: impl Into<StageName>) -> Self {
        self.departments.insert(stage.into());
        self
    }

    /// Add a manager role.
    pub fn managed(mut self, stage: impl Into<StageName>) -> Self {
        self.manages.insert(stage.into());
        self
    }
}

/// Directory of known users, loaded from the pipeline config file.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    users: HashMap<UserId, Actor>,
}

impl Directory {
    pub fn new(users: impl IntoIterator<Item = Actor>) -> Self {
        Self {
            users: users.into_iter().map(|a| (a.user.clone(), a)).collect(),
        }
    }

    /// Resolve a session identity to its actor capability.
    pub fn resolve(&self, user: &UserId) -> Option<&Actor> {
        self.users.get(user)
    }

    /// Display name for a user, falling back to the raw ID for unknown users.
    pub fn full_name(&self, user: &UserId) -> String {
        self.users
            .get(user)
            .map(|a| a.full_name.clone())
            .unwrap_or_else(|| user.to_string())
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
#[path = "actor_tests.rs"]
mod tests;
