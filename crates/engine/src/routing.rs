// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Routing commands: validated transitions between department stages.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;

use lr_core::{
    Actor, Clock, DepartmentStatus, Lead, LeadId, OverrideAccess, RejectBehavior, RouteAction,
    RouteEvent, RoutingError, RoutingHistoryEntry, RoutingPolicy, StageName, StageRegistry,
    SystemClock,
};
use lr_storage::Store;

/// Result of `mark_department_done`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// The lead finished its lifecycle at a terminal stage.
    Completed,
    /// The lead moved forward to the next stage.
    Moved { to: StageName },
}

/// Validates and executes lead transitions.
///
/// Commands serialize on the store mutex: state read, role check, journal
/// append, and state apply form one atomic unit per command. A validation
/// failure leaves state and history untouched.
pub struct RoutingEngine<C: Clock = SystemClock> {
    registry: StageRegistry,
    policy: RoutingPolicy,
    store: Arc<Mutex<Store>>,
    clock: C,
}

impl<C: Clock> RoutingEngine<C> {
    pub fn new(
        registry: StageRegistry,
        policy: RoutingPolicy,
        store: Arc<Mutex<Store>>,
        clock: C,
    ) -> Self {
        Self {
            registry,
            policy,
            store,
            clock,
        }
    }

    pub fn registry(&self) -> &StageRegistry {
        &self.registry
    }

    /// Route a new lead into the pipeline.
    ///
    /// A department user's lead stays in their own department; anyone
    /// else's starts at the first stage.
    pub fn create_lead(
        &self,
        lead_name: &str,
        actor: &Actor,
    ) -> Result<(LeadId, StageName), RoutingError> {
        let stage = match actor.home_department() {
            Some(dept) => self.registry.get(dept)?.name.clone(),
            None => self.registry.first_stage().name.clone(),
        };
        let id = LeadId::new();
        let mut store = self.store.lock();
        commit(
            &mut store,
            RouteEvent::LeadCreated {
                id: id.clone(),
                lead_name: lead_name.to_string(),
                stage: stage.clone(),
                actor: actor.user.clone(),
                at_ms: self.clock.epoch_ms(),
            },
        )?;
        info!(lead = %id, stage = %stage, actor = %actor.user, "lead created");
        Ok((id, stage))
    }

    /// Current department marks its work done: the lead moves to the next
    /// stage, or completes its lifecycle when the current stage is terminal.
    pub fn mark_department_done(
        &self,
        lead_id: &LeadId,
        actor: &Actor,
    ) -> Result<RouteOutcome, RoutingError> {
        let mut store = self.store.lock();
        let current = self.validate_command(&store, lead_id, actor)?;
        let now = self.clock.epoch_ms();

        if self.registry.is_terminal(&current)? {
            commit(
                &mut store,
                RouteEvent::LeadCompleted {
                    id: lead_id.clone(),
                    stage: current.clone(),
                    actor: actor.user.clone(),
                    at_ms: now,
                },
            )?;
            info!(lead = %lead_id, stage = %current, "lead lifecycle completed");
            return Ok(RouteOutcome::Completed);
        }

        let next = self
            .registry
            .next_stage(&current)?
            .ok_or_else(|| RoutingError::NoNextStage(current.clone()))?
            .name
            .clone();
        commit(
            &mut store,
            RouteEvent::LeadRouted {
                id: lead_id.clone(),
                action: RouteAction::Forward,
                from: current.clone(),
                to: next.clone(),
                actor: actor.user.clone(),
                notes: None,
                status: DepartmentStatus::Working,
                at_ms: now,
            },
        )?;
        info!(lead = %lead_id, from = %current, to = %next, "lead moved forward");
        Ok(RouteOutcome::Moved { to: next })
    }

    /// Send the lead back to the previous stage in the pipeline.
    pub fn send_back_to_department(
        &self,
        lead_id: &LeadId,
        actor: &Actor,
    ) -> Result<StageName, RoutingError> {
        let mut store = self.store.lock();
        let current = self.validate_command(&store, lead_id, actor)?;
        let prev = self
            .registry
            .previous_stage(&current)?
            .ok_or_else(|| RoutingError::NoPreviousStage(current.clone()))?
            .name
            .clone();

        commit(
            &mut store,
            RouteEvent::LeadRouted {
                id: lead_id.clone(),
                action: RouteAction::Backward,
                from: current.clone(),
                to: prev.clone(),
                actor: actor.user.clone(),
                notes: None,
                status: DepartmentStatus::Working,
                at_ms: self.clock.epoch_ms(),
            },
        )?;
        info!(lead = %lead_id, from = %current, to = %prev, "lead sent back");
        Ok(prev)
    }

    /// Reject the lead back to the onboarding (first) stage.
    ///
    /// The resulting live status follows the reject policy: `Restart`
    /// returns it to Working, `Mark` keeps a Rejected status; the Reject
    /// action is retained in the history entry either way.
    pub fn reject_to_onboarding(
        &self,
        lead_id: &LeadId,
        actor: &Actor,
    ) -> Result<StageName, RoutingError> {
        let mut store = self.store.lock();
        let current = self.validate_command(&store, lead_id, actor)?;
        let onboarding = self.registry.first_stage().name.clone();
        if current == onboarding {
            return Err(RoutingError::InvalidTarget(onboarding));
        }

        let status = match self.policy.reject {
            RejectBehavior::Restart => DepartmentStatus::Working,
            RejectBehavior::Mark => DepartmentStatus::Rejected,
        };
        commit(
            &mut store,
            RouteEvent::LeadRouted {
                id: lead_id.clone(),
                action: RouteAction::Reject,
                from: current.clone(),
                to: onboarding.clone(),
                actor: actor.user.clone(),
                notes: None,
                status,
                at_ms: self.clock.epoch_ms(),
            },
        )?;
        info!(lead = %lead_id, from = %current, status = %status, "lead rejected to onboarding");
        Ok(onboarding)
    }

    /// Transfer the lead to an arbitrary stage, bypassing pipeline order.
    ///
    /// Who may do this follows the override-access policy.
    pub fn manager_override_transfer(
        &self,
        lead_id: &LeadId,
        actor: &Actor,
        target: &StageName,
        notes: Option<String>,
    ) -> Result<StageName, RoutingError> {
        let mut store = self.store.lock();
        let lead = lookup_active(&store, lead_id)?;
        let current = current_department(lead)?.clone();

        let allowed = match self.policy.override_access {
            OverrideAccess::Managers => actor.is_manager(),
            OverrideAccess::All => true,
        };
        if !allowed {
            return Err(RoutingError::permission_denied(
                &actor.user,
                "transfer leads between departments",
            ));
        }

        let target = self.registry.get(target)?.name.clone();
        if target == current {
            return Err(RoutingError::InvalidTarget(target));
        }

        commit(
            &mut store,
            RouteEvent::LeadRouted {
                id: lead_id.clone(),
                action: RouteAction::ManagerOverride,
                from: current.clone(),
                to: target.clone(),
                actor: actor.user.clone(),
                notes: notes.filter(|n| !n.is_empty()),
                status: DepartmentStatus::Working,
                at_ms: self.clock.epoch_ms(),
            },
        )?;
        info!(lead = %lead_id, from = %current, to = %target, actor = %actor.user, "manager override transfer");
        Ok(target)
    }

    /// All stages a lead at `current` could be transferred to.
    pub fn transfer_targets(&self, current: &StageName) -> Result<Vec<StageName>, RoutingError> {
        Ok(self
            .registry
            .transfer_targets(current)?
            .into_iter()
            .map(|s| s.name.clone())
            .collect())
    }

    /// Full ordered routing history for one lead.
    pub fn lead_history(&self, lead_id: &LeadId) -> Result<Vec<RoutingHistoryEntry>, RoutingError> {
        let store = self.store.lock();
        Ok(lookup(&store, lead_id)?.history.clone())
    }

    /// Shared prologue for commands acting on the lead's current stage:
    /// lead exists, is not completed, and the actor holds a role there.
    fn validate_command(
        &self,
        store: &Store,
        lead_id: &LeadId,
        actor: &Actor,
    ) -> Result<StageName, RoutingError> {
        let lead = lookup_active(store, lead_id)?;
        let current = current_department(lead)?;
        if !actor.can_route(current) {
            return Err(RoutingError::permission_denied(
                &actor.user,
                format!("route leads in {current}"),
            ));
        }
        Ok(current.clone())
    }
}

fn lookup<'a>(store: &'a Store, lead_id: &LeadId) -> Result<&'a Lead, RoutingError> {
    store
        .state()
        .get_lead(lead_id)
        .ok_or_else(|| RoutingError::LeadNotFound(lead_id.clone()))
}

/// Lookup for mutating commands: completed leads accept no further routing.
fn lookup_active<'a>(store: &'a Store, lead_id: &LeadId) -> Result<&'a Lead, RoutingError> {
    let lead = lookup(store, lead_id)?;
    if lead.is_completed() {
        return Err(RoutingError::LeadAlreadyCompleted(lead_id.clone()));
    }
    Ok(lead)
}

fn current_department(lead: &Lead) -> Result<&StageName, RoutingError> {
    // Leads created through the engine always carry a department; a bare
    // lead here means the journal was tampered with.
    lead.current_department
        .as_ref()
        .ok_or_else(|| RoutingError::Storage(format!("lead {} has no department", lead.id)))
}

fn commit(store: &mut Store, event: RouteEvent) -> Result<(), RoutingError> {
    store
        .commit(event)
        .map_err(|e| RoutingError::Storage(e.to_string()))
}

#[cfg(test)]
#[path = "routing_tests.rs"]
mod tests;
