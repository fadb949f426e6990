use serde::Serialize;
use time::PrimitiveDateTime;

use crate::core::config::EvaluationSettings;
use crate::core::metrics;
use crate::db::models::{Evaluation, Response};
use crate::db::types::{AuthControl, EvaluationState, GroupPermission};
use crate::services::evaluations::store::{EvaluationStore, IdentityProvider, StoreResult};
use crate::services::lifecycle::derive_state;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Capability {
    Begin,
    Take,
    Control,
    Remove,
    CreateAssignment,
    DeleteAssignment,
    ModifyResponse,
}

impl Capability {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Begin => "begin",
            Self::Take => "take",
            Self::Control => "control",
            Self::Remove => "remove",
            Self::CreateAssignment => "create_assignment",
            Self::DeleteAssignment => "delete_assignment",
            Self::ModifyResponse => "modify_response",
        }
    }
}

/// Outcome of one authorization question, with the lifecycle state it was
/// based on (when the rule depends on one).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct AccessDecision {
    pub(crate) capability: Capability,
    pub(crate) allowed: bool,
    pub(crate) state: Option<EvaluationState>,
    pub(crate) reason: &'static str,
}

/// Every evaluation-level authorization rule lives here. Lifecycle state is
/// always recomputed from the evaluation's dates at `now`.
pub(crate) struct AccessPolicy<'a> {
    store: &'a dyn EvaluationStore,
    identity: &'a dyn IdentityProvider,
    settings: EvaluationSettings,
    now: PrimitiveDateTime,
}

enum Standing {
    Owner,
    Administrator,
    Outsider,
}

impl Standing {
    fn reason(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Administrator => "administrator",
            Self::Outsider => "not_owner",
        }
    }

    fn is_privileged(&self) -> bool {
        !matches!(self, Self::Outsider)
    }
}

impl<'a> AccessPolicy<'a> {
    pub(crate) fn new(
        store: &'a dyn EvaluationStore,
        identity: &'a dyn IdentityProvider,
        settings: EvaluationSettings,
        now: PrimitiveDateTime,
    ) -> Self {
        Self { store, identity, settings, now }
    }

    pub(crate) async fn begin(&self, actor: &str) -> StoreResult<AccessDecision> {
        if self.identity.is_admin(actor).await? {
            return Ok(decide(actor, Capability::Begin, true, None, "administrator"));
        }

        let can_assign =
            self.identity.has_permission_anywhere(actor, GroupPermission::AssignEvaluation).await?;
        let reason = if can_assign { "assign_permission" } else { "no_assign_permission" };
        Ok(decide(actor, Capability::Begin, can_assign, None, reason))
    }

    pub(crate) async fn take(
        &self,
        actor: &str,
        evaluation: &Evaluation,
        group_ref: &str,
    ) -> StoreResult<AccessDecision> {
        let state = derive_state(evaluation, self.now);
        let deny = |reason| Ok(decide(actor, Capability::Take, false, Some(state), reason));

        if state != EvaluationState::Active {
            return deny("evaluation_not_active");
        }

        match self.store.find_assign_group_for(&evaluation.id, group_ref).await? {
            None => return deny("group_not_assigned"),
            Some(assignment) if !assignment.instructor_approval => {
                return deny("assignment_not_approved")
            }
            Some(_) => {}
        }

        let is_admin = self.identity.is_admin(actor).await?;
        if !is_admin
            && evaluation.auth_control == AuthControl::Required
            && !self
                .identity
                .has_permission(actor, group_ref, GroupPermission::BeEvaluated)
                .await?
        {
            return deny("not_evaluated_in_group");
        }

        let previous = self.store.find_response_for(&evaluation.id, actor, group_ref).await?;
        if previous.as_ref().is_some_and(Response::is_complete) {
            if evaluation.modify_responses_allowed {
                return Ok(decide(actor, Capability::Take, true, Some(state), "resubmit_allowed"));
            }
            if is_admin && self.settings.admin_bypass_response_check {
                return Ok(decide(actor, Capability::Take, true, Some(state), "admin_bypass"));
            }
            return deny("already_responded");
        }

        let reason = if is_admin { "administrator" } else { "respondent" };
        Ok(decide(actor, Capability::Take, true, Some(state), reason))
    }

    pub(crate) async fn control(
        &self,
        actor: &str,
        evaluation: &Evaluation,
    ) -> StoreResult<AccessDecision> {
        let state = derive_state(evaluation, self.now);
        let standing = self.standing(actor, evaluation).await?;
        Ok(decide(actor, Capability::Control, standing.is_privileged(), Some(state), standing.reason()))
    }

    pub(crate) async fn remove(
        &self,
        actor: &str,
        evaluation: &Evaluation,
    ) -> StoreResult<AccessDecision> {
        self.gated(actor, evaluation, Capability::Remove, &[EvaluationState::InQueue]).await
    }

    pub(crate) async fn create_assignment(
        &self,
        actor: &str,
        evaluation: &Evaluation,
    ) -> StoreResult<AccessDecision> {
        self.gated(
            actor,
            evaluation,
            Capability::CreateAssignment,
            &[EvaluationState::InQueue, EvaluationState::Active],
        )
        .await
    }

    /// `evaluation` is the one the assignment belongs to.
    pub(crate) async fn delete_assignment(
        &self,
        actor: &str,
        evaluation: &Evaluation,
    ) -> StoreResult<AccessDecision> {
        self.gated(actor, evaluation, Capability::DeleteAssignment, &[EvaluationState::InQueue])
            .await
    }

    /// Author only, and only while unlocked. Administrators get no override.
    pub(crate) fn modify_response(&self, actor: &str, response: &Response) -> AccessDecision {
        let (allowed, reason) = if response.owner_id != actor {
            (false, "not_author")
        } else if response.locked {
            (false, "response_locked")
        } else {
            (true, "author")
        };
        decide(actor, Capability::ModifyResponse, allowed, None, reason)
    }

    async fn gated(
        &self,
        actor: &str,
        evaluation: &Evaluation,
        capability: Capability,
        open_states: &[EvaluationState],
    ) -> StoreResult<AccessDecision> {
        let state = derive_state(evaluation, self.now);
        let standing = self.standing(actor, evaluation).await?;

        if !standing.is_privileged() {
            return Ok(decide(actor, capability, false, Some(state), standing.reason()));
        }
        if !open_states.contains(&state) {
            return Ok(decide(actor, capability, false, Some(state), "state_forbids"));
        }
        Ok(decide(actor, capability, true, Some(state), standing.reason()))
    }

    async fn standing(&self, actor: &str, evaluation: &Evaluation) -> StoreResult<Standing> {
        if evaluation.owner_id == actor {
            return Ok(Standing::Owner);
        }
        if self.identity.is_admin(actor).await? {
            return Ok(Standing::Administrator);
        }
        Ok(Standing::Outsider)
    }
}

fn decide(
    actor: &str,
    capability: Capability,
    allowed: bool,
    state: Option<EvaluationState>,
    reason: &'static str,
) -> AccessDecision {
    metrics::record_access_decision(capability.as_str(), allowed);
    if !allowed {
        tracing::debug!(
            actor,
            capability = capability.as_str(),
            state = state.map(EvaluationState::as_str),
            reason,
            "Access denied"
        );
    }

    AccessDecision { capability, allowed, state, reason }
}
