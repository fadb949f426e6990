use crate::core::metrics;
use crate::db::models::Evaluation;
use crate::db::types::EvaluationState;
use crate::services::lifecycle::derive_state;

use super::error::{require_non_blank, ServiceError, ServiceResult};
use super::types::EvaluationPermissions;
use super::EvaluationService;

impl EvaluationService {
    /// Recomputes the lifecycle state from the evaluation's dates and writes
    /// it back when the cached value is stale. A `viewable` evaluation has all
    /// of its responses locked, including any a previous refresh missed.
    pub(crate) async fn update_evaluation_state(
        &self,
        evaluation_id: &str,
    ) -> ServiceResult<EvaluationState> {
        let evaluation = self.require_evaluation(evaluation_id).await?;
        self.refresh_state(&evaluation).await
    }

    pub(super) async fn refresh_state(
        &self,
        evaluation: &Evaluation,
    ) -> ServiceResult<EvaluationState> {
        let now = self.now();
        let state = derive_state(evaluation, now);

        if state != evaluation.state {
            self.store.set_evaluation_state(&evaluation.id, state, now).await?;
            metrics::record_state_transition(evaluation.state, state);
            tracing::info!(
                evaluation_id = %evaluation.id,
                from = evaluation.state.as_str(),
                to = state.as_str(),
                "Evaluation state changed"
            );
        }

        if state == EvaluationState::Viewable {
            let locked = self.store.lock_responses(&evaluation.id).await?;
            if locked > 0 {
                tracing::info!(evaluation_id = %evaluation.id, locked, "Responses locked for release");
            }
        }

        Ok(state)
    }

    /// The evaluation with its cached state replaced by the refreshed one.
    pub(super) async fn with_current_state(
        &self,
        mut evaluation: Evaluation,
    ) -> ServiceResult<Evaluation> {
        evaluation.state = self.refresh_state(&evaluation).await?;
        Ok(evaluation)
    }

    pub(crate) async fn can_begin_evaluation(&self, user_id: &str) -> ServiceResult<bool> {
        Ok(self.policy(self.now()).begin(user_id).await?.allowed)
    }

    pub(crate) async fn can_take_evaluation(
        &self,
        user_id: &str,
        evaluation_id: &str,
        group_ref: &str,
    ) -> ServiceResult<bool> {
        require_non_blank(group_ref, "group ref")?;
        let evaluation = self.require_evaluation(evaluation_id).await?;
        Ok(self.policy(self.now()).take(user_id, &evaluation, group_ref).await?.allowed)
    }

    pub(crate) async fn can_control_evaluation(
        &self,
        user_id: &str,
        evaluation_id: &str,
    ) -> ServiceResult<bool> {
        let Some(evaluation) = self.store.find_evaluation(evaluation_id).await? else {
            return Ok(false);
        };
        Ok(self.policy(self.now()).control(user_id, &evaluation).await?.allowed)
    }

    pub(crate) async fn can_remove_evaluation(
        &self,
        user_id: &str,
        evaluation_id: &str,
    ) -> ServiceResult<bool> {
        let Some(evaluation) = self.store.find_evaluation(evaluation_id).await? else {
            return Ok(false);
        };
        Ok(self.policy(self.now()).remove(user_id, &evaluation).await?.allowed)
    }

    pub(crate) async fn can_create_assign_eval(
        &self,
        user_id: &str,
        evaluation_id: &str,
    ) -> ServiceResult<bool> {
        let evaluation = self.require_evaluation(evaluation_id).await?;
        Ok(self.policy(self.now()).create_assignment(user_id, &evaluation).await?.allowed)
    }

    pub(crate) async fn can_delete_assign_group(
        &self,
        user_id: &str,
        assign_group_id: &str,
    ) -> ServiceResult<bool> {
        let assignment = self
            .store
            .find_assign_group(assign_group_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("assign group {assign_group_id}")))?;
        let evaluation = self.require_evaluation(&assignment.evaluation_id).await?;
        Ok(self.policy(self.now()).delete_assignment(user_id, &evaluation).await?.allowed)
    }

    pub(crate) async fn can_modify_response(
        &self,
        user_id: &str,
        response_id: &str,
    ) -> ServiceResult<bool> {
        let mut response = self.store.find_response(response_id).await?.ok_or_else(|| {
            ServiceError::InvalidArgument(format!("unknown response id {response_id}"))
        })?;
        if let Some(evaluation) = self.store.find_evaluation(&response.evaluation_id).await? {
            if self.refresh_state(&evaluation).await? == EvaluationState::Viewable {
                response.locked = true;
            }
        }
        Ok(self.policy(self.now()).modify_response(user_id, &response).allowed)
    }

    /// Evaluation-level decisions for one actor, computed at a single instant.
    pub(crate) async fn evaluation_permissions(
        &self,
        user_id: &str,
        evaluation_id: &str,
    ) -> ServiceResult<EvaluationPermissions> {
        let evaluation = self.require_evaluation(evaluation_id).await?;
        let now = self.now();
        let policy = self.policy(now);

        let decisions = vec![
            policy.control(user_id, &evaluation).await?,
            policy.remove(user_id, &evaluation).await?,
            policy.create_assignment(user_id, &evaluation).await?,
        ];

        Ok(EvaluationPermissions {
            evaluation_id: evaluation.id.clone(),
            state: derive_state(&evaluation, now),
            decisions,
        })
    }
}
