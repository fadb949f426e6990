use async_trait::async_trait;
use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::{Answer, AssignGroup, Evaluation, Item, Response, Template};
use crate::db::types::EvaluationState;
use crate::repositories;
use crate::services::evaluations::store::{EvaluationStore, ResponseFilter, StoreResult};

/// Postgres-backed [`EvaluationStore`].
#[derive(Clone)]
pub(crate) struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EvaluationStore for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(repositories::health::ping(&self.pool).await?)
    }

    async fn find_template(&self, id: &str) -> StoreResult<Option<Template>> {
        Ok(repositories::templates::find_by_id(&self.pool, id).await?)
    }

    async fn insert_template(&self, template: &Template, items: &[Item]) -> StoreResult<()> {
        Ok(repositories::templates::create(&self.pool, template, items).await?)
    }

    async fn list_template_items(&self, template_id: &str) -> StoreResult<Vec<Item>> {
        Ok(repositories::templates::list_items(&self.pool, template_id).await?)
    }

    async fn find_item(&self, id: &str) -> StoreResult<Option<Item>> {
        Ok(repositories::templates::find_item(&self.pool, id).await?)
    }

    async fn find_evaluation(&self, id: &str) -> StoreResult<Option<Evaluation>> {
        Ok(repositories::evaluations::find_by_id(&self.pool, id).await?)
    }

    async fn find_evaluation_by_eid(&self, eid: &str) -> StoreResult<Option<Evaluation>> {
        Ok(repositories::evaluations::find_by_eid(&self.pool, eid).await?)
    }

    async fn list_evaluations_by_template(
        &self,
        template_id: &str,
    ) -> StoreResult<Vec<Evaluation>> {
        Ok(repositories::evaluations::list_by_template(&self.pool, template_id).await?)
    }

    async fn count_evaluations_by_template(&self, template_id: &str) -> StoreResult<i64> {
        Ok(repositories::evaluations::count_by_template(&self.pool, template_id).await?)
    }

    async fn insert_evaluation(&self, evaluation: &Evaluation) -> StoreResult<()> {
        Ok(repositories::evaluations::create(&self.pool, evaluation).await?)
    }

    async fn update_evaluation(&self, evaluation: &Evaluation) -> StoreResult<()> {
        Ok(repositories::evaluations::update(&self.pool, evaluation).await?)
    }

    async fn set_evaluation_state(
        &self,
        id: &str,
        state: EvaluationState,
        now: PrimitiveDateTime,
    ) -> StoreResult<()> {
        Ok(repositories::evaluations::set_state(&self.pool, id, state, now).await?)
    }

    async fn delete_evaluation(&self, id: &str) -> StoreResult<()> {
        Ok(repositories::evaluations::delete(&self.pool, id).await?)
    }

    async fn find_assign_group(&self, id: &str) -> StoreResult<Option<AssignGroup>> {
        Ok(repositories::assign_groups::find_by_id(&self.pool, id).await?)
    }

    async fn find_assign_group_by_eid(&self, eid: &str) -> StoreResult<Option<AssignGroup>> {
        Ok(repositories::assign_groups::find_by_eid(&self.pool, eid).await?)
    }

    async fn find_assign_group_for(
        &self,
        evaluation_id: &str,
        group_ref: &str,
    ) -> StoreResult<Option<AssignGroup>> {
        Ok(repositories::assign_groups::find_for_group(&self.pool, evaluation_id, group_ref).await?)
    }

    async fn list_assign_groups(
        &self,
        evaluation_ids: &[String],
        include_unapproved: bool,
    ) -> StoreResult<Vec<AssignGroup>> {
        Ok(repositories::assign_groups::list_for_evaluations(
            &self.pool,
            evaluation_ids,
            include_unapproved,
        )
        .await?)
    }

    async fn count_assign_groups(&self, evaluation_id: &str) -> StoreResult<i64> {
        Ok(repositories::assign_groups::count_for_evaluation(&self.pool, evaluation_id).await?)
    }

    async fn insert_assign_group(&self, assign_group: &AssignGroup) -> StoreResult<()> {
        let inserted = repositories::assign_groups::create(&self.pool, assign_group).await?;
        if !inserted {
            tracing::debug!(
                evaluation_id = %assign_group.evaluation_id,
                group_ref = %assign_group.group_ref,
                "Group already assigned; insert skipped"
            );
        }
        Ok(())
    }

    async fn delete_assign_group(&self, id: &str) -> StoreResult<()> {
        Ok(repositories::assign_groups::delete(&self.pool, id).await?)
    }

    async fn find_response(&self, id: &str) -> StoreResult<Option<Response>> {
        Ok(repositories::responses::find_by_id(&self.pool, id).await?)
    }

    async fn find_response_for(
        &self,
        evaluation_id: &str,
        owner_id: &str,
        group_ref: &str,
    ) -> StoreResult<Option<Response>> {
        Ok(repositories::responses::find_for_owner(&self.pool, evaluation_id, owner_id, group_ref)
            .await?)
    }

    async fn list_responses(&self, filter: &ResponseFilter) -> StoreResult<Vec<Response>> {
        Ok(repositories::responses::list(&self.pool, filter).await?)
    }

    async fn count_responses(&self, filter: &ResponseFilter) -> StoreResult<i64> {
        Ok(repositories::responses::count(&self.pool, filter).await?)
    }

    async fn lock_responses(&self, evaluation_id: &str) -> StoreResult<u64> {
        Ok(repositories::responses::lock_for_evaluation(&self.pool, evaluation_id).await?)
    }

    async fn save_response(&self, response: &Response, answers: &[Answer]) -> StoreResult<bool> {
        Ok(repositories::responses::save(&self.pool, response, answers).await?)
    }

    async fn list_answers(
        &self,
        item_id: &str,
        evaluation_id: &str,
        group_refs: &[String],
    ) -> StoreResult<Vec<Answer>> {
        Ok(repositories::answers::list_for_item(&self.pool, item_id, evaluation_id, group_refs)
            .await?)
    }
}
