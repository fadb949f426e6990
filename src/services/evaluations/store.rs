use async_trait::async_trait;
use thiserror::Error;
use time::PrimitiveDateTime;

use crate::db::models::{
    Answer, AssignGroup, AssignHierarchy, EvalGroup, Evaluation, Item, Response, Template, User,
};
use crate::db::types::{EvaluationState, GroupPermission};

#[derive(Debug, Error)]
#[error("{0}")]
pub(crate) struct StoreError(pub(crate) String);

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self(err.to_string())
    }
}

pub(crate) type StoreResult<T> = Result<T, StoreError>;

/// Criteria for response listings and counts.
///
/// An empty `group_refs` means "any group"; `completed` is tri-state and
/// `owner_id` narrows to one respondent.
#[derive(Debug, Clone, Default)]
pub(crate) struct ResponseFilter {
    pub(crate) evaluation_ids: Vec<String>,
    pub(crate) owner_id: Option<String>,
    pub(crate) group_refs: Vec<String>,
    pub(crate) completed: Option<bool>,
}

/// Persistence for templates, evaluations, assignments and responses.
#[async_trait]
pub(crate) trait EvaluationStore: Send + Sync {
    async fn ping(&self) -> StoreResult<()>;

    async fn find_template(&self, id: &str) -> StoreResult<Option<Template>>;
    async fn insert_template(&self, template: &Template, items: &[Item]) -> StoreResult<()>;
    async fn list_template_items(&self, template_id: &str) -> StoreResult<Vec<Item>>;
    async fn find_item(&self, id: &str) -> StoreResult<Option<Item>>;

    async fn find_evaluation(&self, id: &str) -> StoreResult<Option<Evaluation>>;
    async fn find_evaluation_by_eid(&self, eid: &str) -> StoreResult<Option<Evaluation>>;
    async fn list_evaluations_by_template(&self, template_id: &str)
        -> StoreResult<Vec<Evaluation>>;
    async fn count_evaluations_by_template(&self, template_id: &str) -> StoreResult<i64>;
    async fn insert_evaluation(&self, evaluation: &Evaluation) -> StoreResult<()>;
    async fn update_evaluation(&self, evaluation: &Evaluation) -> StoreResult<()>;
    async fn set_evaluation_state(
        &self,
        id: &str,
        state: EvaluationState,
        now: PrimitiveDateTime,
    ) -> StoreResult<()>;
    /// Removes the evaluation together with its assignments, responses and
    /// answers.
    async fn delete_evaluation(&self, id: &str) -> StoreResult<()>;

    async fn find_assign_group(&self, id: &str) -> StoreResult<Option<AssignGroup>>;
    async fn find_assign_group_by_eid(&self, eid: &str) -> StoreResult<Option<AssignGroup>>;
    async fn find_assign_group_for(
        &self,
        evaluation_id: &str,
        group_ref: &str,
    ) -> StoreResult<Option<AssignGroup>>;
    /// Assignments of all given evaluations, oldest first.
    async fn list_assign_groups(
        &self,
        evaluation_ids: &[String],
        include_unapproved: bool,
    ) -> StoreResult<Vec<AssignGroup>>;
    async fn count_assign_groups(&self, evaluation_id: &str) -> StoreResult<i64>;
    async fn insert_assign_group(&self, assign_group: &AssignGroup) -> StoreResult<()>;
    async fn delete_assign_group(&self, id: &str) -> StoreResult<()>;

    async fn find_response(&self, id: &str) -> StoreResult<Option<Response>>;
    async fn find_response_for(
        &self,
        evaluation_id: &str,
        owner_id: &str,
        group_ref: &str,
    ) -> StoreResult<Option<Response>>;
    async fn list_responses(&self, filter: &ResponseFilter) -> StoreResult<Vec<Response>>;
    async fn count_responses(&self, filter: &ResponseFilter) -> StoreResult<i64>;
    /// Locks every response of the evaluation; returns how many changed.
    async fn lock_responses(&self, evaluation_id: &str) -> StoreResult<u64>;
    /// Inserts or updates the response and replaces its answers atomically.
    /// Returns `false`, writing nothing, when another response already holds
    /// the same evaluation, group and owner.
    async fn save_response(&self, response: &Response, answers: &[Answer]) -> StoreResult<bool>;
    async fn list_answers(
        &self,
        item_id: &str,
        evaluation_id: &str,
        group_refs: &[String],
    ) -> StoreResult<Vec<Answer>>;
}

/// Role and group permission facts about actors.
#[async_trait]
pub(crate) trait IdentityProvider: Send + Sync {
    async fn find_user(&self, user_id: &str) -> StoreResult<Option<User>>;
    async fn is_admin(&self, user_id: &str) -> StoreResult<bool>;
    async fn has_permission(
        &self,
        user_id: &str,
        group_ref: &str,
        permission: GroupPermission,
    ) -> StoreResult<bool>;
    async fn has_permission_anywhere(
        &self,
        user_id: &str,
        permission: GroupPermission,
    ) -> StoreResult<bool>;
}

/// Resolves delivery targets: groups by reference and hierarchy nodes an
/// evaluation is assigned to.
#[async_trait]
pub(crate) trait GroupResolver: Send + Sync {
    async fn resolve_group(&self, group_ref: &str) -> StoreResult<Option<EvalGroup>>;
    async fn find_assign_hierarchy(&self, id: &str) -> StoreResult<Option<AssignHierarchy>>;
    async fn list_assign_hierarchy(&self, evaluation_id: &str)
        -> StoreResult<Vec<AssignHierarchy>>;
}
