use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::models::{AssignHierarchy, EvalGroup, User};
use crate::db::types::GroupPermission;
use crate::repositories;
use crate::services::evaluations::store::{GroupResolver, IdentityProvider, StoreResult};

/// Users, group permissions and groups mirrored into Postgres.
#[derive(Clone)]
pub(crate) struct PgDirectory {
    pool: PgPool,
}

impl PgDirectory {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityProvider for PgDirectory {
    async fn find_user(&self, user_id: &str) -> StoreResult<Option<User>> {
        Ok(repositories::directory::find_user(&self.pool, user_id).await?)
    }

    async fn is_admin(&self, user_id: &str) -> StoreResult<bool> {
        let user = repositories::directory::find_user(&self.pool, user_id).await?;
        Ok(user.is_some_and(|user| user.is_admin))
    }

    async fn has_permission(
        &self,
        user_id: &str,
        group_ref: &str,
        permission: GroupPermission,
    ) -> StoreResult<bool> {
        Ok(repositories::directory::has_permission(&self.pool, user_id, group_ref, permission)
            .await?)
    }

    async fn has_permission_anywhere(
        &self,
        user_id: &str,
        permission: GroupPermission,
    ) -> StoreResult<bool> {
        Ok(repositories::directory::has_permission_anywhere(&self.pool, user_id, permission).await?)
    }
}

#[async_trait]
impl GroupResolver for PgDirectory {
    async fn resolve_group(&self, group_ref: &str) -> StoreResult<Option<EvalGroup>> {
        Ok(repositories::directory::find_group(&self.pool, group_ref).await?)
    }

    async fn find_assign_hierarchy(&self, id: &str) -> StoreResult<Option<AssignHierarchy>> {
        Ok(repositories::directory::find_hierarchy(&self.pool, id).await?)
    }

    async fn list_assign_hierarchy(
        &self,
        evaluation_id: &str,
    ) -> StoreResult<Vec<AssignHierarchy>> {
        Ok(repositories::directory::list_hierarchy(&self.pool, evaluation_id).await?)
    }
}
