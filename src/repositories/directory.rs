use sqlx::PgPool;

use crate::db::models::{AssignHierarchy, EvalGroup, User};
use crate::db::types::GroupPermission;

const HIERARCHY_COLUMNS: &str = "id, evaluation_id, node_id, owner_id, created_at";

pub(crate) async fn find_user(pool: &PgPool, user_id: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT id, display_name, is_admin FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn has_permission(
    pool: &PgPool,
    user_id: &str,
    group_ref: &str,
    permission: GroupPermission,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT EXISTS (
            SELECT 1 FROM group_permissions
            WHERE user_id = $1 AND group_ref = $2 AND permission = $3
         )",
    )
    .bind(user_id)
    .bind(group_ref)
    .bind(permission)
    .fetch_one(pool)
    .await
}

pub(crate) async fn has_permission_anywhere(
    pool: &PgPool,
    user_id: &str,
    permission: GroupPermission,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT EXISTS (
            SELECT 1 FROM group_permissions WHERE user_id = $1 AND permission = $2
         )",
    )
    .bind(user_id)
    .bind(permission)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_group(
    pool: &PgPool,
    group_ref: &str,
) -> Result<Option<EvalGroup>, sqlx::Error> {
    sqlx::query_as::<_, EvalGroup>(
        "SELECT group_ref, title, group_type FROM eval_groups WHERE group_ref = $1",
    )
    .bind(group_ref)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn find_hierarchy(
    pool: &PgPool,
    id: &str,
) -> Result<Option<AssignHierarchy>, sqlx::Error> {
    sqlx::query_as::<_, AssignHierarchy>(&format!(
        "SELECT {HIERARCHY_COLUMNS} FROM assign_hierarchy WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_hierarchy(
    pool: &PgPool,
    evaluation_id: &str,
) -> Result<Vec<AssignHierarchy>, sqlx::Error> {
    sqlx::query_as::<_, AssignHierarchy>(&format!(
        "SELECT {HIERARCHY_COLUMNS} FROM assign_hierarchy \
         WHERE evaluation_id = $1 ORDER BY created_at, id"
    ))
    .bind(evaluation_id)
    .fetch_all(pool)
    .await
}
