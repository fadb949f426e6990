use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::db::models::AssignGroup;

pub(crate) const COLUMNS: &str =
    "id, eid, evaluation_id, group_ref, owner_id, instructor_approval, created_at";

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<AssignGroup>, sqlx::Error> {
    sqlx::query_as::<_, AssignGroup>(&format!("SELECT {COLUMNS} FROM assign_groups WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_by_eid(
    pool: &PgPool,
    eid: &str,
) -> Result<Option<AssignGroup>, sqlx::Error> {
    sqlx::query_as::<_, AssignGroup>(&format!("SELECT {COLUMNS} FROM assign_groups WHERE eid = $1"))
        .bind(eid)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_for_group(
    pool: &PgPool,
    evaluation_id: &str,
    group_ref: &str,
) -> Result<Option<AssignGroup>, sqlx::Error> {
    sqlx::query_as::<_, AssignGroup>(&format!(
        "SELECT {COLUMNS} FROM assign_groups WHERE evaluation_id = $1 AND group_ref = $2"
    ))
    .bind(evaluation_id)
    .bind(group_ref)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_for_evaluations(
    pool: &PgPool,
    evaluation_ids: &[String],
    include_unapproved: bool,
) -> Result<Vec<AssignGroup>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(format!(
        "SELECT {COLUMNS} FROM assign_groups WHERE evaluation_id = ANY("
    ));
    builder.push_bind(evaluation_ids);
    builder.push(")");

    if !include_unapproved {
        builder.push(" AND instructor_approval = TRUE");
    }

    builder.push(" ORDER BY created_at, id");
    builder.build_query_as::<AssignGroup>().fetch_all(pool).await
}

pub(crate) async fn count_for_evaluation(
    pool: &PgPool,
    evaluation_id: &str,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM assign_groups WHERE evaluation_id = $1")
        .bind(evaluation_id)
        .fetch_one(pool)
        .await
}

/// Returns false when the evaluation already has this group.
pub(crate) async fn create(pool: &PgPool, assign_group: &AssignGroup) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO assign_groups (
            id, eid, evaluation_id, group_ref, owner_id, instructor_approval, created_at
         ) VALUES ($1,$2,$3,$4,$5,$6,$7)
         ON CONFLICT (evaluation_id, group_ref) DO NOTHING",
    )
    .bind(&assign_group.id)
    .bind(&assign_group.eid)
    .bind(&assign_group.evaluation_id)
    .bind(&assign_group.group_ref)
    .bind(&assign_group.owner_id)
    .bind(assign_group.instructor_approval)
    .bind(assign_group.created_at)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub(crate) async fn delete(pool: &PgPool, id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM assign_groups WHERE id = $1").bind(id).execute(pool).await?;
    Ok(())
}
