use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::db::models::{Answer, Response};
use crate::services::evaluations::store::ResponseFilter;

pub(crate) const COLUMNS: &str = "\
    id, evaluation_id, group_ref, owner_id, started_at, completed_at, locked, \
    created_at, updated_at";

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Response>, sqlx::Error> {
    sqlx::query_as::<_, Response>(&format!("SELECT {COLUMNS} FROM responses WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_for_owner(
    pool: &PgPool,
    evaluation_id: &str,
    owner_id: &str,
    group_ref: &str,
) -> Result<Option<Response>, sqlx::Error> {
    sqlx::query_as::<_, Response>(&format!(
        "SELECT {COLUMNS} FROM responses \
         WHERE evaluation_id = $1 AND owner_id = $2 AND group_ref = $3"
    ))
    .bind(evaluation_id)
    .bind(owner_id)
    .bind(group_ref)
    .fetch_optional(pool)
    .await
}

fn push_filter<'a>(builder: &mut QueryBuilder<'a, Postgres>, filter: &'a ResponseFilter) {
    builder.push(" WHERE evaluation_id = ANY(");
    builder.push_bind(&filter.evaluation_ids);
    builder.push(")");

    if let Some(owner_id) = &filter.owner_id {
        builder.push(" AND owner_id = ");
        builder.push_bind(owner_id);
    }
    if !filter.group_refs.is_empty() {
        builder.push(" AND group_ref = ANY(");
        builder.push_bind(&filter.group_refs);
        builder.push(")");
    }
    match filter.completed {
        Some(true) => {
            builder.push(" AND completed_at IS NOT NULL");
        }
        Some(false) => {
            builder.push(" AND completed_at IS NULL");
        }
        None => {}
    }
}

pub(crate) async fn list(pool: &PgPool, filter: &ResponseFilter) -> Result<Vec<Response>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM responses"));
    push_filter(&mut builder, filter);
    builder.push(" ORDER BY created_at, id");
    builder.build_query_as::<Response>().fetch_all(pool).await
}

pub(crate) async fn count(pool: &PgPool, filter: &ResponseFilter) -> Result<i64, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM responses");
    push_filter(&mut builder, filter);
    builder.build_query_scalar::<i64>().fetch_one(pool).await
}

pub(crate) async fn lock_for_evaluation(
    pool: &PgPool,
    evaluation_id: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE responses SET locked = TRUE WHERE evaluation_id = $1 AND locked = FALSE",
    )
    .bind(evaluation_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

/// Upserts the response on its (evaluation, group, owner) key and replaces its
/// answers in one transaction. Returns `false` without writing when that key
/// already belongs to a different response.
pub(crate) async fn save(
    pool: &PgPool,
    response: &Response,
    answers: &[Answer],
) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let upserted = sqlx::query(
        "INSERT INTO responses (
            id, evaluation_id, group_ref, owner_id, started_at, completed_at, locked,
            created_at, updated_at
         ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9)
         ON CONFLICT (evaluation_id, group_ref, owner_id) DO UPDATE
             SET completed_at = EXCLUDED.completed_at,
                 locked = responses.locked OR EXCLUDED.locked,
                 updated_at = EXCLUDED.updated_at
             WHERE responses.id = EXCLUDED.id",
    )
    .bind(&response.id)
    .bind(&response.evaluation_id)
    .bind(&response.group_ref)
    .bind(&response.owner_id)
    .bind(response.started_at)
    .bind(response.completed_at)
    .bind(response.locked)
    .bind(response.created_at)
    .bind(response.updated_at)
    .execute(&mut *tx)
    .await?;

    if upserted.rows_affected() == 0 {
        tx.rollback().await?;
        return Ok(false);
    }

    sqlx::query("DELETE FROM answers WHERE response_id = $1")
        .bind(&response.id)
        .execute(&mut *tx)
        .await?;

    for answer in answers {
        sqlx::query(
            "INSERT INTO answers (id, response_id, item_id, numeric_value, text_value, created_at)
             VALUES ($1,$2,$3,$4,$5,$6)",
        )
        .bind(&answer.id)
        .bind(&answer.response_id)
        .bind(&answer.item_id)
        .bind(answer.numeric_value)
        .bind(&answer.text_value)
        .bind(answer.created_at)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(true)
}
