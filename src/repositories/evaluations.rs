use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::Evaluation;
use crate::db::types::EvaluationState;

pub(crate) const COLUMNS: &str = "\
    id, eid, template_id, owner_id, title, instructions, \
    start_date, due_date, stop_date, view_date, instructors_date, students_date, \
    reminder_days, results_private, auth_control, modify_responses_allowed, \
    blank_responses_allowed, force_closed, state, created_at, updated_at";

pub(crate) async fn find_by_id(
    pool: &PgPool,
    id: &str,
) -> Result<Option<Evaluation>, sqlx::Error> {
    sqlx::query_as::<_, Evaluation>(&format!("SELECT {COLUMNS} FROM evaluations WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_by_eid(
    pool: &PgPool,
    eid: &str,
) -> Result<Option<Evaluation>, sqlx::Error> {
    sqlx::query_as::<_, Evaluation>(&format!("SELECT {COLUMNS} FROM evaluations WHERE eid = $1"))
        .bind(eid)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list_by_template(
    pool: &PgPool,
    template_id: &str,
) -> Result<Vec<Evaluation>, sqlx::Error> {
    sqlx::query_as::<_, Evaluation>(&format!(
        "SELECT {COLUMNS} FROM evaluations WHERE template_id = $1 ORDER BY start_date, id"
    ))
    .bind(template_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn count_by_template(pool: &PgPool, template_id: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM evaluations WHERE template_id = $1")
        .bind(template_id)
        .fetch_one(pool)
        .await
}

pub(crate) async fn create(pool: &PgPool, evaluation: &Evaluation) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO evaluations (
            id, eid, template_id, owner_id, title, instructions,
            start_date, due_date, stop_date, view_date, instructors_date, students_date,
            reminder_days, results_private, auth_control, modify_responses_allowed,
            blank_responses_allowed, force_closed, state, created_at, updated_at
         ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15,$16,$17,$18,$19,$20,$21)",
    )
    .bind(&evaluation.id)
    .bind(&evaluation.eid)
    .bind(&evaluation.template_id)
    .bind(&evaluation.owner_id)
    .bind(&evaluation.title)
    .bind(&evaluation.instructions)
    .bind(evaluation.start_date)
    .bind(evaluation.due_date)
    .bind(evaluation.stop_date)
    .bind(evaluation.view_date)
    .bind(evaluation.instructors_date)
    .bind(evaluation.students_date)
    .bind(evaluation.reminder_days)
    .bind(evaluation.results_private)
    .bind(evaluation.auth_control)
    .bind(evaluation.modify_responses_allowed)
    .bind(evaluation.blank_responses_allowed)
    .bind(evaluation.force_closed)
    .bind(evaluation.state)
    .bind(evaluation.created_at)
    .bind(evaluation.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Writes back every editable column. The cached state is left to
/// [`set_state`].
pub(crate) async fn update(pool: &PgPool, evaluation: &Evaluation) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE evaluations SET
            title = $1,
            instructions = $2,
            start_date = $3,
            due_date = $4,
            stop_date = $5,
            view_date = $6,
            instructors_date = $7,
            students_date = $8,
            reminder_days = $9,
            results_private = $10,
            auth_control = $11,
            modify_responses_allowed = $12,
            blank_responses_allowed = $13,
            force_closed = $14,
            updated_at = $15
         WHERE id = $16",
    )
    .bind(&evaluation.title)
    .bind(&evaluation.instructions)
    .bind(evaluation.start_date)
    .bind(evaluation.due_date)
    .bind(evaluation.stop_date)
    .bind(evaluation.view_date)
    .bind(evaluation.instructors_date)
    .bind(evaluation.students_date)
    .bind(evaluation.reminder_days)
    .bind(evaluation.results_private)
    .bind(evaluation.auth_control)
    .bind(evaluation.modify_responses_allowed)
    .bind(evaluation.blank_responses_allowed)
    .bind(evaluation.force_closed)
    .bind(evaluation.updated_at)
    .bind(&evaluation.id)
    .execute(pool)
    .await?;

    Ok(())
}

pub(crate) async fn set_state(
    pool: &PgPool,
    id: &str,
    state: EvaluationState,
    now: PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE evaluations SET state = $1, updated_at = $2 WHERE id = $3")
        .bind(state)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Assignments, responses and answers go with it through the cascading
/// foreign keys.
pub(crate) async fn delete(pool: &PgPool, id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM evaluations WHERE id = $1").bind(id).execute(pool).await?;
    Ok(())
}
