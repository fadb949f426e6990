use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{routing::get, routing::post, Json, Router};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::schemas::evaluation::EvaluationResponse;
use crate::schemas::template::{TemplateCreate, TemplateResponse};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_template))
        .route("/:template_id/evaluations", get(list_template_evaluations))
}

async fn create_template(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<TemplateCreate>,
) -> Result<(StatusCode, Json<TemplateResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let (template, items) = state.evaluations().create_template(&user.id, payload.into()).await?;

    Ok((StatusCode::CREATED, Json(TemplateResponse::from_db(template, items))))
}

async fn list_template_evaluations(
    Path(template_id): Path<String>,
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<EvaluationResponse>>, ApiError> {
    let evaluations = state.evaluations().get_evaluations_by_template_id(&template_id).await?;
    Ok(Json(evaluations.into_iter().map(EvaluationResponse::from_db).collect()))
}
