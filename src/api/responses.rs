use axum::extract::{Path, State};
use axum::{routing::get, Json, Router};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::schemas::response::ResponseRecord;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/:response_id", get(get_response))
}

/// Readable by its author and by whoever controls the evaluation.
async fn get_response(
    Path(response_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<ResponseRecord>, ApiError> {
    let service = state.evaluations();
    let response = service
        .get_response_by_id(&response_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Response not found".to_string()))?;

    if response.owner_id != user.id
        && !service.can_control_evaluation(&user.id, &response.evaluation_id).await?
    {
        return Err(ApiError::Forbidden("Not allowed to read this response"));
    }

    Ok(Json(ResponseRecord::from_db(response)))
}
