use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::schemas::evaluation::{
    AssignGroupResponse, AssignGroupsRequest, EvaluationCreate, EvaluationGroupsResponse,
    EvaluationPatch, EvaluationResponse, GroupResponse, GroupsQuery, PermissionsResponse,
    StateResponse,
};
use crate::schemas::response::{
    AnswerRecord, AnswersQuery, CountResponse, ResponseRecord, ResponseSubmit, ResponsesQuery,
};

pub(super) async fn create_evaluation(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<EvaluationCreate>,
) -> Result<(StatusCode, Json<EvaluationResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let evaluation = state.evaluations().create_evaluation(&user.id, payload.into()).await?;

    Ok((StatusCode::CREATED, Json(EvaluationResponse::from_db(evaluation))))
}

pub(super) async fn get_evaluation(
    Path(evaluation_id): Path<String>,
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<EvaluationResponse>, ApiError> {
    let evaluation = state
        .evaluations()
        .get_evaluation_by_id(&evaluation_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Evaluation not found".to_string()))?;

    Ok(Json(EvaluationResponse::from_db(evaluation)))
}

pub(super) async fn update_evaluation(
    Path(evaluation_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<EvaluationPatch>,
) -> Result<Json<EvaluationResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let evaluation =
        state.evaluations().update_evaluation(&user.id, &evaluation_id, payload.into()).await?;

    Ok(Json(EvaluationResponse::from_db(evaluation)))
}

pub(super) async fn remove_evaluation(
    Path(evaluation_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    state.evaluations().remove_evaluation(&user.id, &evaluation_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn close_evaluation(
    Path(evaluation_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<EvaluationResponse>, ApiError> {
    let evaluation = state.evaluations().close_evaluation(&user.id, &evaluation_id).await?;
    Ok(Json(EvaluationResponse::from_db(evaluation)))
}

pub(super) async fn refresh_state(
    Path(evaluation_id): Path<String>,
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<StateResponse>, ApiError> {
    let current = state.evaluations().update_evaluation_state(&evaluation_id).await?;
    Ok(Json(StateResponse { evaluation_id, state: current }))
}

pub(super) async fn get_permissions(
    Path(evaluation_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<PermissionsResponse>, ApiError> {
    let permissions = state.evaluations().evaluation_permissions(&user.id, &evaluation_id).await?;

    Ok(Json(PermissionsResponse {
        evaluation_id: permissions.evaluation_id,
        state: permissions.state,
        decisions: permissions.decisions,
    }))
}

pub(super) async fn list_groups(
    Path(evaluation_id): Path<String>,
    Query(query): Query<GroupsQuery>,
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<EvaluationGroupsResponse>, ApiError> {
    let service = state.evaluations();
    if !service.check_evaluation_exists(&evaluation_id).await? {
        return Err(ApiError::NotFound("Evaluation not found".to_string()));
    }

    let include_unapproved = query.include_unapproved.unwrap_or(true);
    let ids = vec![evaluation_id.clone()];
    let mut assignments = service.get_evaluation_assign_groups(&ids, include_unapproved).await?;
    let mut groups = service.get_evaluation_groups(&ids, include_unapproved).await?;

    Ok(Json(EvaluationGroupsResponse {
        assignments: assignments
            .remove(&evaluation_id)
            .unwrap_or_default()
            .into_iter()
            .map(AssignGroupResponse::from_db)
            .collect(),
        groups: groups
            .remove(&evaluation_id)
            .unwrap_or_default()
            .into_iter()
            .map(GroupResponse::from)
            .collect(),
        evaluation_id,
    }))
}

pub(super) async fn assign_groups(
    Path(evaluation_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<AssignGroupsRequest>,
) -> Result<(StatusCode, Json<Vec<AssignGroupResponse>>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let created = state
        .evaluations()
        .assign_groups(&user.id, &evaluation_id, &payload.group_refs, payload.eid)
        .await?;

    Ok((StatusCode::CREATED, Json(created.into_iter().map(AssignGroupResponse::from_db).collect())))
}

pub(super) async fn delete_assign_group(
    Path(assign_group_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    state.evaluations().delete_assign_group(&user.id, &assign_group_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Administrators see every response; everyone else only their own.
pub(super) async fn list_responses(
    Path(evaluation_id): Path<String>,
    Query(query): Query<ResponsesQuery>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<ResponseRecord>>, ApiError> {
    let group_refs = query.group_refs();
    let responses = state
        .evaluations()
        .get_evaluation_responses(
            Some(user.id.as_str()),
            &[evaluation_id],
            group_refs.as_deref(),
            query.completed,
        )
        .await?;

    Ok(Json(responses.into_iter().map(ResponseRecord::from_db).collect()))
}

pub(super) async fn count_responses(
    Path(evaluation_id): Path<String>,
    Query(query): Query<ResponsesQuery>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<CountResponse>, ApiError> {
    let group_refs = query.group_refs();
    let count = state
        .evaluations()
        .count_evaluation_responses(
            Some(user.id.as_str()),
            &[evaluation_id],
            group_refs.as_deref(),
            query.completed,
        )
        .await?;

    Ok(Json(CountResponse { count }))
}

pub(super) async fn submit_response(
    Path(evaluation_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<ResponseSubmit>,
) -> Result<Json<ResponseRecord>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let answers = payload.answers.into_iter().map(Into::into).collect();
    let response = state
        .evaluations()
        .save_response(&user.id, &evaluation_id, &payload.group_ref, answers, payload.complete)
        .await?;

    Ok(Json(ResponseRecord::from_db(response)))
}

/// Item answers are only shown to those who control the evaluation.
pub(super) async fn list_answers(
    Path((evaluation_id, item_id)): Path<(String, String)>,
    Query(query): Query<AnswersQuery>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<AnswerRecord>>, ApiError> {
    let service = state.evaluations();
    if !service.can_control_evaluation(&user.id, &evaluation_id).await? {
        return Err(ApiError::Forbidden("Not allowed to read answers for this evaluation"));
    }

    let group_refs = query.group_refs();
    let answers = service.get_eval_answers(&item_id, &evaluation_id, group_refs.as_deref()).await?;

    Ok(Json(answers.into_iter().map(AnswerRecord::from).collect()))
}
