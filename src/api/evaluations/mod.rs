mod handlers;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::core::state::AppState;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_evaluation))
        .route(
            "/:evaluation_id",
            get(handlers::get_evaluation)
                .patch(handlers::update_evaluation)
                .delete(handlers::remove_evaluation),
        )
        .route("/:evaluation_id/close", post(handlers::close_evaluation))
        .route("/:evaluation_id/state", post(handlers::refresh_state))
        .route("/:evaluation_id/permissions", get(handlers::get_permissions))
        .route(
            "/:evaluation_id/groups",
            get(handlers::list_groups).post(handlers::assign_groups),
        )
        .route(
            "/:evaluation_id/responses",
            get(handlers::list_responses).post(handlers::submit_response),
        )
        .route("/:evaluation_id/responses/count", get(handlers::count_responses))
        .route("/:evaluation_id/items/:item_id/answers", get(handlers::list_answers))
}

pub(crate) fn assign_groups_router() -> Router<AppState> {
    Router::new().route("/:assign_group_id", delete(handlers::delete_assign_group))
}
