//! Reorder endpoint
//!
//! `GET /reorder?userId=…` rewrites the order field of every task the user
//! owns.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::warn;

use todo_core::ops::reassign_order;

use super::FunctionResponse;
use crate::state::AppState;

const REORDER_FAILED: &str = "Failed to update order fields";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderQuery {
    #[serde(default)]
    pub user_id: String,
}

/// Run the reorder for `user_id`, reporting failures with `failure_message`
pub(crate) async fn run_reorder(
    state: &AppState,
    user_id: &str,
    failure_message: &str,
) -> FunctionResponse {
    match reassign_order(state.tasks(), user_id, state.reorder_options()).await {
        Ok(updated) => FunctionResponse::reordered(updated),
        Err(e) => {
            warn!("Reorder for user {:?} failed: {}", user_id, e);
            FunctionResponse::failure(failure_message, &e)
        }
    }
}

/// GET /reorder - Reassign order values for a user's tasks
async fn reorder_tasks(
    State(state): State<AppState>,
    Query(query): Query<ReorderQuery>,
) -> Json<FunctionResponse> {
    Json(run_reorder(&state, &query.user_id, REORDER_FAILED).await)
}

pub fn router() -> Router<AppState> {
    Router::new().route("/reorder", get(reorder_tasks))
}
