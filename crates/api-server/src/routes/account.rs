//! Account endpoint
//!
//! `GET /account?action=…&userId=…` either reorders the user's tasks or
//! deletes the account together with its avatar and tasks.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::{info, warn};

use todo_core::ops::{purge_account, AccountAction};

use super::reorder::run_reorder;
use super::FunctionResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountQuery {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub user_id: String,
}

/// GET /account - Dispatch on the requested action
async fn account_action(
    State(state): State<AppState>,
    Query(query): Query<AccountQuery>,
) -> (StatusCode, Json<FunctionResponse>) {
    let Some(action) = query.action.as_deref().and_then(AccountAction::parse) else {
        warn!("Rejecting account request with action {:?}", query.action);
        return (
            StatusCode::BAD_REQUEST,
            Json(FunctionResponse::unsupported_action(query.action.as_deref())),
        );
    };

    info!("Account action {} for user {:?}", action.as_str(), query.user_id);

    let response = match action {
        AccountAction::ReassignOrder => {
            run_reorder(&state, &query.user_id, "Failed to reassign order").await
        }
        AccountAction::DeleteUser => match purge_account(
            state.users(),
            state.files(),
            state.tasks(),
            state.bucket_id(),
            &query.user_id,
        )
        .await
        {
            Ok(report) => FunctionResponse::purged(report),
            Err(e) => {
                warn!("Deleting user {:?} failed: {}", query.user_id, e);
                FunctionResponse::failure("Failed to delete user", &e)
            }
        },
    };

    (StatusCode::OK, Json(response))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/account", get(account_action))
}
