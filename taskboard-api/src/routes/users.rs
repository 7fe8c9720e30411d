/// User listing endpoint
///
/// # Endpoints
///
/// - `GET /users` - List all users (bearer auth required)

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use taskboard_shared::models::user::{User, UserSummary};

/// Lists all users as `[{id, username}]`, in creation order
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserSummary>>> {
    let users = User::list(&state.db).await?;

    Ok(Json(users))
}
