//! User directory routes: provider discovery for browsing clients.

use axum::extract::State;
use axum::Json;

use models::user;
use ::service::users;

use crate::errors::ApiError;
use crate::state::ServerState;

#[utoipa::path(get, path = "/users/providers", tag = "users",
    responses((status = 200, description = "All provider accounts, newest first")))]
pub async fn providers(
    State(state): State<ServerState>,
) -> Result<Json<Vec<user::Model>>, ApiError> {
    Ok(Json(users::list_providers(&state.db).await?))
}
