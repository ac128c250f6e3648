//! Identity routes: register, login, and the current-user probe.

use axum::extract::State;
use axum::Json;

use service::auth::domain::{AuthSession, AuthUser, LoginInput, RegisterInput};

use crate::errors::ApiError;
use crate::extract::CurrentUser;
use crate::state::ServerState;

#[utoipa::path(post, path = "/auth/register", tag = "auth",
    responses(
        (status = 201, description = "Account created"),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Email already registered")))]
pub async fn register(
    State(state): State<ServerState>,
    Json(input): Json<RegisterInput>,
) -> Result<(axum::http::StatusCode, Json<AuthUser>), ApiError> {
    let user = state.auth.register(input).await?;
    Ok((axum::http::StatusCode::CREATED, Json(user)))
}

#[utoipa::path(post, path = "/auth/login", tag = "auth",
    responses(
        (status = 200, description = "Session with bearer token"),
        (status = 401, description = "Bad credentials")))]
pub async fn login(
    State(state): State<ServerState>,
    Json(input): Json<LoginInput>,
) -> Result<Json<AuthSession>, ApiError> {
    let session = state.auth.login(input).await?;
    Ok(Json(session))
}

#[utoipa::path(get, path = "/auth/me", tag = "auth",
    responses(
        (status = 200, description = "The authenticated user"),
        (status = 401, description = "Missing or invalid token")))]
pub async fn me(CurrentUser(user): CurrentUser) -> Json<AuthUser> {
    Json(user)
}
