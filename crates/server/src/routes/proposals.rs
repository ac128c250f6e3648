//! Proposal routes: the offerings providers publish and clients book.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use models::service_proposal;
use service::proposals;

use crate::errors::ApiError;
use crate::extract::CurrentUser;
use crate::state::ServerState;

#[derive(Debug, Deserialize)]
pub struct ProposalBody {
    pub title: String,
    pub service_id: Uuid,
    pub price: f64,
    pub description: String,
}

#[utoipa::path(get, path = "/proposals", tag = "proposals",
    responses((status = 200, description = "All proposals, newest first")))]
pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Vec<service_proposal::Model>>, ApiError> {
    Ok(Json(proposals::list_proposals(&state.db).await?))
}

#[utoipa::path(get, path = "/proposals/recent", tag = "proposals",
    responses((status = 200, description = "The five newest proposals")))]
pub async fn recent(
    State(state): State<ServerState>,
) -> Result<Json<Vec<service_proposal::Model>>, ApiError> {
    Ok(Json(proposals::list_recent(&state.db).await?))
}

#[utoipa::path(get, path = "/proposals/provider/{id}", tag = "proposals",
    params(("id" = Uuid, Path, description = "Provider id")),
    responses((status = 200, description = "Proposals authored by the provider")))]
pub async fn by_provider(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<service_proposal::Model>>, ApiError> {
    Ok(Json(proposals::list_by_provider(&state.db, id).await?))
}

#[utoipa::path(get, path = "/proposals/service/{id}", tag = "proposals",
    params(("id" = Uuid, Path, description = "Service id")),
    responses((status = 200, description = "Proposals for the service")))]
pub async fn by_service(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<service_proposal::Model>>, ApiError> {
    Ok(Json(proposals::list_by_service(&state.db, id).await?))
}

#[utoipa::path(get, path = "/proposals/category/{id}", tag = "proposals",
    params(("id" = Uuid, Path, description = "Category id")),
    responses((status = 200, description = "Available proposals across the category")))]
pub async fn by_category(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<service_proposal::Model>>, ApiError> {
    Ok(Json(proposals::list_by_category(&state.db, id).await?))
}

#[utoipa::path(post, path = "/proposals", tag = "proposals",
    responses(
        (status = 201, description = "Proposal published"),
        (status = 400, description = "Validation failed, or caller is not a provider"),
        (status = 401, description = "Missing or invalid token")))]
pub async fn create(
    State(state): State<ServerState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<ProposalBody>,
) -> Result<(StatusCode, Json<service_proposal::Model>), ApiError> {
    let created = proposals::create_proposal(
        &state.db,
        user.id,
        &body.title,
        body.service_id,
        body.price,
        &body.description,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(delete, path = "/proposals/{id}", tag = "proposals",
    params(("id" = Uuid, Path, description = "Proposal id")),
    responses(
        (status = 204, description = "Proposal removed"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller does not own the proposal")))]
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    CurrentUser(user): CurrentUser,
) -> Result<StatusCode, ApiError> {
    proposals::delete_proposal(&state.db, id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
