//! Catalog routes: services and categories.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use models::{category, service};
// Leading `::` keeps this resolving against the crate, not `models::service`
use ::service::catalog;

use crate::errors::ApiError;
use crate::state::ServerState;

#[derive(Debug, Deserialize)]
pub struct ServiceBody {
    pub name: String,
    #[serde(default)]
    pub photo: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryBody {
    pub name: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub services: Vec<Uuid>,
}

/// Partial update: every field optional, `services` replaces the set.
#[derive(Debug, Deserialize)]
pub struct CategoryUpdateBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub services: Option<Vec<Uuid>>,
}

#[utoipa::path(get, path = "/services", tag = "catalog",
    responses((status = 200, description = "All services")))]
pub async fn list_services(
    State(state): State<ServerState>,
) -> Result<Json<Vec<service::Model>>, ApiError> {
    Ok(Json(catalog::list_services(&state.db).await?))
}

#[utoipa::path(post, path = "/services", tag = "catalog",
    responses(
        (status = 201, description = "Service created"),
        (status = 400, description = "Validation failed")))]
pub async fn create_service(
    State(state): State<ServerState>,
    Json(body): Json<ServiceBody>,
) -> Result<(StatusCode, Json<service::Model>), ApiError> {
    let created = catalog::create_service(&state.db, &body.name, body.photo).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(put, path = "/services/{id}", tag = "catalog",
    params(("id" = Uuid, Path, description = "Service id")),
    responses(
        (status = 200, description = "Updated service"),
        (status = 404, description = "Unknown service")))]
pub async fn update_service(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ServiceBody>,
) -> Result<Json<service::Model>, ApiError> {
    let updated = catalog::update_service(&state.db, id, &body.name, body.photo).await?;
    Ok(Json(updated))
}

#[utoipa::path(delete, path = "/services/{id}", tag = "catalog",
    params(("id" = Uuid, Path, description = "Service id")),
    responses(
        (status = 204, description = "Service removed"),
        (status = 404, description = "Unknown service")))]
pub async fn delete_service(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    catalog::delete_service(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/categories", tag = "catalog",
    responses((status = 200, description = "All categories")))]
pub async fn list_categories(
    State(state): State<ServerState>,
) -> Result<Json<Vec<category::Model>>, ApiError> {
    Ok(Json(catalog::list_categories(&state.db).await?))
}

#[utoipa::path(post, path = "/categories", tag = "catalog",
    responses(
        (status = 201, description = "Category created"),
        (status = 400, description = "Validation failed")))]
pub async fn create_category(
    State(state): State<ServerState>,
    Json(body): Json<CategoryBody>,
) -> Result<(StatusCode, Json<category::Model>), ApiError> {
    let created =
        catalog::create_category(&state.db, &body.name, body.photo, &body.services).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(put, path = "/categories/{id}", tag = "catalog",
    params(("id" = Uuid, Path, description = "Category id")),
    responses(
        (status = 200, description = "Updated category"),
        (status = 404, description = "Unknown category")))]
pub async fn update_category(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(body): Json<CategoryUpdateBody>,
) -> Result<Json<category::Model>, ApiError> {
    let updated = catalog::update_category(
        &state.db,
        id,
        body.name.as_deref(),
        body.photo,
        body.services.as_deref(),
    )
    .await?;
    Ok(Json(updated))
}

#[utoipa::path(delete, path = "/categories/{id}", tag = "catalog",
    params(("id" = Uuid, Path, description = "Category id")),
    responses(
        (status = 204, description = "Category removed"),
        (status = 404, description = "Unknown category")))]
pub async fn delete_category(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    catalog::delete_category(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/categories/{id}/services", tag = "catalog",
    params(("id" = Uuid, Path, description = "Category id")),
    responses(
        (status = 200, description = "Services attached to the category"),
        (status = 404, description = "Unknown category")))]
pub async fn services_of_category(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<service::Model>>, ApiError> {
    Ok(Json(catalog::services_of_category(&state.db, id).await?))
}
