//! Booking routes: the availability grid, intake, status decisions,
//! cancellation, and the per-party list views.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;
use uuid::Uuid;

use service::reservation::domain::{
    AvailabilitySlot, CreateReservation, Reservation, ReservationView,
};

use crate::errors::ApiError;
use crate::extract::CurrentUser;
use crate::state::ServerState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct AvailabilityQuery {
    /// Calendar day, `YYYY-MM-DD`.
    pub date: String,
}

#[derive(Serialize)]
pub struct AvailabilityOutput {
    pub slots: Vec<AvailabilitySlot>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusBody {
    pub status: String,
}

#[utoipa::path(get, path = "/reservations/{provider_id}/availability", tag = "reservations",
    params(("provider_id" = Uuid, Path, description = "Provider to query"), AvailabilityQuery),
    responses(
        (status = 200, description = "Nine hourly slots with availability flags"),
        (status = 400, description = "Malformed date"),
        (status = 404, description = "Unknown provider")))]
pub async fn availability(
    State(state): State<ServerState>,
    Path(provider_id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityOutput>, ApiError> {
    let slots = state.reservations.availability(provider_id, &query.date).await?;
    Ok(Json(AvailabilityOutput { slots }))
}

#[utoipa::path(post, path = "/reservations", tag = "reservations",
    responses(
        (status = 201, description = "Reservation created, pending"),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Slot already confirmed")))]
pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<CreateReservation>,
) -> Result<(StatusCode, Json<Reservation>), ApiError> {
    let created = state.reservations.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(put, path = "/reservations/{id}/status", tag = "reservations",
    params(("id" = Uuid, Path, description = "Reservation id")),
    responses(
        (status = 200, description = "Updated reservation"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not the reservation's provider"),
        (status = 409, description = "Another reservation already holds the slot")))]
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<UpdateStatusBody>,
) -> Result<Json<Reservation>, ApiError> {
    let updated = state.reservations.update_status(id, &body.status, user.id).await?;
    Ok(Json(updated))
}

#[utoipa::path(delete, path = "/reservations/{id}", tag = "reservations",
    params(("id" = Uuid, Path, description = "Reservation id")),
    responses(
        (status = 204, description = "Reservation removed"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller may not cancel this reservation"),
        (status = 404, description = "Unknown reservation")))]
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    CurrentUser(user): CurrentUser,
) -> Result<StatusCode, ApiError> {
    state.reservations.delete(id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/reservations", tag = "reservations",
    responses((status = 200, description = "All reservations, expanded")))]
pub async fn list_all(
    State(state): State<ServerState>,
) -> Result<Json<Vec<ReservationView>>, ApiError> {
    Ok(Json(state.reservations.list_all().await?))
}

#[utoipa::path(get, path = "/reservations/client", tag = "reservations",
    responses(
        (status = 200, description = "Reservations booked by the caller"),
        (status = 401, description = "Missing or invalid token")))]
pub async fn list_for_client(
    State(state): State<ServerState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<ReservationView>>, ApiError> {
    Ok(Json(state.reservations.list_for_client(user.id).await?))
}

#[utoipa::path(get, path = "/reservations/provider", tag = "reservations",
    responses(
        (status = 200, description = "Reservations addressed to the caller"),
        (status = 401, description = "Missing or invalid token")))]
pub async fn list_for_provider(
    State(state): State<ServerState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<ReservationView>>, ApiError> {
    Ok(Json(state.reservations.list_for_provider(user.id).await?))
}
