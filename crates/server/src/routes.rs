use axum::{
    routing::{delete, get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::state::ServerState;

pub mod auth;
pub mod catalog;
pub mod proposals;
pub mod reservations;
pub mod users;

#[utoipa::path(get, path = "/health", tag = "health",
    responses((status = 200, description = "Service is up")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: public catalog/booking surface,
/// bearer-protected personal routes, docs, and the trace/CORS layers.
pub fn build_router(state: ServerState) -> Router {
    let reservation_routes = Router::new()
        .route(
            "/reservations",
            get(reservations::list_all).post(reservations::create),
        )
        .route("/reservations/client", get(reservations::list_for_client))
        .route("/reservations/provider", get(reservations::list_for_provider))
        .route("/reservations/:provider_id/availability", get(reservations::availability))
        .route("/reservations/:id/status", put(reservations::update_status))
        .route("/reservations/:id", delete(reservations::delete));

    let auth_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route("/users/providers", get(users::providers));

    let catalog_routes = Router::new()
        .route("/services", get(catalog::list_services).post(catalog::create_service))
        .route(
            "/services/:id",
            put(catalog::update_service).delete(catalog::delete_service),
        )
        .route("/categories", get(catalog::list_categories).post(catalog::create_category))
        .route(
            "/categories/:id",
            put(catalog::update_category).delete(catalog::delete_category),
        )
        .route("/categories/:id/services", get(catalog::services_of_category));

    let proposal_routes = Router::new()
        .route("/proposals", get(proposals::list).post(proposals::create))
        .route("/proposals/recent", get(proposals::recent))
        .route("/proposals/provider/:id", get(proposals::by_provider))
        .route("/proposals/service/:id", get(proposals::by_service))
        .route("/proposals/category/:id", get(proposals::by_category))
        .route("/proposals/:id", delete(proposals::delete));

    Router::new()
        .route("/health", get(health))
        .merge(reservation_routes)
        .merge(auth_routes)
        .merge(catalog_routes)
        .merge(proposal_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", crate::openapi::ApiDoc::openapi()))
        .with_state(state)
        .layer(CorsLayer::very_permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
