use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(ToSchema)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub city: String,
    pub phone: String,
    pub address: Option<String>,
    pub photo: Option<String>,
}

#[derive(ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema)]
pub struct CreateReservationRequest {
    pub date: String,
    pub time: String,
    pub proposal_id: Uuid,
    pub provider_id: Uuid,
    pub client_id: Uuid,
}

#[derive(ToSchema)]
pub struct UpdateStatusRequest {
    /// `confirmed` or `rejected`.
    pub status: String,
}

#[derive(ToSchema)]
pub struct AvailabilitySlotDoc {
    pub time: String,
    pub is_available: bool,
}

#[derive(ToSchema)]
pub struct ProposalRequest {
    pub title: String,
    pub service_id: Uuid,
    pub price: f64,
    pub description: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::me,
        crate::routes::users::providers,
        crate::routes::reservations::availability,
        crate::routes::reservations::create,
        crate::routes::reservations::update_status,
        crate::routes::reservations::delete,
        crate::routes::reservations::list_all,
        crate::routes::reservations::list_for_client,
        crate::routes::reservations::list_for_provider,
        crate::routes::catalog::list_services,
        crate::routes::catalog::create_service,
        crate::routes::catalog::update_service,
        crate::routes::catalog::delete_service,
        crate::routes::catalog::list_categories,
        crate::routes::catalog::create_category,
        crate::routes::catalog::update_category,
        crate::routes::catalog::delete_category,
        crate::routes::catalog::services_of_category,
        crate::routes::proposals::list,
        crate::routes::proposals::recent,
        crate::routes::proposals::by_provider,
        crate::routes::proposals::by_service,
        crate::routes::proposals::by_category,
        crate::routes::proposals::create,
        crate::routes::proposals::delete,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            CreateReservationRequest,
            UpdateStatusRequest,
            AvailabilitySlotDoc,
            ProposalRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "users"),
        (name = "reservations"),
        (name = "catalog"),
        (name = "proposals")
    )
)]
pub struct ApiDoc;
