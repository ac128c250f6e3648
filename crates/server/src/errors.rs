use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use service::auth::errors::AuthError;
use service::errors::ServiceError;
use service::reservation::errors::ReservationError;

/// Error envelope of the HTTP boundary: a status code plus a structured
/// `{success, title, message}` body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub title: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, title: &'static str, message: impl Into<String>) -> Self {
        Self { status, title, message: message.into() }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, message = %self.message, "request failed");
        }
        let body = Json(serde_json::json!({
            "success": false,
            "title": self.title,
            "message": self.message,
        }));
        (self.status, body).into_response()
    }
}

impl From<ReservationError> for ApiError {
    fn from(e: ReservationError) -> Self {
        let message = e.to_string();
        match e {
            ReservationError::Validation(_) => {
                Self::new(StatusCode::BAD_REQUEST, "Validation Failed", message)
            }
            ReservationError::NotFound(_) => {
                Self::new(StatusCode::NOT_FOUND, "Not Found", message)
            }
            ReservationError::Forbidden(_) => {
                Self::new(StatusCode::FORBIDDEN, "Forbidden", message)
            }
            ReservationError::Conflict(_) => Self::new(StatusCode::CONFLICT, "Conflict", message),
            ReservationError::Repository(_) => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Server Error", message)
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        let message = e.to_string();
        match e {
            AuthError::Validation(_) => {
                Self::new(StatusCode::BAD_REQUEST, "Validation Failed", message)
            }
            AuthError::Conflict => Self::new(StatusCode::CONFLICT, "Conflict", message),
            AuthError::NotFound => Self::new(StatusCode::NOT_FOUND, "Not Found", message),
            AuthError::Unauthorized => Self::unauthorized(message),
            AuthError::HashError(_) | AuthError::TokenError(_) | AuthError::Repository(_) => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Server Error", message)
            }
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        let message = e.to_string();
        match e {
            ServiceError::Validation(_)
            | ServiceError::Model(models::errors::ModelError::Validation(_)) => {
                Self::new(StatusCode::BAD_REQUEST, "Validation Failed", message)
            }
            ServiceError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, "Not Found", message),
            ServiceError::Forbidden(_) => Self::new(StatusCode::FORBIDDEN, "Forbidden", message),
            ServiceError::Db(_) | ServiceError::Model(models::errors::ModelError::Db(_)) => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Server Error", message)
            }
        }
    }
}
