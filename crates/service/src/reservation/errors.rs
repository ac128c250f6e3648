use thiserror::Error;

/// Business errors for the reservation engine
#[derive(Debug, Error)]
pub enum ReservationError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("{0}")]
    Conflict(String),
    #[error("repository error: {0}")]
    Repository(String),
}

impl ReservationError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ReservationError::Validation(_) => 2001,
            ReservationError::NotFound(_) => 2002,
            ReservationError::Forbidden(_) => 2003,
            ReservationError::Conflict(_) => 2004,
            ReservationError::Repository(_) => 2200,
        }
    }

    pub fn slot_taken() -> Self {
        Self::Conflict("time slot is already reserved for this service".into())
    }
}
