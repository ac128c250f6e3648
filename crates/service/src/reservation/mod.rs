//! Reservation engine: three-layer module (domain, repository, service).
//!
//! Owns the Reservation entity end to end: per-provider daily availability,
//! booking intake with conflict detection, the pending → confirmed/rejected
//! state machine, read views and cancellation.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::ReservationService;
