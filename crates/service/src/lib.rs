//! Service layer providing business operations on top of models.
//! - `reservation`: the booking engine (availability, intake, status
//!   transitions, read views, cancellation)
//! - `auth`: registration, login and bearer-token verification
//! - `catalog` / `proposals` / `users`: flat record management for
//!   services, categories, provider offerings and provider discovery

pub mod errors;
pub mod auth;
pub mod reservation;
pub mod catalog;
pub mod proposals;
pub mod users;
#[cfg(test)]
pub mod test_support;
