pub mod errors;
pub mod db;
pub mod user;
pub mod service;
pub mod category;
pub mod category_service;
pub mod service_proposal;
pub mod reservation;

#[cfg(test)]
mod tests;
