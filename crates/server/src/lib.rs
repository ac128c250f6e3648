pub mod routes;
pub mod startup;
pub mod errors;
pub mod state;
pub mod extract;
pub mod openapi;

pub use startup::run;
