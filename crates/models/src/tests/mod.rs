/// CRUD operations tests for all models (require a live Postgres)
pub mod crud_tests;
