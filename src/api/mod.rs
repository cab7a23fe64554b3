//! Admin dashboard API

pub mod handlers;
pub mod report;
pub mod routes;

pub use routes::create_api_router;
