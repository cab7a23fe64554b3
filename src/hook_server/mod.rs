//! Internal listener the host authentication subsystem reports logins to

pub mod handlers;
pub mod routes;

pub use routes::create_hook_router;
