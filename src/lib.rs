pub mod api;
pub mod auth;
pub mod config;
pub mod hook;
pub mod hook_server;
pub mod members;
pub mod models;
pub mod policy;
pub mod report;
pub mod storage;
pub mod summary;
