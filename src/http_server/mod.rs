//! HTTP server
//!
//! Axum-based HTTP surface over the EAV core: attribute catalog management,
//! project CRUD with attribute synchronization, and the filtered listing.

mod attribute_routes;
mod config;
mod errors;
mod project_routes;
mod server;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult, ErrorResponse};
pub use server::{AppState, HttpServer};
