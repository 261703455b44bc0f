//! # HTTP Server Module
//!
//! Axum host that exposes the user dispatcher over HTTP.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/users` - Create (POST); other verbs are answered by the dispatcher
//! - `/users/:id` - Read (GET), replace (PUT), delete (DELETE)

pub mod config;
pub mod health_routes;
pub mod server;
pub mod user_routes;

pub use config::{HttpConfigError, HttpServerConfig};
pub use server::{build_router, HttpServer};
pub use user_routes::UserState;
