//! HTTP layer: axum server, bearer-token auth, DTOs, and handlers.

pub mod auth;
pub mod handlers;
pub mod server;
pub mod types;
