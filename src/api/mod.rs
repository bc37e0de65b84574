//! REST API for the campus event registration service
//!
//! Provides endpoints for:
//! - Accounts and tokens
//! - Event catalog CRUD
//! - Registration lifecycle
//! - Health checks and OpenAPI docs

pub mod auth;
pub mod docs;
pub mod error;
pub mod events;
pub mod health;
pub mod registrations;

pub use auth::auth_routes;
pub use docs::docs_routes;
pub use events::events_routes;
pub use health::health_routes;
pub use registrations::registrations_routes;

use axum::Router;

/// Create the API router with all endpoints
pub fn api_router() -> Router {
    Router::new()
        .merge(auth_routes())
        .merge(events_routes())
        .merge(registrations_routes())
}
