//! API Documentation - Swagger UI
//!
//! Provides OpenAPI documentation at /docs

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::{
    auth::{AuthResponse, LoginRequest, RegisterRequest, UserView},
    events::{CreateEventRequest, EventDetailView, EventView, OrganizerView, UpdateEventRequest},
    health::HealthResponse,
    registrations::{
        CreateRegistrationRequest, RegistrationDetailView, RegistrationView, UpdateStatusRequest,
    },
};

/// Campus Events API documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Campus Events API",
        version = "1.0.0",
        description = "Campus event registration service REST API.

## Overview
- **Auth**: Register an account, log in, verify a token
- **Events**: Browse, publish, update and delete events
- **Registrations**: Sign up for events and review sign-ups

## Authentication
Protected endpoints take a bearer token from `/api/auth/login`:
```
Authorization: Bearer <token>
```
Live updates are served over WebSocket at `/ws/live?token=<token>`.
"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        crate::api::auth::register,
        crate::api::auth::login,
        crate::api::auth::verify,
        crate::api::events::list_events,
        crate::api::events::get_event,
        crate::api::events::create_event,
        crate::api::events::update_event,
        crate::api::events::delete_event,
        crate::api::registrations::create_registration,
        crate::api::registrations::list_event_registrations,
        crate::api::registrations::update_registration_status,
        crate::api::health::health,
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        UserView,
        AuthResponse,
        EventView,
        EventDetailView,
        OrganizerView,
        CreateEventRequest,
        UpdateEventRequest,
        RegistrationView,
        RegistrationDetailView,
        CreateRegistrationRequest,
        UpdateStatusRequest,
        HealthResponse,
    )),
    tags(
        (name = "auth", description = "Accounts and tokens"),
        (name = "events", description = "Event catalog"),
        (name = "registrations", description = "Registration lifecycle"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

/// Create the docs routes (Swagger UI + raw OpenAPI JSON)
pub fn docs_routes() -> Router {
    Router::new().merge(SwaggerUi::new("/docs").url("/api/openapi.json", ApiDoc::openapi()))
}
