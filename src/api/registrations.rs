//! Registration endpoints
//!
//! POST /api/registrations                - Register the caller for an event
//! GET  /api/events/:id/registrations     - List an event's registrations (owner/admin)
//! PUT  /api/registrations/:id/status     - Approve or reject a registration (owner/admin)

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use campus_core::{Error, Registration, RegistrationDetail, RegistrationLedger, RegistrationStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::error::ApiError;
use crate::middleware::auth::CurrentUser;

/// Registration view for API responses
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationView {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    pub registered_at: DateTime<Utc>,
}

impl From<&Registration> for RegistrationView {
    fn from(registration: &Registration) -> Self {
        Self {
            id: registration.id,
            event_id: registration.event_id,
            user_id: registration.user_id,
            status: registration.status.to_string(),
            registered_at: registration.registered_at,
        }
    }
}

/// Registration plus registrant identity, for organizer review
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationDetailView {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    pub registered_at: DateTime<Utc>,
    pub user: super::events::OrganizerView,
}

impl From<&RegistrationDetail> for RegistrationDetailView {
    fn from(detail: &RegistrationDetail) -> Self {
        Self {
            id: detail.registration.id,
            event_id: detail.registration.event_id,
            user_id: detail.registration.user_id,
            status: detail.registration.status.to_string(),
            registered_at: detail.registration.registered_at,
            user: super::events::OrganizerView {
                id: detail.user.id,
                name: detail.user.name.clone(),
                email: detail.user.email.clone(),
            },
        }
    }
}

/// Request to register for an event
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRegistrationRequest {
    pub event_id: Uuid,
}

/// Request to approve or reject a registration
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    /// "pending", "approved" or "rejected"
    pub status: String,
}

/// Create the registration routes
pub fn registrations_routes() -> Router {
    Router::new()
        .route("/api/registrations", post(create_registration))
        .route(
            "/api/events/:id/registrations",
            get(list_event_registrations),
        )
        .route(
            "/api/registrations/:id/status",
            put(update_registration_status),
        )
}

/// Register the caller for an event
#[utoipa::path(
    post,
    path = "/api/registrations",
    tag = "registrations",
    request_body = CreateRegistrationRequest,
    responses(
        (status = 201, description = "Registration created (pending)", body = RegistrationView),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Event not found"),
        (status = 409, description = "Caller is already registered")
    ),
    security(("bearer_token" = []))
)]
pub async fn create_registration(
    CurrentUser(caller): CurrentUser,
    Extension(ledger): Extension<RegistrationLedger>,
    Json(request): Json<CreateRegistrationRequest>,
) -> Result<(StatusCode, Json<RegistrationView>), ApiError> {
    let registration = ledger.register(request.event_id, &caller).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegistrationView::from(&registration)),
    ))
}

/// List an event's registrations with registrant identities (owner or admin)
#[utoipa::path(
    get,
    path = "/api/events/{id}/registrations",
    tag = "registrations",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Registrations for the event", body = Vec<RegistrationDetailView>),
        (status = 403, description = "Caller does not own the event"),
        (status = 404, description = "Event not found")
    ),
    security(("bearer_token" = []))
)]
pub async fn list_event_registrations(
    CurrentUser(caller): CurrentUser,
    Extension(ledger): Extension<RegistrationLedger>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<RegistrationDetailView>>, ApiError> {
    let details = ledger.list(id, &caller).await?;
    Ok(Json(details.iter().map(RegistrationDetailView::from).collect()))
}

/// Approve or reject a registration (owner or admin of the parent event)
#[utoipa::path(
    put,
    path = "/api/registrations/{id}/status",
    tag = "registrations",
    params(("id" = Uuid, Path, description = "Registration ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Updated registration", body = RegistrationView),
        (status = 400, description = "Unknown status"),
        (status = 403, description = "Caller does not own the parent event"),
        (status = 404, description = "Registration not found")
    ),
    security(("bearer_token" = []))
)]
pub async fn update_registration_status(
    CurrentUser(caller): CurrentUser,
    Extension(ledger): Extension<RegistrationLedger>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<RegistrationView>, ApiError> {
    let status = RegistrationStatus::parse(&request.status)
        .map_err(|_| Error::Validation(format!("unknown status: {}", request.status)))?;

    let registration = ledger.set_status(id, status, &caller).await?;
    Ok(Json(RegistrationView::from(&registration)))
}
