//! Event endpoints
//!
//! GET    /api/events     - List events
//! POST   /api/events     - Publish an event (organizer/admin)
//! GET    /api/events/:id - Event details plus the caller's registration
//! PUT    /api/events/:id - Update an event (owner/admin)
//! DELETE /api/events/:id - Delete an event and its registrations (owner/admin)

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use campus_core::{EventCatalog, EventPatch, EventRecord, NewEvent};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::error::ApiError;
use super::registrations::RegistrationView;
use crate::middleware::auth::CurrentUser;

/// Organizer identity embedded in event views
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrganizerView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Event view for API responses
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub max_attendees: i64,
    pub organizer: OrganizerView,
    pub created_at: DateTime<Utc>,
    pub attendee_count: i64,
}

impl From<&EventRecord> for EventView {
    fn from(record: &EventRecord) -> Self {
        Self {
            id: record.id,
            title: record.title.clone(),
            description: record.description.clone(),
            date: record.date,
            location: record.location.clone(),
            max_attendees: record.max_attendees,
            organizer: OrganizerView {
                id: record.organizer.id,
                name: record.organizer.name.clone(),
                email: record.organizer.email.clone(),
            },
            created_at: record.created_at,
            attendee_count: record.attendee_count,
        }
    }
}

/// Event details plus the caller's own registration, when one exists
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventDetailView {
    pub event: EventView,
    pub user_registration: Option<RegistrationView>,
}

/// Request to publish an event
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub max_attendees: Option<i64>,
}

/// Partial event update; absent fields keep their current value
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub max_attendees: Option<i64>,
}

/// Create the event routes
pub fn events_routes() -> Router {
    Router::new()
        .route("/api/events", get(list_events).post(create_event))
        .route(
            "/api/events/:id",
            get(get_event).put(update_event).delete(delete_event),
        )
}

/// List all events
#[utoipa::path(
    get,
    path = "/api/events",
    tag = "events",
    responses(
        (status = 200, description = "All events in creation order", body = Vec<EventView>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_token" = []))
)]
pub async fn list_events(
    CurrentUser(_caller): CurrentUser,
    Extension(catalog): Extension<EventCatalog>,
) -> Result<Json<Vec<EventView>>, ApiError> {
    let records = catalog.list().await?;
    Ok(Json(records.iter().map(EventView::from).collect()))
}

/// Event details; includes the caller's own registration when one exists
#[utoipa::path(
    get,
    path = "/api/events/{id}",
    tag = "events",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event details", body = EventDetailView),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Event not found")
    ),
    security(("bearer_token" = []))
)]
pub async fn get_event(
    CurrentUser(caller): CurrentUser,
    Extension(catalog): Extension<EventCatalog>,
    Path(id): Path<Uuid>,
) -> Result<Json<EventDetailView>, ApiError> {
    let (record, own) = catalog.get(id, Some(&caller)).await?;
    Ok(Json(EventDetailView {
        event: EventView::from(&record),
        user_registration: own.as_ref().map(RegistrationView::from),
    }))
}

/// Publish an event (organizer or admin)
#[utoipa::path(
    post,
    path = "/api/events",
    tag = "events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event published", body = EventView),
        (status = 400, description = "Invalid input, e.g. a past date"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not an organizer or admin")
    ),
    security(("bearer_token" = []))
)]
pub async fn create_event(
    CurrentUser(caller): CurrentUser,
    Extension(catalog): Extension<EventCatalog>,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventView>), ApiError> {
    let record = catalog
        .create(
            NewEvent {
                title: request.title,
                description: request.description,
                date: request.date,
                location: request.location,
                max_attendees: request.max_attendees,
            },
            &caller,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(EventView::from(&record))))
}

/// Update an event (owner or admin)
#[utoipa::path(
    put,
    path = "/api/events/{id}",
    tag = "events",
    params(("id" = Uuid, Path, description = "Event ID")),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Updated event", body = EventView),
        (status = 400, description = "Invalid input, e.g. a past date"),
        (status = 403, description = "Caller does not own the event"),
        (status = 404, description = "Event not found")
    ),
    security(("bearer_token" = []))
)]
pub async fn update_event(
    CurrentUser(caller): CurrentUser,
    Extension(catalog): Extension<EventCatalog>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateEventRequest>,
) -> Result<Json<EventView>, ApiError> {
    let record = catalog
        .update(
            id,
            EventPatch {
                title: request.title,
                description: request.description,
                date: request.date,
                location: request.location,
                max_attendees: request.max_attendees,
            },
            &caller,
        )
        .await?;
    Ok(Json(EventView::from(&record)))
}

/// Delete an event and every registration under it (owner or admin)
#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    tag = "events",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 403, description = "Caller does not own the event"),
        (status = 404, description = "Event not found")
    ),
    security(("bearer_token" = []))
)]
pub async fn delete_event(
    CurrentUser(caller): CurrentUser,
    Extension(catalog): Extension<EventCatalog>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    catalog.delete(id, &caller).await?;
    Ok(StatusCode::NO_CONTENT)
}
