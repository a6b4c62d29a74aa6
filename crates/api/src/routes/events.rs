//! Event endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::response::{DataResponse, ListResponse, MessageResponse};
use domain::models::event::{CreateEventRequest, EventResponse, ListEventsQuery, UpdateEventRequest};

/// List events, optionally filtered by category and search term.
///
/// GET /api/events?category=...&search=...
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<ListEventsQuery>,
) -> Result<Json<ListResponse<EventResponse>>, ApiError> {
    let events = state
        .events
        .list(query.category(), query.search())
        .await?;

    Ok(Json(ListResponse::new(
        events.into_iter().map(Into::into).collect(),
    )))
}

/// Get a single event with its registration count.
///
/// GET /api/events/:id
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DataResponse<EventResponse>>, ApiError> {
    let event = state
        .events
        .find_with_stats(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".into()))?;

    Ok(Json(DataResponse::new(event.into())))
}

/// Create an event owned by the authenticated organizer.
///
/// POST /api/events
pub async fn create_event(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<DataResponse<EventResponse>>), ApiError> {
    payload.validate()?;

    let entity = state
        .events
        .create(
            &payload.title,
            &payload.description,
            payload.date,
            &payload.time,
            &payload.location,
            &payload.category,
            payload.max_registrations,
            auth.user_id,
        )
        .await?;

    tracing::info!(event_id = %entity.id, organizer_id = %auth.user_id, "Event created");

    let event = state
        .events
        .find_with_stats(entity.id)
        .await?
        .ok_or_else(|| ApiError::Internal("Created event not found".into()))?;

    Ok((StatusCode::CREATED, Json(DataResponse::new(event.into()))))
}

/// Update an event. Only the owning organizer may update it.
///
/// PUT /api/events/:id
pub async fn update_event(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<Json<DataResponse<EventResponse>>, ApiError> {
    let existing = state
        .events
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".into()))?;

    if existing.organizer_id != auth.user_id {
        return Err(ApiError::Forbidden(
            "Not authorized to update this event".into(),
        ));
    }

    // Existence and ownership are answered before the payload is judged, so a
    // non-owner learns 403 and an unknown id 404 regardless of body validity.
    payload.validate()?;

    state
        .events
        .update(
            id,
            payload.title.as_deref(),
            payload.description.as_deref(),
            payload.date,
            payload.time.as_deref(),
            payload.location.as_deref(),
            payload.category.as_deref(),
            payload.max_registrations,
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".into()))?;

    tracing::info!(event_id = %id, organizer_id = %auth.user_id, "Event updated");

    let event = state
        .events
        .find_with_stats(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".into()))?;

    Ok(Json(DataResponse::new(event.into())))
}

/// Delete an event and its registrations. Only the owning organizer may
/// delete it.
///
/// DELETE /api/events/:id
pub async fn delete_event(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let existing = state
        .events
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".into()))?;

    if existing.organizer_id != auth.user_id {
        return Err(ApiError::Forbidden(
            "Not authorized to delete this event".into(),
        ));
    }

    // Registrations go first; if that fails the event row survives and the
    // delete can be retried.
    let removed = state.registrations.delete_all_by_event_id(id).await?;
    state.events.delete(id).await?;

    tracing::info!(
        event_id = %id,
        organizer_id = %auth.user_id,
        registrations_removed = removed,
        "Event deleted"
    );

    Ok(Json(MessageResponse::new("Event deleted successfully")))
}

/// List the authenticated organizer's own events.
///
/// GET /api/events/organizer/my-events
pub async fn my_events(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ListResponse<EventResponse>>, ApiError> {
    let events = state.events.list_by_organizer(auth.user_id).await?;

    Ok(Json(ListResponse::new(
        events.into_iter().map(Into::into).collect(),
    )))
}
