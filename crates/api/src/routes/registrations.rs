//! Registration endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::response::{DataResponse, ListResponse, MessageResponse};
use domain::models::event::EventSummary;
use domain::models::registration::{
    EventRegistrationResponse, MyRegistrationResponse, RegistrationResponse,
};
use domain::models::user::UserSummary;

/// Register the authenticated user for an event.
///
/// POST /api/registrations/:eventId
pub async fn register(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(event_id): Path<Uuid>,
) -> Result<(StatusCode, Json<DataResponse<RegistrationResponse>>), ApiError> {
    let event = state
        .events
        .find_by_id(event_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".into()))?;

    if state
        .registrations
        .find_by_user_and_event(auth.user_id, event_id)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(
            "You are already registered for this event".into(),
        ));
    }

    // Capacity check and insert are separate statements, so two concurrent
    // registrations for the last seat can both pass the check and the count
    // can land one over the cap. The event then reports full and no further
    // registrations are accepted.
    let count = state.registrations.count_by_event_id(event_id).await?;
    if count >= i64::from(event.max_registrations) {
        return Err(ApiError::Conflict("Event is full".into()));
    }

    let registration = state
        .registrations
        .create(auth.user_id, event_id)
        .await
        .map_err(|e| match &e {
            // The unique (user_id, event_id) index catches the concurrent
            // duplicate the earlier check missed.
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                ApiError::Conflict("You are already registered for this event".into())
            }
            _ => e.into(),
        })?;

    tracing::info!(
        registration_id = %registration.id,
        user_id = %auth.user_id,
        event_id = %event_id,
        "User registered for event"
    );

    state.notifier.registration_changed(event_id).await;

    let user = state
        .users
        .find_by_id(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::Internal("Registered user not found".into()))?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(RegistrationResponse {
            id: registration.id,
            user: UserSummary {
                id: user.id,
                name: user.name,
                email: user.email,
            },
            event: EventSummary {
                id: event.id,
                title: event.title,
                date: event.date,
                location: event.location,
            },
            registered_at: registration.registered_at,
        })),
    ))
}

/// Cancel the authenticated user's registration for an event.
///
/// DELETE /api/registrations/:eventId
pub async fn cancel(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let deleted = state
        .registrations
        .delete_by_user_and_event(auth.user_id, event_id)
        .await?;

    if deleted == 0 {
        return Err(ApiError::NotFound("Registration not found".into()));
    }

    tracing::info!(
        user_id = %auth.user_id,
        event_id = %event_id,
        "Registration cancelled"
    );

    state.notifier.registration_changed(event_id).await;

    Ok(Json(MessageResponse::new(
        "Registration cancelled successfully",
    )))
}

/// List the authenticated user's registrations, newest first.
///
/// GET /api/registrations/my-registrations
pub async fn my_registrations(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ListResponse<MyRegistrationResponse>>, ApiError> {
    let registrations = state.registrations.list_by_user(auth.user_id).await?;

    Ok(Json(ListResponse::new(
        registrations.into_iter().map(Into::into).collect(),
    )))
}

/// List an event's registrations for its organizer, newest first.
///
/// GET /api/registrations/event/:eventId
pub async fn event_registrations(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<ListResponse<EventRegistrationResponse>>, ApiError> {
    let event = state
        .events
        .find_by_id(event_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".into()))?;

    if event.organizer_id != auth.user_id {
        return Err(ApiError::Forbidden(
            "Not authorized to view registrations for this event".into(),
        ));
    }

    let registrations = state.registrations.list_by_event(event_id).await?;

    Ok(Json(ListResponse::new(
        registrations.into_iter().map(Into::into).collect(),
    )))
}
