//! Registration domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::event::{EventResponse, EventSummary};
use crate::models::user::UserSummary;

/// Links a user to an event.
///
/// At most one registration exists per (user, event) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub registered_at: DateTime<Utc>,
}

/// A freshly created registration with both sides of the link attached.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    pub id: Uuid,
    pub user: UserSummary,
    pub event: EventSummary,
    pub registered_at: DateTime<Utc>,
}

/// A registration as listed for the registered user, with its event fully
/// attached and enriched.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MyRegistrationResponse {
    pub id: Uuid,
    pub event: EventResponse,
    pub registered_at: DateTime<Utc>,
}

/// A registration as listed for the event's organizer, with the registered
/// user's identity attached.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRegistrationResponse {
    pub id: Uuid,
    pub user: UserSummary,
    pub registered_at: DateTime<Utc>,
}

/// Push message broadcast to everyone watching an event's registration count.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationUpdate {
    pub event_id: Uuid,
    pub registration_count: i64,
    pub is_full: bool,
}
