//! Event domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::user::UserSummary;

/// Represents an event in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    /// Free-text start time, e.g. "18:30".
    pub time: String,
    pub location: String,
    pub category: String,
    pub max_registrations: i32,
    pub organizer_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating an event.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[validate(
        length(min = 1, max = 200, message = "Title must be 1-200 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub title: String,

    #[validate(
        length(min = 1, max = 5000, message = "Description must be 1-5000 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub description: String,

    pub date: DateTime<Utc>,

    #[validate(custom(function = "shared::validation::validate_event_time"))]
    pub time: String,

    #[validate(
        length(min = 1, max = 200, message = "Location must be 1-200 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub location: String,

    #[validate(
        length(min = 1, max = 100, message = "Category must be 1-100 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub category: String,

    #[validate(range(min = 1, message = "Maximum registrations must be at least 1"))]
    pub max_registrations: i32,
}

/// Request payload for updating an event (partial update).
///
/// The organizer is immutable after creation and is deliberately absent here.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[validate(
        length(min = 1, max = 200, message = "Title must be 1-200 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub title: Option<String>,

    #[validate(
        length(min = 1, max = 5000, message = "Description must be 1-5000 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub description: Option<String>,

    pub date: Option<DateTime<Utc>>,

    #[validate(custom(function = "shared::validation::validate_event_time"))]
    pub time: Option<String>,

    #[validate(
        length(min = 1, max = 200, message = "Location must be 1-200 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub location: Option<String>,

    #[validate(
        length(min = 1, max = 100, message = "Category must be 1-100 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub category: Option<String>,

    #[validate(range(min = 1, message = "Maximum registrations must be at least 1"))]
    pub max_registrations: Option<i32>,
}

/// Query parameters for listing events.
///
/// An empty or blank parameter (`?category=&search=`) means no filter, not a
/// filter matching the empty string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListEventsQuery {
    /// Exact-match category filter.
    pub category: Option<String>,
    /// Case-insensitive substring match against title, description, or location.
    pub search: Option<String>,
}

impl ListEventsQuery {
    /// Effective category filter, with blank values normalized away.
    pub fn category(&self) -> Option<&str> {
        normalize_param(&self.category)
    }

    /// Effective search term, with blank values normalized away.
    pub fn search(&self) -> Option<&str> {
        normalize_param(&self.search)
    }
}

fn normalize_param(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// An event as returned to clients: enriched with the current registration
/// count, the derived full flag, and the organizer's identity.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub time: String,
    pub location: String,
    pub category: String,
    pub max_registrations: i32,
    pub organizer: UserSummary,
    pub registration_count: i64,
    pub is_full: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EventResponse {
    /// Builds the enriched view from an event, its organizer, and the
    /// registration count observed at read time.
    pub fn enrich(event: Event, organizer: UserSummary, registration_count: i64) -> Self {
        let is_full = registration_count >= i64::from(event.max_registrations);
        Self {
            id: event.id,
            title: event.title,
            description: event.description,
            date: event.date,
            time: event.time,
            location: event.location,
            category: event.category,
            max_registrations: event.max_registrations,
            organizer,
            registration_count,
            is_full,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

/// Abbreviated event identity attached to a freshly created registration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    pub id: Uuid,
    pub title: String,
    pub date: DateTime<Utc>,
    pub location: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn valid_create_request() -> CreateEventRequest {
        serde_json::from_value(serde_json::json!({
            "title": "Tech Meetup",
            "description": "Monthly tech meetup",
            "date": "2026-10-01T00:00:00Z",
            "time": "18:30",
            "location": "Community Hall",
            "category": "Technology",
            "maxRegistrations": 50
        }))
        .unwrap()
    }

    #[test]
    fn test_create_request_deserialization() {
        let request = valid_create_request();
        assert_eq!(request.title, "Tech Meetup");
        assert_eq!(request.time, "18:30");
        assert_eq!(request.max_registrations, 50);
    }

    #[test]
    fn test_create_request_valid() {
        assert!(valid_create_request().validate().is_ok());
    }

    #[test]
    fn test_create_request_rejects_zero_capacity() {
        let mut request = valid_create_request();
        request.max_registrations = 0;
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_request_rejects_blank_title() {
        let mut request = valid_create_request();
        request.title = "   ".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_request_rejects_bad_time() {
        let mut request = valid_create_request();
        request.time = "6pm".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_request_missing_field_fails_deserialization() {
        let result: Result<CreateEventRequest, _> = serde_json::from_value(serde_json::json!({
            "title": "Tech Meetup"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_update_request_allows_partial_payload() {
        let request: UpdateEventRequest =
            serde_json::from_value(serde_json::json!({ "title": "Renamed" })).unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.title.as_deref(), Some("Renamed"));
        assert!(request.max_registrations.is_none());
    }

    #[test]
    fn test_update_request_validates_provided_fields() {
        let request: UpdateEventRequest =
            serde_json::from_value(serde_json::json!({ "maxRegistrations": 0 })).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_list_query_treats_empty_params_as_no_filter() {
        // The `?category=&search=` form deserializes to Some("").
        let query: ListEventsQuery =
            query_from(serde_json::json!({ "category": "", "search": "" }));
        assert_eq!(query.category(), None);
        assert_eq!(query.search(), None);
    }

    #[test]
    fn test_list_query_treats_blank_params_as_no_filter() {
        let query: ListEventsQuery =
            query_from(serde_json::json!({ "category": "  ", "search": "\t" }));
        assert_eq!(query.category(), None);
        assert_eq!(query.search(), None);
    }

    #[test]
    fn test_list_query_passes_real_params_through_trimmed() {
        let query: ListEventsQuery =
            query_from(serde_json::json!({ "category": "Technology", "search": " tech " }));
        assert_eq!(query.category(), Some("Technology"));
        assert_eq!(query.search(), Some("tech"));
    }

    #[test]
    fn test_list_query_defaults_to_no_filters() {
        let query = ListEventsQuery::default();
        assert_eq!(query.category(), None);
        assert_eq!(query.search(), None);
    }

    fn query_from(value: serde_json::Value) -> ListEventsQuery {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_enrich_computes_is_full_at_boundary() {
        let event = Event {
            id: Uuid::new_v4(),
            title: "Tech Meetup".to_string(),
            description: "Monthly".to_string(),
            date: Utc::now(),
            time: "18:30".to_string(),
            location: "Hall".to_string(),
            category: "Technology".to_string(),
            max_registrations: 2,
            organizer_id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let organizer = UserSummary {
            id: event.organizer_id,
            name: "Olga".to_string(),
            email: "olga@example.com".to_string(),
        };

        let open = EventResponse::enrich(event.clone(), organizer.clone(), 1);
        assert!(!open.is_full);

        let full = EventResponse::enrich(event.clone(), organizer.clone(), 2);
        assert!(full.is_full);

        // Count may transiently exceed the cap under the documented race.
        let over = EventResponse::enrich(event, organizer, 3);
        assert!(over.is_full);
    }

    #[test]
    fn test_event_response_serializes_camel_case() {
        let event = Event {
            id: Uuid::new_v4(),
            title: "Tech Meetup".to_string(),
            description: "Monthly".to_string(),
            date: Utc::now(),
            time: "18:30".to_string(),
            location: "Hall".to_string(),
            category: "Technology".to_string(),
            max_registrations: 10,
            organizer_id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let organizer = UserSummary {
            id: event.organizer_id,
            name: "Olga".to_string(),
            email: "olga@example.com".to_string(),
        };

        let json = serde_json::to_value(EventResponse::enrich(event, organizer, 0)).unwrap();
        assert!(json.get("registrationCount").is_some());
        assert!(json.get("isFull").is_some());
        assert!(json.get("maxRegistrations").is_some());
        assert!(json.get("max_registrations").is_none());
    }
}
