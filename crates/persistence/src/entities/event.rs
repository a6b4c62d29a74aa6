//! Event entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::event::{Event, EventResponse};
use domain::models::user::UserSummary;

/// Database row mapping for the events table.
#[derive(Debug, Clone, FromRow)]
pub struct EventEntity {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub time: String,
    pub location: String,
    pub category: String,
    pub max_registrations: i32,
    pub organizer_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EventEntity> for Event {
    fn from(entity: EventEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            description: entity.description,
            date: entity.date,
            time: entity.time,
            location: entity.location,
            category: entity.category,
            max_registrations: entity.max_registrations,
            organizer_id: entity.organizer_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Event row joined with its organizer's identity and the registration count
/// observed at read time.
#[derive(Debug, Clone, FromRow)]
pub struct EventWithStatsEntity {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub time: String,
    pub location: String,
    pub category: String,
    pub max_registrations: i32,
    pub organizer_id: Uuid,
    pub organizer_name: String,
    pub organizer_email: String,
    pub registration_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EventWithStatsEntity> for EventResponse {
    fn from(entity: EventWithStatsEntity) -> Self {
        let organizer = UserSummary {
            id: entity.organizer_id,
            name: entity.organizer_name.clone(),
            email: entity.organizer_email.clone(),
        };
        let event = Event {
            id: entity.id,
            title: entity.title,
            description: entity.description,
            date: entity.date,
            time: entity.time,
            location: entity.location,
            category: entity.category,
            max_registrations: entity.max_registrations,
            organizer_id: entity.organizer_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        };
        EventResponse::enrich(event, organizer, entity.registration_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats_entity(max_registrations: i32, registration_count: i64) -> EventWithStatsEntity {
        EventWithStatsEntity {
            id: Uuid::new_v4(),
            title: "Tech Meetup".to_string(),
            description: "Monthly tech meetup".to_string(),
            date: Utc::now(),
            time: "18:30".to_string(),
            location: "Community Hall".to_string(),
            category: "Technology".to_string(),
            max_registrations,
            organizer_id: Uuid::new_v4(),
            organizer_name: "Olga".to_string(),
            organizer_email: "olga@example.com".to_string(),
            registration_count,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_stats_entity_converts_to_enriched_response() {
        let entity = stats_entity(10, 4);
        let response: EventResponse = entity.clone().into();

        assert_eq!(response.id, entity.id);
        assert_eq!(response.registration_count, 4);
        assert!(!response.is_full);
        assert_eq!(response.organizer.email, "olga@example.com");
    }

    #[test]
    fn test_stats_entity_reports_full_at_cap() {
        let response: EventResponse = stats_entity(4, 4).into();
        assert!(response.is_full);
    }
}
