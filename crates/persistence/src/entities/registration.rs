//! Registration entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::event::{Event, EventResponse};
use domain::models::registration::{
    EventRegistrationResponse, MyRegistrationResponse, Registration,
};
use domain::models::user::UserSummary;

/// Database row mapping for the registrations table.
#[derive(Debug, Clone, FromRow)]
pub struct RegistrationEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub registered_at: DateTime<Utc>,
}

impl From<RegistrationEntity> for Registration {
    fn from(entity: RegistrationEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            event_id: entity.event_id,
            registered_at: entity.registered_at,
        }
    }
}

/// Registration row joined with its event (plus organizer identity and the
/// registration count observed at read time).
#[derive(Debug, Clone, FromRow)]
pub struct RegistrationWithEventEntity {
    pub id: Uuid,
    pub registered_at: DateTime<Utc>,
    pub event_id: Uuid,
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
    pub event_created_at: DateTime<Utc>,
    pub event_updated_at: DateTime<Utc>,
}

impl From<RegistrationWithEventEntity> for MyRegistrationResponse {
    fn from(entity: RegistrationWithEventEntity) -> Self {
        let organizer = UserSummary {
            id: entity.organizer_id,
            name: entity.organizer_name.clone(),
            email: entity.organizer_email.clone(),
        };
        let event = Event {
            id: entity.event_id,
            title: entity.title,
            description: entity.description,
            date: entity.date,
            time: entity.time,
            location: entity.location,
            category: entity.category,
            max_registrations: entity.max_registrations,
            organizer_id: entity.organizer_id,
            created_at: entity.event_created_at,
            updated_at: entity.event_updated_at,
        };

        MyRegistrationResponse {
            id: entity.id,
            event: EventResponse::enrich(event, organizer, entity.registration_count),
            registered_at: entity.registered_at,
        }
    }
}

/// Registration row joined with the registered user's identity.
#[derive(Debug, Clone, FromRow)]
pub struct RegistrationWithUserEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_email: String,
    pub registered_at: DateTime<Utc>,
}

impl From<RegistrationWithUserEntity> for EventRegistrationResponse {
    fn from(entity: RegistrationWithUserEntity) -> Self {
        EventRegistrationResponse {
            id: entity.id,
            user: UserSummary {
                id: entity.user_id,
                name: entity.user_name,
                email: entity.user_email,
            },
            registered_at: entity.registered_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_with_user_converts() {
        let entity = RegistrationWithUserEntity {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            user_name: "Alice".to_string(),
            user_email: "alice@example.com".to_string(),
            registered_at: Utc::now(),
        };

        let response: EventRegistrationResponse = entity.clone().into();
        assert_eq!(response.id, entity.id);
        assert_eq!(response.user.name, "Alice");
    }

    #[test]
    fn test_registration_with_event_enriches_attached_event() {
        let entity = RegistrationWithEventEntity {
            id: Uuid::new_v4(),
            registered_at: Utc::now(),
            event_id: Uuid::new_v4(),
            title: "Tech Meetup".to_string(),
            description: "Monthly".to_string(),
            date: Utc::now(),
            time: "18:30".to_string(),
            location: "Hall".to_string(),
            category: "Technology".to_string(),
            max_registrations: 1,
            organizer_id: Uuid::new_v4(),
            organizer_name: "Olga".to_string(),
            organizer_email: "olga@example.com".to_string(),
            registration_count: 1,
            event_created_at: Utc::now(),
            event_updated_at: Utc::now(),
        };

        let response: MyRegistrationResponse = entity.clone().into();
        assert_eq!(response.event.id, entity.event_id);
        assert!(response.event.is_full);
    }
}
