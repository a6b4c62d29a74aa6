//! Registration repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{
    RegistrationEntity, RegistrationWithEventEntity, RegistrationWithUserEntity,
};
use crate::metrics::QueryTimer;

/// Repository for registration-related database operations.
#[derive(Clone)]
pub struct RegistrationRepository {
    pool: PgPool,
}

impl RegistrationRepository {
    /// Creates a new RegistrationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a registration linking a user to an event.
    ///
    /// The unique (user_id, event_id) index turns a concurrent duplicate into
    /// a database error rather than a second row.
    pub async fn create(
        &self,
        user_id: Uuid,
        event_id: Uuid,
    ) -> Result<RegistrationEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_registration");
        let result = sqlx::query_as::<_, RegistrationEntity>(
            r#"
            INSERT INTO registrations (user_id, event_id)
            VALUES ($1, $2)
            RETURNING id, user_id, event_id, registered_at
            "#,
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find the registration for a (user, event) pair.
    pub async fn find_by_user_and_event(
        &self,
        user_id: Uuid,
        event_id: Uuid,
    ) -> Result<Option<RegistrationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_registration_by_user_and_event");
        let result = sqlx::query_as::<_, RegistrationEntity>(
            r#"
            SELECT id, user_id, event_id, registered_at
            FROM registrations
            WHERE user_id = $1 AND event_id = $2
            "#,
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count registrations for an event.
    pub async fn count_by_event_id(&self, event_id: Uuid) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_registrations_by_event");
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM registrations WHERE event_id = $1
            "#,
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;
        timer.record();
        Ok(count.0)
    }

    /// Delete the registration for a (user, event) pair.
    /// Returns the number of rows deleted (0 or 1).
    pub async fn delete_by_user_and_event(
        &self,
        user_id: Uuid,
        event_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_registration");
        let result = sqlx::query(
            r#"
            DELETE FROM registrations WHERE user_id = $1 AND event_id = $2
            "#,
        )
        .bind(user_id)
        .bind(event_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Delete all registrations for an event.
    /// Returns the number of rows deleted.
    pub async fn delete_all_by_event_id(&self, event_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_all_registrations_by_event");
        let result = sqlx::query(
            r#"
            DELETE FROM registrations WHERE event_id = $1
            "#,
        )
        .bind(event_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// List a user's registrations with each event fully attached,
    /// newest registration first.
    pub async fn list_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<RegistrationWithEventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_registrations_by_user");
        let result = sqlx::query_as::<_, RegistrationWithEventEntity>(
            r#"
            SELECT r.id, r.registered_at,
                   e.id AS event_id, e.title, e.description, e.date, e.time,
                   e.location, e.category, e.max_registrations, e.organizer_id,
                   u.name AS organizer_name, u.email AS organizer_email,
                   (SELECT COUNT(*) FROM registrations c WHERE c.event_id = e.id) AS registration_count,
                   e.created_at AS event_created_at, e.updated_at AS event_updated_at
            FROM registrations r
            JOIN events e ON e.id = r.event_id
            JOIN users u ON u.id = e.organizer_id
            WHERE r.user_id = $1
            ORDER BY r.registered_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List an event's registrations with each user's identity attached,
    /// newest registration first.
    pub async fn list_by_event(
        &self,
        event_id: Uuid,
    ) -> Result<Vec<RegistrationWithUserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_registrations_by_event");
        let result = sqlx::query_as::<_, RegistrationWithUserEntity>(
            r#"
            SELECT r.id, r.user_id, u.name AS user_name, u.email AS user_email,
                   r.registered_at
            FROM registrations r
            JOIN users u ON u.id = r.user_id
            WHERE r.event_id = $1
            ORDER BY r.registered_at DESC
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
