//! Event repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{EventEntity, EventWithStatsEntity};
use crate::metrics::QueryTimer;

/// Columns of the enriched event view: the event row, its organizer's
/// identity, and the registration count observed at read time. The count is a
/// read-side aggregation so it can never drift from the registrations table.
const STATS_SELECT: &str = r#"
    SELECT e.id, e.title, e.description, e.date, e.time, e.location, e.category,
           e.max_registrations, e.organizer_id,
           u.name AS organizer_name, u.email AS organizer_email,
           (SELECT COUNT(*) FROM registrations r WHERE r.event_id = e.id) AS registration_count,
           e.created_at, e.updated_at
    FROM events e
    JOIN users u ON u.id = e.organizer_id
"#;

/// Repository for event-related database operations.
#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    /// Creates a new EventRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new event.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        title: &str,
        description: &str,
        date: DateTime<Utc>,
        time: &str,
        location: &str,
        category: &str,
        max_registrations: i32,
        organizer_id: Uuid,
    ) -> Result<EventEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_event");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            INSERT INTO events (title, description, date, time, location, category,
                                max_registrations, organizer_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(date)
        .bind(time)
        .bind(location)
        .bind(category)
        .bind(max_registrations)
        .bind(organizer_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find an event by ID (bare row, no enrichment).
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_event_by_id");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            SELECT * FROM events WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find an event by ID, enriched with organizer identity and count.
    pub async fn find_with_stats(
        &self,
        id: Uuid,
    ) -> Result<Option<EventWithStatsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_event_with_stats");
        let query = format!("{} WHERE e.id = $1", STATS_SELECT);
        let result = sqlx::query_as::<_, EventWithStatsEntity>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// List events, optionally filtered by exact category and/or a
    /// case-insensitive substring search over title, description, or location.
    /// Sorted by date ascending.
    pub async fn list(
        &self,
        category: Option<&str>,
        search: Option<&str>,
    ) -> Result<Vec<EventWithStatsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_events");
        let query = format!(
            r#"{}
            WHERE ($1::TEXT IS NULL OR e.category = $1)
              AND ($2::TEXT IS NULL
                   OR e.title ILIKE '%' || $2 || '%'
                   OR e.description ILIKE '%' || $2 || '%'
                   OR e.location ILIKE '%' || $2 || '%')
            ORDER BY e.date ASC
            "#,
            STATS_SELECT
        );
        let result = sqlx::query_as::<_, EventWithStatsEntity>(&query)
            .bind(category)
            .bind(search)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// List all events owned by an organizer, sorted by date ascending.
    pub async fn list_by_organizer(
        &self,
        organizer_id: Uuid,
    ) -> Result<Vec<EventWithStatsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_events_by_organizer");
        let query = format!("{} WHERE e.organizer_id = $1 ORDER BY e.date ASC", STATS_SELECT);
        let result = sqlx::query_as::<_, EventWithStatsEntity>(&query)
            .bind(organizer_id)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Update an event (partial update).
    /// Only provided fields are updated; None values are preserved.
    /// The organizer is immutable and cannot be updated.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: Uuid,
        title: Option<&str>,
        description: Option<&str>,
        date: Option<DateTime<Utc>>,
        time: Option<&str>,
        location: Option<&str>,
        category: Option<&str>,
        max_registrations: Option<i32>,
    ) -> Result<Option<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_event");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            UPDATE events SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                date = COALESCE($4, date),
                time = COALESCE($5, time),
                location = COALESCE($6, location),
                category = COALESCE($7, category),
                max_registrations = COALESCE($8, max_registrations),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(description)
        .bind(date)
        .bind(time)
        .bind(location)
        .bind(category)
        .bind(max_registrations)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete an event.
    /// Returns the number of rows deleted (0 or 1).
    pub async fn delete(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_event");
        let result = sqlx::query(
            r#"
            DELETE FROM events WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
