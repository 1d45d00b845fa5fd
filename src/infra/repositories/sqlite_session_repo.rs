use crate::domain::{
    models::{
        booking::Booking,
        session::{AvailabilityFilter, AvailableSession, Session, SessionFilter, SessionStatus},
    },
    ports::SessionRepository,
};
use crate::error::{is_unique_violation, AppError};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{SqliteConnection, SqlitePool};

pub struct SqliteSessionRepo {
    pool: SqlitePool,
}

impl SqliteSessionRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Takes the database write lock by touching the session row. Must be the first statement of the
/// transaction, otherwise SQLite may refuse the lock upgrade instead of waiting on busy_timeout.
pub(crate) async fn lock_session(conn: &mut SqliteConnection, id: &str) -> Result<Option<Session>, AppError> {
    sqlx::query_as::<_, Session>("UPDATE sessions SET updated_at = updated_at WHERE id = ? RETURNING *")
        .bind(id)
        .fetch_optional(conn)
        .await
        .map_err(AppError::Database)
}

pub(crate) async fn count_live_bookings(conn: &mut SqliteConnection, session_id: &str) -> Result<i64, AppError> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM bookings WHERE session_id = ? AND status <> 'CANCELLED'")
        .bind(session_id)
        .fetch_one(conn)
        .await
        .map_err(AppError::Database)
}

fn slot_taken(e: sqlx::Error) -> AppError {
    if is_unique_violation(&e) {
        AppError::Conflict("A session already exists at this date and start time".into())
    } else {
        AppError::Database(e)
    }
}

#[async_trait]
impl SessionRepository for SqliteSessionRepo {
    async fn create(&self, session: &Session) -> Result<Session, AppError> {
        sqlx::query_as::<_, Session>(
            r#"INSERT INTO sessions (id, coach_id, template_id, date, start_time, end_time, location, session_type, status, max_capacity, notes, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
               RETURNING *"#
        )
            .bind(&session.id)
            .bind(&session.coach_id)
            .bind(&session.template_id)
            .bind(session.date)
            .bind(&session.start_time)
            .bind(&session.end_time)
            .bind(&session.location)
            .bind(session.session_type.as_str())
            .bind(session.status.as_str())
            .bind(session.max_capacity)
            .bind(&session.notes)
            .bind(session.created_at)
            .bind(session.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(slot_taken)
    }

    async fn insert_if_absent(&self, session: &Session) -> Result<Option<Session>, AppError> {
        sqlx::query_as::<_, Session>(
            r#"INSERT INTO sessions (id, coach_id, template_id, date, start_time, end_time, location, session_type, status, max_capacity, notes, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT (coach_id, date, start_time) DO NOTHING
               RETURNING *"#
        )
            .bind(&session.id)
            .bind(&session.coach_id)
            .bind(&session.template_id)
            .bind(session.date)
            .bind(&session.start_time)
            .bind(&session.end_time)
            .bind(&session.location)
            .bind(session.session_type.as_str())
            .bind(session.status.as_str())
            .bind(session.max_capacity)
            .bind(&session.notes)
            .bind(session.created_at)
            .bind(session.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Session>, AppError> {
        sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_coach(&self, coach_id: &str, filter: &SessionFilter) -> Result<Vec<Session>, AppError> {
        let status = filter.status.map(|s| s.as_str());
        sqlx::query_as::<_, Session>(
            r#"SELECT * FROM sessions
               WHERE coach_id = ?
                 AND (? IS NULL OR status = ?)
                 AND (? IS NULL OR date >= ?)
                 AND (? IS NULL OR date <= ?)
               ORDER BY date ASC, start_time ASC
               LIMIT ?"#
        )
            .bind(coach_id)
            .bind(status).bind(status)
            .bind(filter.from).bind(filter.from)
            .bind(filter.to).bind(filter.to)
            .bind(filter.limit.unwrap_or(100))
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_upcoming(&self, coach_id: &str, from: NaiveDate, limit: i64) -> Result<Vec<Session>, AppError> {
        sqlx::query_as::<_, Session>(
            r#"SELECT * FROM sessions
               WHERE coach_id = ? AND status IN ('SCHEDULED', 'IN_PROGRESS') AND date >= ?
               ORDER BY date ASC, start_time ASC
               LIMIT ?"#
        )
            .bind(coach_id)
            .bind(from)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_available(&self, filter: &AvailabilityFilter) -> Result<Vec<AvailableSession>, AppError> {
        sqlx::query_as::<_, AvailableSession>(
            r#"SELECT * FROM (
                   SELECT s.*,
                          (SELECT COUNT(*) FROM bookings b WHERE b.session_id = s.id AND b.status <> 'CANCELLED') AS booked_count
                   FROM sessions s
                   WHERE s.status = 'SCHEDULED'
                     AND s.date >= ?
                     AND (? IS NULL OR s.date <= ?)
                     AND (? IS NULL OR s.location LIKE '%' || ? || '%')
               ) AS a
               WHERE a.booked_count < a.max_capacity
               ORDER BY a.date ASC, a.start_time ASC"#
        )
            .bind(filter.from)
            .bind(filter.to).bind(filter.to)
            .bind(&filter.location).bind(&filter.location)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count_active_bookings(&self, session_id: &str) -> Result<i64, AppError> {
        let mut conn = self.pool.acquire().await.map_err(AppError::Database)?;
        count_live_bookings(&mut *conn, session_id).await
    }

    async fn update_scheduled(&self, session: &Session, read_at: DateTime<Utc>) -> Result<Session, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let current = lock_session(&mut *tx, &session.id).await?
            .ok_or(AppError::NotFound("Session not found".into()))?;
        if current.status != SessionStatus::Scheduled {
            return Err(AppError::Forbidden("Session can only be edited while scheduled".into()));
        }
        if current.updated_at != read_at {
            return Err(AppError::Conflict("Session was modified by another request".into()));
        }

        let booked = count_live_bookings(&mut *tx, &session.id).await?;
        if i64::from(session.max_capacity) < booked {
            return Err(AppError::Validation(format!(
                "maxCapacity cannot be lower than the {} bookings already on this session",
                booked
            )));
        }

        let updated = sqlx::query_as::<_, Session>(
            r#"UPDATE sessions
               SET date = ?, start_time = ?, end_time = ?, location = ?, session_type = ?, max_capacity = ?, notes = ?, updated_at = ?
               WHERE id = ?
               RETURNING *"#
        )
            .bind(session.date)
            .bind(&session.start_time)
            .bind(&session.end_time)
            .bind(&session.location)
            .bind(session.session_type.as_str())
            .bind(session.max_capacity)
            .bind(&session.notes)
            .bind(session.updated_at)
            .bind(&session.id)
            .fetch_one(&mut *tx)
            .await
            .map_err(slot_taken)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }

    async fn transition(&self, id: &str, from: SessionStatus, to: SessionStatus, now: DateTime<Utc>) -> Result<Session, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let updated = sqlx::query_as::<_, Session>(
            "UPDATE sessions SET status = ?, updated_at = ? WHERE id = ? AND status = ? RETURNING *"
        )
            .bind(to.as_str())
            .bind(now)
            .bind(id)
            .bind(from.as_str())
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::InvalidState("Session status changed concurrently".into()))?;

        if to == SessionStatus::Completed {
            sqlx::query("UPDATE bookings SET status = 'COMPLETED' WHERE session_id = ? AND status = 'CONFIRMED'")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }

    async fn cancel_with_bookings(&self, id: &str, now: DateTime<Utc>) -> Result<(Session, Vec<Booking>), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let cancelled = sqlx::query_as::<_, Session>(
            r#"UPDATE sessions SET status = 'CANCELLED', updated_at = ?
               WHERE id = ? AND status IN ('SCHEDULED', 'IN_PROGRESS')
               RETURNING *"#
        )
            .bind(now)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::InvalidState("Session is already completed or cancelled".into()))?;

        let affected = sqlx::query_as::<_, Booking>(
            r#"UPDATE bookings SET status = 'CANCELLED', cancelled_at = ?
               WHERE session_id = ? AND status NOT IN ('CANCELLED', 'COMPLETED')
               RETURNING *"#
        )
            .bind(now)
            .bind(id)
            .fetch_all(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok((cancelled, affected))
    }
}
