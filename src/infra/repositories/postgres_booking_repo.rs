use crate::domain::{
    models::{
        booking::{Booking, BookingView, ParentBookingFilter},
        session::SessionStatus,
    },
    ports::BookingRepository,
};
use crate::error::{is_unique_violation, AppError};
use crate::infra::repositories::postgres_session_repo::lock_session;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

const VIEW_SELECT: &str = r#"
    SELECT b.*,
           s.coach_id,
           s.date AS session_date,
           s.start_time AS session_start_time,
           s.end_time AS session_end_time,
           s.location AS session_location,
           p.first_name AS player_first_name,
           p.last_name AS player_last_name,
           pa.display_name AS parent_name,
           pa.email AS parent_email,
           pa.phone AS parent_phone
    FROM bookings b
    JOIN sessions s ON s.id = b.session_id
    JOIN players p ON p.id = b.player_id
    JOIN parents pa ON pa.id = b.parent_id
"#;

pub struct PostgresBookingRepo {
    pool: PgPool,
}

impl PostgresBookingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepo {
    async fn admit(&self, booking: &Booking) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let session = lock_session(&mut *tx, &booking.session_id).await?
            .ok_or(AppError::NotFound("Session not found".into()))?;
        if session.status != SessionStatus::Scheduled {
            return Err(AppError::InvalidState("Session is not available for booking".into()));
        }

        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM bookings WHERE session_id = $1 AND player_id = $2 AND status <> 'CANCELLED'"
        )
            .bind(&booking.session_id)
            .bind(&booking.player_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        if existing > 0 {
            return Err(AppError::Conflict("Player already booked for this session".into()));
        }

        let held = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM bookings WHERE session_id = $1 AND status IN ('PENDING', 'CONFIRMED')"
        )
            .bind(&booking.session_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        if held >= i64::from(session.max_capacity) {
            return Err(AppError::CapacityExceeded("Session is full".into()));
        }

        let created = sqlx::query_as::<_, Booking>(
            r#"INSERT INTO bookings (id, session_id, player_id, parent_id, status, notes, requested_at, confirmed_at, cancelled_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
               RETURNING *"#
        )
            .bind(&booking.id)
            .bind(&booking.session_id)
            .bind(&booking.player_id)
            .bind(&booking.parent_id)
            .bind(booking.status.as_str())
            .bind(&booking.notes)
            .bind(booking.requested_at)
            .bind(booking.confirmed_at)
            .bind(booking.cancelled_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::Conflict("Player already booked for this session".into())
                } else {
                    AppError::Database(e)
                }
            })?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_view(&self, id: &str) -> Result<Option<BookingView>, AppError> {
        sqlx::query_as::<_, BookingView>(&format!("{VIEW_SELECT} WHERE b.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn confirm(&self, id: &str, now: DateTime<Utc>) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = 'CONFIRMED', confirmed_at = $1 WHERE id = $2 AND status = 'PENDING' RETURNING *"
        )
            .bind(now)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn cancel(&self, id: &str, now: DateTime<Utc>) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            r#"UPDATE bookings SET status = 'CANCELLED', cancelled_at = $1
               WHERE id = $2 AND status IN ('PENDING', 'CONFIRMED')
               RETURNING *"#
        )
            .bind(now)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn mark_no_show(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("UPDATE bookings SET status = 'NO_SHOW' WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_pending_for_coach(&self, coach_id: &str) -> Result<Vec<BookingView>, AppError> {
        sqlx::query_as::<_, BookingView>(&format!(
            "{VIEW_SELECT} WHERE s.coach_id = $1 AND b.status = 'PENDING' ORDER BY b.requested_at ASC"
        ))
            .bind(coach_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_for_parent(&self, parent_id: &str, filter: &ParentBookingFilter) -> Result<Vec<BookingView>, AppError> {
        let status = filter.status.map(|s| s.as_str());
        sqlx::query_as::<_, BookingView>(&format!(
            r#"{VIEW_SELECT}
               WHERE b.parent_id = $1
                 AND ($2::text IS NULL OR b.status = $2)
                 AND ($3::date IS NULL OR s.date >= $3)
               ORDER BY s.date ASC, s.start_time ASC"#
        ))
            .bind(parent_id)
            .bind(status)
            .bind(filter.from_date)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_for_session(&self, session_id: &str) -> Result<Vec<BookingView>, AppError> {
        sqlx::query_as::<_, BookingView>(&format!(
            "{VIEW_SELECT} WHERE b.session_id = $1 ORDER BY b.requested_at ASC"
        ))
            .bind(session_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
