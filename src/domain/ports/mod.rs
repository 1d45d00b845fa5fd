use crate::domain::models::{
    availability::AvailabilityTemplate,
    booking::{Booking, BookingView, ParentBookingFilter},
    notice::Notice,
    player::Player,
    profile::{Coach, Parent},
    report::{ReportPatch, ReportView, SessionReport},
    session::{AvailabilityFilter, AvailableSession, Session, SessionFilter, SessionStatus},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn create_coach(&self, coach: &Coach) -> Result<Coach, AppError>;
    async fn create_parent(&self, parent: &Parent) -> Result<Parent, AppError>;
    async fn find_coach_by_user(&self, user_id: &str) -> Result<Option<Coach>, AppError>;
    async fn find_parent_by_user(&self, user_id: &str) -> Result<Option<Parent>, AppError>;
    async fn find_parent_by_id(&self, id: &str) -> Result<Option<Parent>, AppError>;
}

#[async_trait]
pub trait PlayerRepository: Send + Sync {
    async fn create(&self, player: &Player) -> Result<Player, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Player>, AppError>;
    async fn list_by_coach(&self, coach_id: &str, include_inactive: bool) -> Result<Vec<Player>, AppError>;
    async fn list_by_parent(&self, parent_id: &str) -> Result<Vec<Player>, AppError>;
    /// Single-column write, so it cannot undo a concurrent deactivation.
    async fn set_parent(&self, id: &str, coach_id: &str, parent_id: Option<&str>) -> Result<Option<Player>, AppError>;
    async fn deactivate(&self, id: &str, coach_id: &str) -> Result<bool, AppError>;
}

#[async_trait]
pub trait TemplateRepository: Send + Sync {
    async fn create(&self, template: &AvailabilityTemplate) -> Result<AvailabilityTemplate, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<AvailabilityTemplate>, AppError>;
    /// Rewrites the slot's schedule fields; never touches `is_active` and fails with `NotFound` once deactivated.
    async fn update(&self, template: &AvailabilityTemplate) -> Result<AvailabilityTemplate, AppError>;
    /// `false` when no active slot with that id belongs to the coach.
    async fn deactivate(&self, id: &str, coach_id: &str, now: DateTime<Utc>) -> Result<bool, AppError>;
    /// Active templates ordered by (day_of_week, start_time).
    async fn list_active(&self, coach_id: &str) -> Result<Vec<AvailabilityTemplate>, AppError>;
    async fn list_active_recurring(&self, coach_id: &str) -> Result<Vec<AvailabilityTemplate>, AppError>;
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Fails with `Conflict` when the coach already has a session at that date and start time.
    async fn create(&self, session: &Session) -> Result<Session, AppError>;
    /// Inserts unless a session already occupies (coach_id, date, start_time); `None` means it was skipped.
    async fn insert_if_absent(&self, session: &Session) -> Result<Option<Session>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Session>, AppError>;
    async fn list_by_coach(&self, coach_id: &str, filter: &SessionFilter) -> Result<Vec<Session>, AppError>;
    async fn list_upcoming(&self, coach_id: &str, from: NaiveDate, limit: i64) -> Result<Vec<Session>, AppError>;
    async fn list_available(&self, filter: &AvailabilityFilter) -> Result<Vec<AvailableSession>, AppError>;
    async fn count_active_bookings(&self, session_id: &str) -> Result<i64, AppError>;
    /// Applies the patch only while the session is still scheduled, unchanged since `read_at`,
    /// and its capacity still covers the non-cancelled bookings.
    async fn update_scheduled(&self, session: &Session, read_at: DateTime<Utc>) -> Result<Session, AppError>;
    /// Compare-and-set transition; when moving to completed, confirmed bookings complete in the same transaction.
    async fn transition(&self, id: &str, from: SessionStatus, to: SessionStatus, now: DateTime<Utc>) -> Result<Session, AppError>;
    /// Cancels the session and every booking on it that is not already cancelled or completed, atomically.
    async fn cancel_with_bookings(&self, id: &str, now: DateTime<Utc>) -> Result<(Session, Vec<Booking>), AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Locks the session, re-checks status, duplicate and capacity, then inserts the pending booking.
    async fn admit(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn find_view(&self, id: &str) -> Result<Option<BookingView>, AppError>;
    async fn confirm(&self, id: &str, now: DateTime<Utc>) -> Result<Option<Booking>, AppError>;
    async fn cancel(&self, id: &str, now: DateTime<Utc>) -> Result<Option<Booking>, AppError>;
    async fn mark_no_show(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn list_pending_for_coach(&self, coach_id: &str) -> Result<Vec<BookingView>, AppError>;
    async fn list_for_parent(&self, parent_id: &str, filter: &ParentBookingFilter) -> Result<Vec<BookingView>, AppError>;
    async fn list_for_session(&self, session_id: &str) -> Result<Vec<BookingView>, AppError>;
}

#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Fails with `Conflict` when the player already has a report for the session.
    async fn create(&self, report: &SessionReport) -> Result<SessionReport, AppError>;
    /// Applies the fields present in the patch in a single statement; `None` when the coach owns no such report.
    async fn update(&self, id: &str, coach_id: &str, patch: &ReportPatch, now: DateTime<Utc>) -> Result<Option<SessionReport>, AppError>;
    async fn list_for_session(&self, session_id: &str) -> Result<Vec<ReportView>, AppError>;
    /// Newest first.
    async fn list_for_player(&self, player_id: &str, limit: i64) -> Result<Vec<ReportView>, AppError>;
    async fn count_for_session(&self, session_id: &str) -> Result<i64, AppError>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notice: &Notice) -> Result<(), AppError>;
}
