use std::sync::Arc;
use chrono::{NaiveDate, Utc};
use crate::domain::models::{
    auth::{Actor, Role},
    booking::{Booking, BookingStatus, BookingView, ParentBookingFilter},
    notice::NoticeKind,
    session::SessionStatus,
};
use crate::domain::ports::{BookingRepository, PlayerRepository, SessionRepository};
use crate::domain::services::notification::NotificationDispatcher;
use crate::error::AppError;
use tracing::{info, warn};

pub struct BookingRequest {
    pub session_id: String,
    pub player_id: String,
    pub notes: Option<String>,
}

/// Admission control and the booking status machine.
pub struct BookingService {
    bookings: Arc<dyn BookingRepository>,
    sessions: Arc<dyn SessionRepository>,
    players: Arc<dyn PlayerRepository>,
    notifications: NotificationDispatcher,
}

impl BookingService {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        sessions: Arc<dyn SessionRepository>,
        players: Arc<dyn PlayerRepository>,
        notifications: NotificationDispatcher,
    ) -> Self {
        Self { bookings, sessions, players, notifications }
    }

    /// Checks, in order: session exists, session is scheduled, player belongs to the parent,
    /// no live booking for the same player, and room left among pending + confirmed bookings.
    /// The last two (and the status) are re-verified under the session lock inside `admit`.
    pub async fn create(&self, parent_id: &str, req: BookingRequest) -> Result<Booking, AppError> {
        let session = self.sessions.find_by_id(&req.session_id).await?
            .ok_or(AppError::NotFound("Session not found".into()))?;

        if session.status != SessionStatus::Scheduled {
            return Err(AppError::InvalidState("Session is not available for booking".into()));
        }

        let player = self.players.find_by_id(&req.player_id).await?;
        if player.is_none_or(|p| p.parent_id.as_deref() != Some(parent_id)) {
            return Err(AppError::Forbidden("Player not found or not authorized".into()));
        }

        let booking = Booking::new(req.session_id, req.player_id, parent_id.to_string(), req.notes);
        let created = match self.bookings.admit(&booking).await {
            Ok(created) => created,
            Err(e) => {
                warn!("Booking for session {} rejected: {}", booking.session_id, e);
                return Err(e);
            }
        };

        info!("Booking {} admitted for session {} (player {})", created.id, created.session_id, created.player_id);
        self.notifications.booking_event(NoticeKind::BookingRequested, &created);
        Ok(created)
    }

    pub async fn confirm(&self, id: &str, coach_id: &str) -> Result<Booking, AppError> {
        let view = self.view(id).await?;
        if view.coach_id != coach_id {
            return Err(AppError::Forbidden("Not authorized".into()));
        }
        if view.booking.status != BookingStatus::Pending {
            return Err(AppError::InvalidState("Booking cannot be confirmed".into()));
        }

        let confirmed = self.bookings.confirm(id, Utc::now()).await?
            .ok_or(AppError::InvalidState("Booking cannot be confirmed".into()))?;

        info!("Booking {} confirmed", id);
        self.notifications.booking_event(NoticeKind::BookingConfirmed, &confirmed);
        Ok(confirmed)
    }

    pub async fn cancel(&self, id: &str, actor: &Actor) -> Result<Booking, AppError> {
        let view = self.view(id).await?;

        let authorized = match actor.role {
            Role::Coach => actor.coach_id().is_ok_and(|coach_id| coach_id == view.coach_id),
            Role::Parent => actor.parent_id().is_ok_and(|parent_id| parent_id == view.booking.parent_id),
            Role::Admin => false,
        };
        if !authorized {
            return Err(AppError::Forbidden("Not authorized".into()));
        }
        if !view.booking.status.is_cancellable() {
            return Err(AppError::InvalidState("Booking cannot be cancelled".into()));
        }

        let cancelled = self.bookings.cancel(id, Utc::now()).await?
            .ok_or(AppError::InvalidState("Booking cannot be cancelled".into()))?;

        info!("Booking {} cancelled by {}", id, actor.role.as_str());
        self.notifications.booking_event(NoticeKind::BookingCancelled, &cancelled);
        Ok(cancelled)
    }

    /// No status precondition: any booking on the coach's session may be marked as a no-show.
    pub async fn mark_no_show(&self, id: &str, coach_id: &str) -> Result<Booking, AppError> {
        let view = self.view(id).await?;
        if view.coach_id != coach_id {
            return Err(AppError::Forbidden("Not authorized".into()));
        }

        let updated = self.bookings.mark_no_show(id).await?
            .ok_or(AppError::NotFound("Booking not found".into()))?;
        info!("Booking {} marked as no-show (was {:?})", id, view.booking.status);
        Ok(updated)
    }

    pub async fn get(&self, id: &str, actor: &Actor) -> Result<BookingView, AppError> {
        let view = self.view(id).await?;
        let allowed = actor.is_admin()
            || actor.coach_id().is_ok_and(|coach_id| coach_id == view.coach_id)
            || actor.parent_id().is_ok_and(|parent_id| parent_id == view.booking.parent_id);

        if !allowed {
            return Err(AppError::Forbidden("Not authorized".into()));
        }
        Ok(view)
    }

    pub async fn pending_for_coach(&self, coach_id: &str) -> Result<Vec<BookingView>, AppError> {
        self.bookings.list_pending_for_coach(coach_id).await
    }

    pub async fn for_parent(
        &self,
        parent_id: &str,
        status: Option<BookingStatus>,
        upcoming: bool,
        today: NaiveDate,
    ) -> Result<Vec<BookingView>, AppError> {
        let filter = ParentBookingFilter {
            status,
            from_date: upcoming.then_some(today),
        };
        self.bookings.list_for_parent(parent_id, &filter).await
    }

    pub async fn for_session(&self, session_id: &str, actor: &Actor) -> Result<Vec<BookingView>, AppError> {
        let session = self.sessions.find_by_id(session_id).await?
            .ok_or(AppError::NotFound("Session not found".into()))?;

        if !actor.is_admin() && actor.coach_id()? != session.coach_id {
            return Err(AppError::Forbidden("Not authorized for this session".into()));
        }
        self.bookings.list_for_session(session_id).await
    }

    async fn view(&self, id: &str) -> Result<BookingView, AppError> {
        self.bookings.find_view(id).await?
            .ok_or(AppError::NotFound("Booking not found".into()))
    }
}
