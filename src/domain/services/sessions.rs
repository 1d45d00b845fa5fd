use std::sync::Arc;
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use crate::domain::models::{
    auth::Actor,
    booking::BookingView,
    session::{AvailabilityFilter, AvailableSession, NewSessionParams, Session, SessionFilter, SessionStatus, SessionType},
};
use crate::domain::ports::{BookingRepository, ReportRepository, SessionRepository};
use crate::domain::services::availability::validate_slot;
use crate::domain::services::notification::NotificationDispatcher;
use crate::error::AppError;
use tracing::{info, warn};

pub const DEFAULT_LIST_LIMIT: i64 = 100;
pub const DEFAULT_UPCOMING_LIMIT: i64 = 10;

pub struct NewSession {
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub session_type: Option<SessionType>,
    pub max_capacity: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Default)]
pub struct SessionPatch {
    pub date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub location: Option<String>,
    pub session_type: Option<SessionType>,
    pub max_capacity: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDetail {
    #[serde(flatten)]
    pub session: Session,
    pub booked_count: i64,
    pub report_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bookings: Option<Vec<BookingView>>,
}

pub struct SessionService {
    sessions: Arc<dyn SessionRepository>,
    bookings: Arc<dyn BookingRepository>,
    reports: Arc<dyn ReportRepository>,
    notifications: NotificationDispatcher,
}

impl SessionService {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        bookings: Arc<dyn BookingRepository>,
        reports: Arc<dyn ReportRepository>,
        notifications: NotificationDispatcher,
    ) -> Self {
        Self { sessions, bookings, reports, notifications }
    }

    pub async fn create(&self, coach_id: &str, req: NewSession) -> Result<Session, AppError> {
        let max_capacity = req.max_capacity.unwrap_or(1);
        validate_slot(&req.start_time, &req.end_time, &req.location, max_capacity)?;

        let session = Session::new(NewSessionParams {
            coach_id: coach_id.to_string(),
            template_id: None,
            date: req.date,
            start_time: req.start_time,
            end_time: req.end_time,
            location: req.location,
            session_type: req.session_type.unwrap_or(SessionType::Individual),
            max_capacity,
            notes: req.notes,
        });

        let created = self.sessions.create(&session).await?;
        info!("Created session {} on {} {} for coach {}", created.id, created.date, created.start_time, coach_id);
        Ok(created)
    }

    pub async fn list_for_coach(&self, coach_id: &str, mut filter: SessionFilter) -> Result<Vec<Session>, AppError> {
        filter.limit = Some(filter.limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, 500));
        self.sessions.list_by_coach(coach_id, &filter).await
    }

    pub async fn upcoming(&self, coach_id: &str, limit: Option<i64>, today: NaiveDate) -> Result<Vec<Session>, AppError> {
        let limit = limit.unwrap_or(DEFAULT_UPCOMING_LIMIT).clamp(1, 100);
        self.sessions.list_upcoming(coach_id, today, limit).await
    }

    /// Scheduled sessions from `filter.from` onward that still have room, by computed booking count.
    pub async fn available(&self, filter: AvailabilityFilter) -> Result<Vec<AvailableSession>, AppError> {
        self.sessions.list_available(&filter).await
    }

    pub async fn detail(&self, id: &str, actor: &Actor) -> Result<SessionDetail, AppError> {
        let session = self.find(id).await?;
        let booked_count = self.sessions.count_active_bookings(id).await?;
        let report_count = self.reports.count_for_session(id).await?;

        let owns = actor.coach_id().is_ok_and(|coach_id| coach_id == session.coach_id);
        let bookings = if owns || actor.is_admin() {
            Some(self.bookings.list_for_session(id).await?)
        } else {
            None
        };

        Ok(SessionDetail { session, booked_count, report_count, bookings })
    }

    pub async fn update(&self, id: &str, coach_id: &str, patch: SessionPatch) -> Result<Session, AppError> {
        let mut session = self.owned(id, coach_id).await?;
        let read_at = session.updated_at;

        if session.status != SessionStatus::Scheduled {
            return Err(AppError::Forbidden("Session can only be edited while scheduled".into()));
        }

        if let Some(date) = patch.date { session.date = date; }
        if let Some(start) = patch.start_time { session.start_time = start; }
        if let Some(end) = patch.end_time { session.end_time = end; }
        if let Some(location) = patch.location { session.location = location; }
        if let Some(kind) = patch.session_type { session.session_type = kind; }
        if let Some(cap) = patch.max_capacity { session.max_capacity = cap; }
        if let Some(notes) = patch.notes {
            session.notes = if notes.is_empty() { None } else { Some(notes) };
        }
        validate_slot(&session.start_time, &session.end_time, &session.location, session.max_capacity)?;

        session.updated_at = Utc::now();
        let updated = self.sessions.update_scheduled(&session, read_at).await?;
        info!("Updated session {}", id);
        Ok(updated)
    }

    pub async fn set_status(&self, id: &str, coach_id: &str, next: SessionStatus) -> Result<Session, AppError> {
        if next == SessionStatus::Cancelled {
            return self.cancel(id, coach_id).await;
        }

        let session = self.owned(id, coach_id).await?;
        if !session.status.can_transition_to(next) {
            warn!("Rejected session transition {:?} -> {:?} for {}", session.status, next, id);
            return Err(AppError::InvalidState(format!(
                "Cannot move session from {} to {}",
                session.status.as_str(),
                next.as_str()
            )));
        }

        let updated = self.sessions.transition(id, session.status, next, Utc::now()).await?;
        info!("Session {} moved {:?} -> {:?}", id, session.status, next);
        Ok(updated)
    }

    pub async fn cancel(&self, id: &str, coach_id: &str) -> Result<Session, AppError> {
        let session = self.owned(id, coach_id).await?;
        if session.status.is_terminal() {
            return Err(AppError::InvalidState(format!(
                "Session is already {}",
                session.status.as_str().to_lowercase()
            )));
        }

        let (cancelled, affected) = self.sessions.cancel_with_bookings(id, Utc::now()).await?;
        info!("Session {} cancelled, {} bookings cancelled with it", id, affected.len());

        self.notifications.session_cancelled(id, &affected);
        Ok(cancelled)
    }

    async fn find(&self, id: &str) -> Result<Session, AppError> {
        self.sessions.find_by_id(id).await?
            .ok_or(AppError::NotFound("Session not found".into()))
    }

    async fn owned(&self, id: &str, coach_id: &str) -> Result<Session, AppError> {
        let session = self.find(id).await?;
        if session.coach_id != coach_id {
            return Err(AppError::Forbidden("Not authorized for this session".into()));
        }
        Ok(session)
    }
}
