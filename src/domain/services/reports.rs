use std::sync::Arc;
use chrono::Utc;
use crate::domain::models::{
    auth::Actor,
    report::{NewReportParams, ReportPatch, ReportView, SessionReport},
};
use crate::domain::ports::{PlayerRepository, ReportRepository, SessionRepository};
use crate::error::AppError;
use tracing::info;

pub const DEFAULT_PLAYER_REPORT_LIMIT: i64 = 20;

pub struct NewReport {
    pub session_id: String,
    pub player_id: String,
    pub effort_rating: Option<i32>,
    pub focus_rating: Option<i32>,
    pub technical_rating: Option<i32>,
    pub highlights: Option<String>,
    pub improvements: Option<String>,
    pub coach_notes: Option<String>,
    pub player_feedback: Option<String>,
    pub drills_completed: Option<Vec<String>>,
    pub focus_areas: Option<Vec<String>>,
    pub attendance: Option<bool>,
}

fn validate_ratings(ratings: impl IntoIterator<Item = i32>) -> Result<(), AppError> {
    if ratings.into_iter().any(|r| !(1..=10).contains(&r)) {
        return Err(AppError::Validation("Ratings must be between 1 and 10".into()));
    }
    Ok(())
}

/// Per-player session reports written by the coach who runs the session.
pub struct ReportService {
    reports: Arc<dyn ReportRepository>,
    sessions: Arc<dyn SessionRepository>,
    players: Arc<dyn PlayerRepository>,
}

impl ReportService {
    pub fn new(
        reports: Arc<dyn ReportRepository>,
        sessions: Arc<dyn SessionRepository>,
        players: Arc<dyn PlayerRepository>,
    ) -> Self {
        Self { reports, sessions, players }
    }

    pub async fn create(&self, coach_id: &str, req: NewReport) -> Result<SessionReport, AppError> {
        let session = self.sessions.find_by_id(&req.session_id).await?
            .ok_or(AppError::NotFound("Session not found".into()))?;
        if session.coach_id != coach_id {
            return Err(AppError::Forbidden("Not authorized for this session".into()));
        }

        let player = self.players.find_by_id(&req.player_id).await?
            .ok_or(AppError::NotFound("Player not found".into()))?;
        if player.coach_id != coach_id {
            return Err(AppError::Forbidden("Not authorized for this player".into()));
        }

        let report = SessionReport::new(NewReportParams {
            session_id: req.session_id,
            player_id: req.player_id,
            coach_id: coach_id.to_string(),
            effort_rating: req.effort_rating,
            focus_rating: req.focus_rating,
            technical_rating: req.technical_rating,
            highlights: req.highlights,
            improvements: req.improvements,
            coach_notes: req.coach_notes,
            player_feedback: req.player_feedback,
            drills_completed: req.drills_completed,
            focus_areas: req.focus_areas,
            attendance: req.attendance,
        });
        validate_ratings(report.ratings())?;

        let created = self.reports.create(&report).await?;
        info!("Report {} filed for player {} in session {}", created.id, created.player_id, created.session_id);
        Ok(created)
    }

    pub async fn update(&self, id: &str, coach_id: &str, patch: ReportPatch) -> Result<SessionReport, AppError> {
        validate_ratings(patch.ratings())?;

        let updated = self.reports.update(id, coach_id, &patch, Utc::now()).await?
            .ok_or(AppError::NotFound("Report not found or not authorized".into()))?;
        info!("Updated report {}", id);
        Ok(updated)
    }

    pub async fn for_session(&self, session_id: &str, actor: &Actor) -> Result<Vec<ReportView>, AppError> {
        let session = self.sessions.find_by_id(session_id).await?
            .ok_or(AppError::NotFound("Session not found".into()))?;

        if !actor.is_admin() && actor.coach_id()? != session.coach_id {
            return Err(AppError::Forbidden("Not authorized for this session".into()));
        }
        self.reports.list_for_session(session_id).await
    }

    /// Readable by the player's coach, the linked parent, or an admin.
    pub async fn for_player(&self, player_id: &str, actor: &Actor, limit: Option<i64>) -> Result<Vec<ReportView>, AppError> {
        let player = self.players.find_by_id(player_id).await?
            .ok_or(AppError::NotFound("Player not found".into()))?;

        let allowed = actor.is_admin()
            || actor.coach_id().is_ok_and(|coach_id| coach_id == player.coach_id)
            || actor.parent_id().is_ok_and(|parent_id| player.parent_id.as_deref() == Some(parent_id));
        if !allowed {
            return Err(AppError::Forbidden("Not authorized for this player".into()));
        }

        let limit = limit.unwrap_or(DEFAULT_PLAYER_REPORT_LIMIT).clamp(1, 100);
        self.reports.list_for_player(player_id, limit).await
    }
}
