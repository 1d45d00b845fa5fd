use crate::domain::{
    models::report::{ReportPatch, ReportView, SessionReport},
    ports::ReportRepository,
};
use crate::error::{is_unique_violation, AppError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{types::Json, SqlitePool};

const VIEW_SELECT: &str = r#"
    SELECT r.*,
           p.first_name AS player_first_name,
           p.last_name AS player_last_name,
           s.date AS session_date,
           s.start_time AS session_start_time
    FROM session_reports r
    JOIN players p ON p.id = r.player_id
    JOIN sessions s ON s.id = r.session_id"#;

pub struct SqliteReportRepo {
    pool: SqlitePool,
}

impl SqliteReportRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportRepository for SqliteReportRepo {
    async fn create(&self, report: &SessionReport) -> Result<SessionReport, AppError> {
        sqlx::query_as::<_, SessionReport>(
            r#"INSERT INTO session_reports (id, session_id, player_id, coach_id, effort_rating, focus_rating, technical_rating,
                   highlights, improvements, coach_notes, player_feedback, drills_completed, focus_areas, attendance, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
               RETURNING *"#
        )
            .bind(&report.id)
            .bind(&report.session_id)
            .bind(&report.player_id)
            .bind(&report.coach_id)
            .bind(report.effort_rating)
            .bind(report.focus_rating)
            .bind(report.technical_rating)
            .bind(&report.highlights)
            .bind(&report.improvements)
            .bind(&report.coach_notes)
            .bind(&report.player_feedback)
            .bind(Json(&report.drills_completed))
            .bind(Json(&report.focus_areas))
            .bind(report.attendance)
            .bind(report.created_at)
            .bind(report.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::Conflict("Report already exists for this session and player".into())
                } else {
                    AppError::Database(e)
                }
            })
    }

    async fn update(&self, id: &str, coach_id: &str, patch: &ReportPatch, now: DateTime<Utc>) -> Result<Option<SessionReport>, AppError> {
        sqlx::query_as::<_, SessionReport>(
            r#"UPDATE session_reports
               SET effort_rating = COALESCE(?, effort_rating),
                   focus_rating = COALESCE(?, focus_rating),
                   technical_rating = COALESCE(?, technical_rating),
                   highlights = COALESCE(?, highlights),
                   improvements = COALESCE(?, improvements),
                   coach_notes = COALESCE(?, coach_notes),
                   player_feedback = COALESCE(?, player_feedback),
                   drills_completed = COALESCE(?, drills_completed),
                   focus_areas = COALESCE(?, focus_areas),
                   attendance = COALESCE(?, attendance),
                   updated_at = ?
               WHERE id = ? AND coach_id = ?
               RETURNING *"#
        )
            .bind(patch.effort_rating)
            .bind(patch.focus_rating)
            .bind(patch.technical_rating)
            .bind(&patch.highlights)
            .bind(&patch.improvements)
            .bind(&patch.coach_notes)
            .bind(&patch.player_feedback)
            .bind(patch.drills_completed.as_ref().map(Json))
            .bind(patch.focus_areas.as_ref().map(Json))
            .bind(patch.attendance)
            .bind(now)
            .bind(id)
            .bind(coach_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_for_session(&self, session_id: &str) -> Result<Vec<ReportView>, AppError> {
        sqlx::query_as::<_, ReportView>(&format!(
            "{VIEW_SELECT} WHERE r.session_id = ? ORDER BY p.first_name ASC, p.last_name ASC"
        ))
            .bind(session_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_for_player(&self, player_id: &str, limit: i64) -> Result<Vec<ReportView>, AppError> {
        sqlx::query_as::<_, ReportView>(&format!(
            "{VIEW_SELECT} WHERE r.player_id = ? ORDER BY r.created_at DESC LIMIT ?"
        ))
            .bind(player_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count_for_session(&self, session_id: &str) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM session_reports WHERE session_id = ?")
            .bind(session_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
