use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

pub const DEFAULT_RATING: i32 = 5;

/// A coach's assessment of one player in one session. At most one per (session, player).
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub id: String,
    pub session_id: String,
    pub player_id: String,
    pub coach_id: String,
    pub effort_rating: i32,
    pub focus_rating: i32,
    pub technical_rating: i32,
    pub highlights: Option<String>,
    pub improvements: Option<String>,
    pub coach_notes: Option<String>,
    pub player_feedback: Option<String>,
    #[sqlx(json)]
    pub drills_completed: Vec<String>,
    #[sqlx(json)]
    pub focus_areas: Vec<String>,
    pub attendance: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewReportParams {
    pub session_id: String,
    pub player_id: String,
    pub coach_id: String,
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

impl SessionReport {
    pub fn new(params: NewReportParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            session_id: params.session_id,
            player_id: params.player_id,
            coach_id: params.coach_id,
            effort_rating: params.effort_rating.unwrap_or(DEFAULT_RATING),
            focus_rating: params.focus_rating.unwrap_or(DEFAULT_RATING),
            technical_rating: params.technical_rating.unwrap_or(DEFAULT_RATING),
            highlights: params.highlights,
            improvements: params.improvements,
            coach_notes: params.coach_notes,
            player_feedback: params.player_feedback,
            drills_completed: params.drills_completed.unwrap_or_default(),
            focus_areas: params.focus_areas.unwrap_or_default(),
            attendance: params.attendance.unwrap_or(true),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn ratings(&self) -> [i32; 3] {
        [self.effort_rating, self.focus_rating, self.technical_rating]
    }
}

/// Fields left `None` keep their stored value.
#[derive(Debug, Default, Clone)]
pub struct ReportPatch {
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

impl ReportPatch {
    pub fn ratings(&self) -> impl Iterator<Item = i32> + '_ {
        [self.effort_rating, self.focus_rating, self.technical_rating].into_iter().flatten()
    }
}

/// Report joined with the player's name and the session it belongs to.
#[derive(Debug, Serialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReportView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub report: SessionReport,
    pub player_first_name: String,
    pub player_last_name: String,
    pub session_date: NaiveDate,
    pub session_start_time: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> NewReportParams {
        NewReportParams {
            session_id: "s".into(),
            player_id: "p".into(),
            coach_id: "c".into(),
            effort_rating: None,
            focus_rating: Some(8),
            technical_rating: None,
            highlights: None,
            improvements: None,
            coach_notes: None,
            player_feedback: None,
            drills_completed: None,
            focus_areas: None,
            attendance: None,
        }
    }

    #[test]
    fn test_new_report_fills_defaults() {
        let report = SessionReport::new(params());
        assert_eq!(report.ratings(), [DEFAULT_RATING, 8, DEFAULT_RATING]);
        assert!(report.attendance);
        assert!(report.drills_completed.is_empty());
    }

    #[test]
    fn test_patch_ratings_skip_absent_fields() {
        let patch = ReportPatch { technical_rating: Some(11), ..Default::default() };
        assert_eq!(patch.ratings().collect::<Vec<_>>(), vec![11]);
    }
}
