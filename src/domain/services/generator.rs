use std::sync::Arc;
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use crate::domain::models::session::{NewSessionParams, Session, SessionType};
use crate::domain::ports::{SessionRepository, TemplateRepository};
use crate::error::AppError;
use tracing::{debug, info};

pub const MAX_WEEKS_AHEAD: u32 = 52;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub created: usize,
    pub sessions: Vec<Session>,
}

/// Dates in `[today, today + 7 * weeks_ahead)` falling on `day_of_week` (0 = Sunday).
pub fn occurrence_dates(day_of_week: u32, today: NaiveDate, weeks_ahead: u32) -> Vec<NaiveDate> {
    let horizon_end = today + Duration::days(7 * i64::from(weeks_ahead));
    let offset = (day_of_week + 7 - today.weekday().num_days_from_sunday()) % 7;

    let mut dates = Vec::new();
    let mut current = today + Duration::days(i64::from(offset));
    while current < horizon_end {
        dates.push(current);
        current += Duration::days(7);
    }
    dates
}

pub struct SessionGenerator {
    templates: Arc<dyn TemplateRepository>,
    sessions: Arc<dyn SessionRepository>,
}

impl SessionGenerator {
    pub fn new(templates: Arc<dyn TemplateRepository>, sessions: Arc<dyn SessionRepository>) -> Self {
        Self { templates, sessions }
    }

    /// Expands the coach's active recurring templates into sessions. Safe to re-run and to run
    /// concurrently: an occurrence whose (coach, date, start time) is already taken is skipped.
    pub async fn generate(&self, coach_id: &str, weeks_ahead: u32, today: NaiveDate) -> Result<GenerationResult, AppError> {
        if weeks_ahead > MAX_WEEKS_AHEAD {
            return Err(AppError::Validation(format!("weeksAhead must be between 0 and {}", MAX_WEEKS_AHEAD)));
        }

        let templates = self.templates.list_active_recurring(coach_id).await?;
        let mut created = Vec::new();

        for template in templates {
            let Ok(day) = u32::try_from(template.day_of_week) else { continue };

            for date in occurrence_dates(day, today, weeks_ahead) {
                let candidate = Session::new(NewSessionParams {
                    coach_id: coach_id.to_string(),
                    template_id: Some(template.id.clone()),
                    date,
                    start_time: template.start_time.clone(),
                    end_time: template.end_time.clone(),
                    location: template.location.clone(),
                    session_type: SessionType::for_capacity(template.max_capacity),
                    max_capacity: template.max_capacity,
                    notes: None,
                });

                match self.sessions.insert_if_absent(&candidate).await? {
                    Some(session) => created.push(session),
                    None => debug!("Session for {} {} already exists, skipping", date, template.start_time),
                }
            }
        }

        info!("Generated {} sessions for coach {} ({} weeks ahead)", created.len(), coach_id, weeks_ahead);
        Ok(GenerationResult { created: created.len(), sessions: created })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_monday_template_from_a_monday_yields_one_per_week() {
        // 2026-10-19 is a Monday
        let dates = occurrence_dates(1, date(2026, 10, 19), 2);
        assert_eq!(dates, vec![date(2026, 10, 19), date(2026, 10, 26)]);
    }

    #[test]
    fn test_first_occurrence_rolls_forward_to_matching_weekday() {
        // From a Wednesday, the next Sunday is four days away
        let dates = occurrence_dates(0, date(2026, 10, 21), 1);
        assert_eq!(dates, vec![date(2026, 10, 25)]);
    }

    #[test]
    fn test_zero_horizon_yields_nothing() {
        assert!(occurrence_dates(1, date(2026, 10, 19), 0).is_empty());
    }

    #[test]
    fn test_every_weekday_appears_once_per_week() {
        for day in 0..7 {
            let dates = occurrence_dates(day, date(2026, 10, 18), 4);
            assert_eq!(dates.len(), 4, "day {}", day);
            assert!(dates.iter().all(|d| d.weekday().num_days_from_sunday() == day));
        }
    }
}
