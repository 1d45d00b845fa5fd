use std::sync::Arc;
use chrono::{NaiveDate, NaiveTime, Utc};
use crate::domain::models::availability::{AvailabilityTemplate, NewTemplateParams};
use crate::domain::ports::TemplateRepository;
use crate::error::AppError;
use tracing::info;

/// Parses a zero-padded 24h "HH:MM" string.
pub fn parse_clock(value: &str) -> Result<NaiveTime, AppError> {
    if value.len() != 5 {
        return Err(AppError::Validation(format!("Invalid time '{}' (expected HH:MM)", value)));
    }
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| AppError::Validation(format!("Invalid time '{}' (expected HH:MM)", value)))
}

/// Validates a start/end pair and a capacity shared by templates and sessions.
pub fn validate_slot(start_time: &str, end_time: &str, location: &str, max_capacity: i32) -> Result<(), AppError> {
    let start = parse_clock(start_time)?;
    let end = parse_clock(end_time)?;

    if end <= start {
        return Err(AppError::Validation("End time must be after start time".into()));
    }
    if location.trim().is_empty() {
        return Err(AppError::Validation("Location is required".into()));
    }
    if max_capacity < 1 {
        return Err(AppError::Validation("Capacity must be at least 1".into()));
    }
    Ok(())
}

fn validate_template(template: &AvailabilityTemplate) -> Result<(), AppError> {
    if !(0..=6).contains(&template.day_of_week) {
        return Err(AppError::Validation("Day of week must be between 0 and 6".into()));
    }
    validate_slot(&template.start_time, &template.end_time, &template.location, template.max_capacity)
}

pub struct NewTemplate {
    pub day_of_week: i32,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub is_recurring: Option<bool>,
    pub specific_date: Option<NaiveDate>,
    pub max_capacity: Option<i32>,
}

#[derive(Default)]
pub struct TemplatePatch {
    pub day_of_week: Option<i32>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub location: Option<String>,
    pub is_recurring: Option<bool>,
    pub specific_date: Option<NaiveDate>,
    pub max_capacity: Option<i32>,
}

pub struct TemplateService {
    repo: Arc<dyn TemplateRepository>,
}

impl TemplateService {
    pub fn new(repo: Arc<dyn TemplateRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, coach_id: &str, req: NewTemplate) -> Result<AvailabilityTemplate, AppError> {
        let template = AvailabilityTemplate::new(NewTemplateParams {
            coach_id: coach_id.to_string(),
            day_of_week: req.day_of_week,
            start_time: req.start_time,
            end_time: req.end_time,
            location: req.location,
            is_recurring: req.is_recurring.unwrap_or(true),
            specific_date: req.specific_date,
            max_capacity: req.max_capacity.unwrap_or(1),
        });
        validate_template(&template)?;

        let created = self.repo.create(&template).await?;
        info!("Created availability template {} for coach {}", created.id, coach_id);
        Ok(created)
    }

    pub async fn list(&self, coach_id: &str) -> Result<Vec<AvailabilityTemplate>, AppError> {
        self.repo.list_active(coach_id).await
    }

    pub async fn update(&self, id: &str, coach_id: &str, patch: TemplatePatch) -> Result<AvailabilityTemplate, AppError> {
        let mut template = self.owned(id, coach_id).await?;

        if let Some(day) = patch.day_of_week { template.day_of_week = day; }
        if let Some(start) = patch.start_time { template.start_time = start; }
        if let Some(end) = patch.end_time { template.end_time = end; }
        if let Some(location) = patch.location { template.location = location; }
        if let Some(recurring) = patch.is_recurring { template.is_recurring = recurring; }
        if patch.specific_date.is_some() { template.specific_date = patch.specific_date; }
        if let Some(cap) = patch.max_capacity { template.max_capacity = cap; }
        validate_template(&template)?;

        template.updated_at = Utc::now();
        let updated = self.repo.update(&template).await?;
        info!("Updated availability template {}", id);
        Ok(updated)
    }

    pub async fn soft_delete(&self, id: &str, coach_id: &str) -> Result<(), AppError> {
        if !self.repo.deactivate(id, coach_id, Utc::now()).await? {
            return Err(AppError::NotFound("Slot not found or not authorized".into()));
        }
        info!("Deactivated availability template {}", id);
        Ok(())
    }

    async fn owned(&self, id: &str, coach_id: &str) -> Result<AvailabilityTemplate, AppError> {
        self.repo.find_by_id(id).await?
            .filter(|t| t.coach_id == coach_id && t.is_active)
            .ok_or(AppError::NotFound("Slot not found or not authorized".into()))
    }
}
