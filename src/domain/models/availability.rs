use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// A coach's weekly time slot, expanded into concrete sessions by the generator.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityTemplate {
    pub id: String,
    pub coach_id: String,
    /// 0 = Sunday ... 6 = Saturday
    pub day_of_week: i32,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub is_recurring: bool,
    pub specific_date: Option<NaiveDate>,
    #[serde(rename = "maxPlayers")]
    pub max_capacity: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewTemplateParams {
    pub coach_id: String,
    pub day_of_week: i32,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub is_recurring: bool,
    pub specific_date: Option<NaiveDate>,
    pub max_capacity: i32,
}

impl AvailabilityTemplate {
    pub fn new(params: NewTemplateParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            coach_id: params.coach_id,
            day_of_week: params.day_of_week,
            start_time: params.start_time,
            end_time: params.end_time,
            location: params.location,
            is_recurring: params.is_recurring,
            specific_date: params.specific_date,
            max_capacity: params.max_capacity,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}
