use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub coach_id: String,
    pub parent_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub position: Option<String>,
    pub preferred_foot: Option<String>,
    pub height_cm: Option<i32>,
    pub weight_kg: Option<i32>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

pub struct NewPlayerParams {
    pub coach_id: String,
    pub parent_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub position: Option<String>,
    pub preferred_foot: Option<String>,
    pub height_cm: Option<i32>,
    pub weight_kg: Option<i32>,
    pub notes: Option<String>,
}

impl Player {
    pub fn new(params: NewPlayerParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            coach_id: params.coach_id,
            parent_id: params.parent_id,
            first_name: params.first_name,
            last_name: params.last_name,
            date_of_birth: params.date_of_birth,
            position: params.position,
            preferred_foot: params.preferred_foot,
            height_cm: params.height_cm,
            weight_kg: params.weight_kg,
            notes: params.notes,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}
