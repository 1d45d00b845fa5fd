use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Coach {
    pub id: String,
    pub user_id: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

impl Coach {
    pub fn new(user_id: String, display_name: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            display_name,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Parent {
    pub id: String,
    pub user_id: String,
    pub display_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Parent {
    pub fn new(user_id: String, display_name: String, email: Option<String>, phone: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            display_name,
            email,
            phone,
            created_at: Utc::now(),
        }
    }
}
