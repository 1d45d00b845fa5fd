use crate::domain::models::{booking::BookingStatus, session::{SessionStatus, SessionType}};
use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSlotRequest {
    pub day_of_week: i32,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub is_recurring: Option<bool>,
    pub specific_date: Option<NaiveDate>,
    pub max_players: Option<i32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSlotRequest {
    pub day_of_week: Option<i32>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub location: Option<String>,
    pub is_recurring: Option<bool>,
    pub specific_date: Option<NaiveDate>,
    pub max_players: Option<i32>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSessionsRequest {
    pub weeks_ahead: Option<u32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    #[serde(rename = "type")]
    pub session_type: Option<SessionType>,
    #[serde(alias = "maxPlayers")]
    pub max_capacity: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSessionRequest {
    pub date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub session_type: Option<SessionType>,
    #[serde(alias = "maxPlayers")]
    pub max_capacity: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateSessionStatusRequest {
    pub status: SessionStatus,
}

/// Coaches filter their own sessions by status/from/to/limit; parents browse by from/to/location.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionQuery {
    pub status: Option<SessionStatus>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub location: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub session_id: String,
    pub player_id: String,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct BookingQuery {
    pub status: Option<BookingStatus>,
    pub upcoming: Option<bool>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlayerRequest {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub position: Option<String>,
    pub preferred_foot: Option<String>,
    pub height_cm: Option<i32>,
    pub weight_kg: Option<i32>,
    pub notes: Option<String>,
    pub parent_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerQuery {
    pub include_inactive: Option<bool>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignParentRequest {
    pub parent_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterProfileRequest {
    pub display_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportRequest {
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

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReportRequest {
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
