use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Scheduled => "SCHEDULED",
            SessionStatus::InProgress => "IN_PROGRESS",
            SessionStatus::Completed => "COMPLETED",
            SessionStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Cancelled)
    }

    /// scheduled -> in-progress -> completed, and any non-terminal state -> cancelled.
    pub fn can_transition_to(&self, next: SessionStatus) -> bool {
        matches!(
            (self, next),
            (SessionStatus::Scheduled, SessionStatus::InProgress)
                | (SessionStatus::InProgress, SessionStatus::Completed)
                | (SessionStatus::Scheduled, SessionStatus::Cancelled)
                | (SessionStatus::InProgress, SessionStatus::Cancelled)
        )
    }
}

impl TryFrom<String> for SessionStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "SCHEDULED" => Ok(SessionStatus::Scheduled),
            "IN_PROGRESS" => Ok(SessionStatus::InProgress),
            "COMPLETED" => Ok(SessionStatus::Completed),
            "CANCELLED" => Ok(SessionStatus::Cancelled),
            _ => Err(UnknownVariant { kind: "session status", value }),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionType {
    Individual,
    Group,
    Assessment,
    Trial,
}

impl SessionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionType::Individual => "INDIVIDUAL",
            SessionType::Group => "GROUP",
            SessionType::Assessment => "ASSESSMENT",
            SessionType::Trial => "TRIAL",
        }
    }

    pub fn for_capacity(max_capacity: i32) -> Self {
        if max_capacity > 1 { SessionType::Group } else { SessionType::Individual }
    }
}

impl TryFrom<String> for SessionType {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "INDIVIDUAL" => Ok(SessionType::Individual),
            "GROUP" => Ok(SessionType::Group),
            "ASSESSMENT" => Ok(SessionType::Assessment),
            "TRIAL" => Ok(SessionType::Trial),
            _ => Err(UnknownVariant { kind: "session type", value }),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub coach_id: String,
    pub template_id: Option<String>,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    #[serde(rename = "type")]
    #[sqlx(try_from = "String")]
    pub session_type: SessionType,
    #[sqlx(try_from = "String")]
    pub status: SessionStatus,
    pub max_capacity: i32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewSessionParams {
    pub coach_id: String,
    pub template_id: Option<String>,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub session_type: SessionType,
    pub max_capacity: i32,
    pub notes: Option<String>,
}

impl Session {
    pub fn new(params: NewSessionParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            coach_id: params.coach_id,
            template_id: params.template_id,
            date: params.date,
            start_time: params.start_time,
            end_time: params.end_time,
            location: params.location,
            session_type: params.session_type,
            status: SessionStatus::Scheduled,
            max_capacity: params.max_capacity,
            notes: params.notes,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct SessionFilter {
    pub status: Option<SessionStatus>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<i64>,
}

#[derive(Debug, Default, Clone)]
pub struct AvailabilityFilter {
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
    pub location: Option<String>,
}

/// Session together with its computed count of non-cancelled bookings.
#[derive(Debug, Serialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AvailableSession {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub session: Session,
    pub booked_count: i64,
}
