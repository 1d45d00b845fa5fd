use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use crate::domain::models::session::UnknownVariant;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    NoShow,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Cancelled => "CANCELLED",
            BookingStatus::Completed => "COMPLETED",
            BookingStatus::NoShow => "NO_SHOW",
        }
    }

    pub fn is_cancellable(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }
}

impl TryFrom<String> for BookingStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "PENDING" => Ok(BookingStatus::Pending),
            "CONFIRMED" => Ok(BookingStatus::Confirmed),
            "CANCELLED" => Ok(BookingStatus::Cancelled),
            "COMPLETED" => Ok(BookingStatus::Completed),
            "NO_SHOW" => Ok(BookingStatus::NoShow),
            _ => Err(UnknownVariant { kind: "booking status", value }),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub session_id: String,
    pub player_id: String,
    pub parent_id: String,
    #[sqlx(try_from = "String")]
    pub status: BookingStatus,
    pub notes: Option<String>,
    pub requested_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Booking {
    pub fn new(session_id: String, player_id: String, parent_id: String, notes: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            session_id,
            player_id,
            parent_id,
            status: BookingStatus::Pending,
            notes,
            requested_at: Utc::now(),
            confirmed_at: None,
            cancelled_at: None,
        }
    }
}

/// Booking joined with the player, session and parent contact it refers to.
#[derive(Debug, Serialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BookingView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub booking: Booking,
    pub coach_id: String,
    pub player_first_name: String,
    pub player_last_name: String,
    pub session_date: NaiveDate,
    pub session_start_time: String,
    pub session_end_time: String,
    pub session_location: String,
    pub parent_name: String,
    pub parent_email: Option<String>,
    pub parent_phone: Option<String>,
}

impl BookingView {
    pub fn player_name(&self) -> String {
        format!("{} {}", self.player_first_name, self.player_last_name)
    }
}

#[derive(Debug, Default, Clone)]
pub struct ParentBookingFilter {
    pub status: Option<BookingStatus>,
    /// Only bookings whose session is dated on or after this day.
    pub from_date: Option<NaiveDate>,
}
