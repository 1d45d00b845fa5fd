use serde::Serialize;
use chrono::NaiveDate;
use crate::domain::models::booking::BookingView;

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoticeKind {
    BookingRequested,
    BookingConfirmed,
    BookingCancelled,
    SessionCancelled,
}

impl NoticeKind {
    pub fn template_name(&self) -> &'static str {
        match self {
            NoticeKind::BookingRequested => "booking_requested.html",
            NoticeKind::BookingConfirmed => "booking_confirmed.html",
            NoticeKind::BookingCancelled => "booking_cancelled.html",
            NoticeKind::SessionCancelled => "session_cancelled.html",
        }
    }
}

/// Everything a notifier needs to tell a parent about one booking.
#[derive(Debug, Serialize, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub booking_id: String,
    pub recipient_name: String,
    pub recipient_email: Option<String>,
    pub player_name: String,
    pub session_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
}

impl Notice {
    pub fn for_booking(kind: NoticeKind, view: &BookingView) -> Self {
        Self {
            kind,
            booking_id: view.booking.id.clone(),
            recipient_name: view.parent_name.clone(),
            recipient_email: view.parent_email.clone(),
            player_name: view.player_name(),
            session_date: view.session_date,
            start_time: view.session_start_time.clone(),
            end_time: view.session_end_time.clone(),
            location: view.session_location.clone(),
        }
    }
}
