use std::sync::Arc;
use crate::domain::models::{booking::{Booking, BookingView}, notice::{Notice, NoticeKind}};
use crate::domain::ports::{BookingRepository, Notifier};
use tracing::{info_span, warn, Instrument};

/// Fire-and-forget delivery of booking notices. Runs after the state change has committed;
/// a failed delivery is logged and never reported back to the caller.
#[derive(Clone)]
pub struct NotificationDispatcher {
    bookings: Arc<dyn BookingRepository>,
    notifier: Arc<dyn Notifier>,
}

impl NotificationDispatcher {
    pub fn new(bookings: Arc<dyn BookingRepository>, notifier: Arc<dyn Notifier>) -> Self {
        Self { bookings, notifier }
    }

    pub fn booking_event(&self, kind: NoticeKind, booking: &Booking) {
        let dispatcher = self.clone();
        let booking_id = booking.id.clone();
        let span = info_span!("notification", kind = ?kind, booking_id = %booking_id);

        tokio::spawn(
            async move {
                match dispatcher.bookings.find_view(&booking_id).await {
                    Ok(Some(view)) => dispatcher.deliver(kind, &view).await,
                    Ok(None) => warn!("Booking vanished before notice could be sent"),
                    Err(e) => warn!("Failed to load booking for notice: {}", e),
                }
            }
            .instrument(span),
        );
    }

    pub fn session_cancelled(&self, session_id: &str, affected: &[Booking]) {
        if affected.is_empty() {
            return;
        }
        let dispatcher = self.clone();
        let affected_ids: Vec<String> = affected.iter().map(|b| b.id.clone()).collect();
        let span = info_span!("notification", kind = ?NoticeKind::SessionCancelled, session_id = %session_id);
        let session_id = session_id.to_string();

        tokio::spawn(
            async move {
                let views = match dispatcher.bookings.list_for_session(&session_id).await {
                    Ok(views) => views,
                    Err(e) => {
                        warn!("Failed to load bookings for session cancellation notices: {}", e);
                        return;
                    }
                };
                for view in views.iter().filter(|v| affected_ids.contains(&v.booking.id)) {
                    dispatcher.deliver(NoticeKind::SessionCancelled, view).await;
                }
            }
            .instrument(span),
        );
    }

    async fn deliver(&self, kind: NoticeKind, view: &BookingView) {
        let notice = Notice::for_booking(kind, view);
        if let Err(e) = self.notifier.notify(&notice).await {
            warn!("Notification {:?} for booking {} failed: {}", kind, notice.booking_id, e);
        }
    }
}
