use crate::domain::models::notice::Notice;
use crate::domain::ports::Notifier;
use crate::error::AppError;
use async_trait::async_trait;
use tracing::info;

/// Used when no mail relay is configured.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notice: &Notice) -> Result<(), AppError> {
        info!(
            kind = ?notice.kind,
            booking_id = %notice.booking_id,
            recipient = %notice.recipient_name,
            "Notice for {} on {} {}-{} at {}",
            notice.player_name, notice.session_date, notice.start_time, notice.end_time, notice.location
        );
        Ok(())
    }
}
