use std::sync::Arc;
use crate::domain::models::notice::{Notice, NoticeKind};
use crate::domain::ports::Notifier;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tera::{Context, Tera};
use tracing::{debug, error};

/// Renders notices with tera and hands them to the mail relay over HTTP.
pub struct HttpMailNotifier {
    client: Client,
    api_url: String,
    api_key: String,
    templates: Arc<Tera>,
}

impl HttpMailNotifier {
    pub fn new(api_url: String, api_key: String, templates: Arc<Tera>) -> Self {
        Self {
            client: Client::new(),
            api_url,
            api_key,
            templates,
        }
    }

    fn subject(notice: &Notice) -> String {
        match notice.kind {
            NoticeKind::BookingRequested => format!("Booking request received for {}", notice.player_name),
            NoticeKind::BookingConfirmed => format!("Booking confirmed for {}", notice.player_name),
            NoticeKind::BookingCancelled => format!("Booking cancelled for {}", notice.player_name),
            NoticeKind::SessionCancelled => format!("Session on {} has been cancelled", notice.session_date),
        }
    }
}

#[derive(Serialize)]
struct MailPayload {
    from_alias: String,
    to_addr: String,
    subject: String,
    html_body: String,
}

#[async_trait]
impl Notifier for HttpMailNotifier {
    async fn notify(&self, notice: &Notice) -> Result<(), AppError> {
        let Some(recipient) = notice.recipient_email.as_deref() else {
            debug!("Parent of booking {} has no email, skipping {:?}", notice.booking_id, notice.kind);
            return Ok(());
        };

        let context = Context::from_serialize(notice)
            .map_err(|e| AppError::InternalWithMsg(format!("Notice context error: {}", e)))?;
        let html_body = self.templates.render(notice.kind.template_name(), &context)
            .map_err(|e| AppError::InternalWithMsg(format!("Template render error: {}", e)))?;

        let payload = MailPayload {
            from_alias: "default".to_string(),
            to_addr: recipient.to_string(),
            subject: Self::subject(notice),
            html_body,
        };

        let res = self.client.post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Mail service connection error: {}", e);
                error!("{}", msg);
                AppError::InternalWithMsg(msg)
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            let msg = format!("Mail service failed. Status: {}, Body: {}", status, text);
            error!("{}", msg);
            return Err(AppError::InternalWithMsg(msg));
        }

        debug!("Sent {:?} notice for booking {}", notice.kind, notice.booking_id);
        Ok(())
    }
}

/// Loads the notice templates shipped in `templates/`.
pub fn load_templates() -> Result<Tera, AppError> {
    let mut tera = Tera::default();
    for (name, source) in [
        ("booking_requested.html", include_str!("../../../templates/booking_requested.html")),
        ("booking_confirmed.html", include_str!("../../../templates/booking_confirmed.html")),
        ("booking_cancelled.html", include_str!("../../../templates/booking_cancelled.html")),
        ("session_cancelled.html", include_str!("../../../templates/session_cancelled.html")),
    ] {
        tera.add_raw_template(name, source)
            .map_err(|e| AppError::InternalWithMsg(format!("Failed to load template {}: {}", name, e)))?;
    }
    Ok(tera)
}
