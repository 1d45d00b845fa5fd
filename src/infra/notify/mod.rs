pub mod http_mail_notifier;
pub mod log_notifier;
