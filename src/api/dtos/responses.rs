use crate::domain::models::session::{AvailableSession, Session};
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// `GET /sessions` answers coaches with their own sessions and parents with bookable ones.
#[derive(Serialize)]
#[serde(untagged)]
pub enum SessionListing {
    Own(Vec<Session>),
    Available(Vec<AvailableSession>),
}
