use std::env;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{0} is not a valid value: {1}")]
    Invalid(&'static str, String),
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub auth_issuer: String,
    pub auth_audience: String,
    pub mail_service_url: Option<String>,
    pub mail_service_token: String,
    pub default_weeks_ahead: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            port: parsed("PORT", 3000)?,
            jwt_secret: required("JWT_SECRET")?,
            auth_issuer: env::var("AUTH_ISSUER").unwrap_or_else(|_| "https://identity.coaching.local".to_string()),
            auth_audience: env::var("AUTH_AUDIENCE").unwrap_or_else(|_| "coaching-api".to_string()),
            mail_service_url: env::var("MAIL_SERVICE_URL").ok().filter(|url| !url.is_empty()),
            mail_service_token: env::var("MAIL_SERVICE_TOKEN").unwrap_or_default(),
            default_weeks_ahead: parsed("DEFAULT_WEEKS_AHEAD", 4)?,
        })
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::Missing(key))
}

fn parsed<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid(key, raw)),
        Err(_) => Ok(default),
    }
}
