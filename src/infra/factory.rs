use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::{info, warn};
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::domain::ports::Notifier;
use crate::error::AppError;
use crate::state::{AppState, Repositories};
use crate::infra::notify::{http_mail_notifier::{load_templates, HttpMailNotifier}, log_notifier::LogNotifier};
use crate::infra::repositories::{
    postgres_booking_repo::PostgresBookingRepo, postgres_player_repo::PostgresPlayerRepo,
    postgres_profile_repo::PostgresProfileRepo, postgres_report_repo::PostgresReportRepo,
    postgres_session_repo::PostgresSessionRepo, postgres_template_repo::PostgresTemplateRepo,
    sqlite_booking_repo::SqliteBookingRepo, sqlite_player_repo::SqlitePlayerRepo,
    sqlite_profile_repo::SqliteProfileRepo, sqlite_report_repo::SqliteReportRepo,
    sqlite_session_repo::SqliteSessionRepo, sqlite_template_repo::SqliteTemplateRepo,
};

pub async fn bootstrap_state(config: &Config) -> Result<AppState, AppError> {
    let repos = connect_repositories(&config.database_url).await?;

    let notifier: Arc<dyn Notifier> = match &config.mail_service_url {
        Some(url) => {
            info!("Sending notices through mail relay at {}", url);
            Arc::new(HttpMailNotifier::new(
                url.clone(),
                config.mail_service_token.clone(),
                Arc::new(load_templates()?),
            ))
        }
        None => {
            warn!("MAIL_SERVICE_URL not set, notices will only be logged");
            Arc::new(LogNotifier)
        }
    };

    Ok(AppState::new(config.clone(), repos, notifier))
}

/// `postgres://` and `postgresql://` URLs select Postgres; anything else is treated as SQLite.
pub async fn connect_repositories(database_url: &str) -> Result<Repositories, AppError> {
    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");
        let pool = connect_postgres(database_url).await?;

        Ok(Repositories {
            profiles: Arc::new(PostgresProfileRepo::new(pool.clone())),
            players: Arc::new(PostgresPlayerRepo::new(pool.clone())),
            templates: Arc::new(PostgresTemplateRepo::new(pool.clone())),
            sessions: Arc::new(PostgresSessionRepo::new(pool.clone())),
            bookings: Arc::new(PostgresBookingRepo::new(pool.clone())),
            reports: Arc::new(PostgresReportRepo::new(pool)),
        })
    } else {
        info!("Initializing SQLite connection with WAL Mode...");
        let pool = connect_sqlite(database_url).await?;

        Ok(Repositories {
            profiles: Arc::new(SqliteProfileRepo::new(pool.clone())),
            players: Arc::new(SqlitePlayerRepo::new(pool.clone())),
            templates: Arc::new(SqliteTemplateRepo::new(pool.clone())),
            sessions: Arc::new(SqliteSessionRepo::new(pool.clone())),
            bookings: Arc::new(SqliteBookingRepo::new(pool.clone())),
            reports: Arc::new(SqliteReportRepo::new(pool)),
        })
    }
}

pub async fn connect_postgres(database_url: &str) -> Result<PgPool, AppError> {
    let opts: PgConnectOptions = database_url.parse().map_err(AppError::Database)?;
    let opts = opts.log_statements(LevelFilter::Debug)
        .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect_with(opts)
        .await
        .map_err(AppError::Database)?;

    sqlx::migrate!("./migrations/postgres")
        .run(&pool)
        .await
        .map_err(|e| AppError::InternalWithMsg(format!("Failed to run Postgres migrations: {}", e)))?;

    Ok(pool)
}

pub async fn connect_sqlite(database_url: &str) -> Result<SqlitePool, AppError> {
    let opts = SqliteConnectOptions::from_str(database_url)
        .map_err(AppError::Database)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .foreign_keys(true)
        .log_statements(LevelFilter::Debug)
        .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await
        .map_err(AppError::Database)?;

    sqlx::migrate!("./migrations/sqlite")
        .run(&pool)
        .await
        .map_err(|e| AppError::InternalWithMsg(format!("Failed to run SQLite migrations: {}", e)))?;

    Ok(pool)
}
