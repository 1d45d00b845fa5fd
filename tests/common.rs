#![allow(dead_code)]

use coaching_backend::{
    api::router::create_router,
    config::Config,
    domain::{
        models::{auth::{Claims, Role}, notice::{Notice, NoticeKind}},
        ports::Notifier,
    },
    error::AppError,
    infra::factory::connect_repositories,
    state::AppState,
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{Duration, NaiveDate, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_SECRET: &str = "test-secret";
pub const TEST_ISSUER: &str = "test-issuer";
pub const TEST_AUDIENCE: &str = "coaching-api";

#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn of_kind(&self, kind: NoticeKind) -> Vec<Notice> {
        self.notices().into_iter().filter(|n| n.kind == kind).collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notice: &Notice) -> Result<(), AppError> {
        self.notices.lock().unwrap().push(notice.clone());
        Ok(())
    }
}

pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn notify(&self, _notice: &Notice) -> Result<(), AppError> {
        Err(AppError::InternalWithMsg("mail relay unreachable".into()))
    }
}

/// A registered coach or parent: their bearer token and profile id.
#[derive(Clone)]
pub struct TestUser {
    pub token: String,
    pub profile_id: String,
}

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub notices: Arc<RecordingNotifier>,
    db_filename: Option<String>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);
        let notices = Arc::new(RecordingNotifier::default());
        Self::build(db_url, Some(db_filename), notices.clone(), notices).await
    }

    pub async fn with_notifier(notifier: Arc<dyn Notifier>) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);
        Self::build(db_url, Some(db_filename), Arc::new(RecordingNotifier::default()), notifier).await
    }

    /// Runs against an existing Postgres database. Ids are random, so tests never collide.
    pub async fn with_postgres(database_url: &str) -> Self {
        let notices = Arc::new(RecordingNotifier::default());
        Self::build(database_url.to_string(), None, notices.clone(), notices).await
    }

    async fn build(
        db_url: String,
        db_filename: Option<String>,
        notices: Arc<RecordingNotifier>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            jwt_secret: TEST_SECRET.to_string(),
            auth_issuer: TEST_ISSUER.to_string(),
            auth_audience: TEST_AUDIENCE.to_string(),
            mail_service_url: None,
            mail_service_token: String::new(),
            default_weeks_ahead: 4,
        };

        let repos = connect_repositories(&db_url).await.expect("Failed to set up test db");
        let state = Arc::new(AppState::new(config, repos, notifier));
        let router = create_router(state.clone());

        Self { router, state, notices, db_filename }
    }

    /// Connection string for the SQLite file behind this app, for poking at the schema directly.
    pub fn sqlite_url(&self) -> Option<String> {
        self.db_filename.as_ref().map(|file| format!("sqlite://{}", file))
    }

    pub fn token(&self, user_id: &str, role: Role) -> String {
        mint_token(user_id, role, TEST_SECRET, TEST_AUDIENCE)
    }

    pub async fn request(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        send(self.router.clone(), method, uri, token, body).await
    }

    pub async fn get(&self, uri: &str, user: &TestUser) -> (StatusCode, Value) {
        self.request("GET", uri, Some(&user.token), None).await
    }

    pub async fn post(&self, uri: &str, user: &TestUser, body: Value) -> (StatusCode, Value) {
        self.request("POST", uri, Some(&user.token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, user: &TestUser, body: Value) -> (StatusCode, Value) {
        self.request("PUT", uri, Some(&user.token), Some(body)).await
    }

    async fn register(&self, role: Role, body: Value) -> TestUser {
        let token = self.token(&Uuid::new_v4().to_string(), role);
        let (status, profile) = self.request("POST", "/api/v1/profiles", Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "profile registration failed: {}", profile);
        TestUser {
            token,
            profile_id: profile["id"].as_str().unwrap().to_string(),
        }
    }

    pub async fn coach(&self) -> TestUser {
        self.register(Role::Coach, json!({ "displayName": "Coach Carter" })).await
    }

    pub async fn parent(&self, name: &str) -> TestUser {
        let email = format!("{}@example.com", name.to_lowercase());
        self.register(Role::Parent, json!({ "displayName": name, "email": email, "phone": "555-0100" })).await
    }

    pub fn admin(&self) -> TestUser {
        TestUser {
            token: self.token(&Uuid::new_v4().to_string(), Role::Admin),
            profile_id: String::new(),
        }
    }

    pub async fn player(&self, coach: &TestUser, parent: &TestUser, first_name: &str) -> String {
        let (status, player) = self.post("/api/v1/players", coach, json!({
            "firstName": first_name,
            "lastName": "Smith",
            "parentId": parent.profile_id,
        })).await;
        assert_eq!(status, StatusCode::CREATED, "player creation failed: {}", player);
        player["id"].as_str().unwrap().to_string()
    }

    pub async fn session(&self, coach: &TestUser, date: NaiveDate, start: &str, capacity: i32) -> String {
        let end = format!("{:02}{}", start[..2].parse::<u32>().unwrap() + 1, &start[2..]);
        let (status, session) = self.post("/api/v1/sessions", coach, json!({
            "date": date,
            "startTime": start,
            "endTime": end,
            "location": "North Field",
            "maxCapacity": capacity,
        })).await;
        assert_eq!(status, StatusCode::CREATED, "session creation failed: {}", session);
        session["id"].as_str().unwrap().to_string()
    }

    pub async fn book(&self, parent: &TestUser, session_id: &str, player_id: &str) -> (StatusCode, Value) {
        self.post("/api/v1/bookings", parent, json!({ "sessionId": session_id, "playerId": player_id })).await
    }

    /// Notices are sent from spawned tasks, so give them a moment to land.
    pub async fn wait_for_notices(&self, count: usize) -> Vec<Notice> {
        for _ in 0..100 {
            let notices = self.notices.notices();
            if notices.len() >= count {
                return notices;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        self.notices.notices()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(file) = &self.db_filename {
            let _ = std::fs::remove_file(file);
            let _ = std::fs::remove_file(format!("{}-wal", file));
            let _ = std::fs::remove_file(format!("{}-shm", file));
        }
    }
}

pub fn mint_token(user_id: &str, role: Role, secret: &str, audience: &str) -> String {
    let now = Utc::now().timestamp() as usize;
    let claims = Claims {
        iss: TEST_ISSUER.to_string(),
        sub: user_id.to_string(),
        aud: audience.to_string(),
        exp: now + 3600,
        iat: now,
        role,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
}

pub async fn send(router: Router, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
    (status, value)
}

pub fn days_from_today(days: i64) -> NaiveDate {
    Utc::now().date_naive() + Duration::days(days)
}
