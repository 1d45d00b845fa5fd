mod common;

use axum::http::StatusCode;
use chrono::{Datelike, NaiveDate, Weekday};
use common::{days_from_today, TestApp, TestUser};
use serde_json::json;
use tokio::task::JoinSet;

async fn slot(app: &TestApp, coach: &TestUser, day: i32, start: &str, end: &str, players: i32) -> String {
    let (status, slot) = app.post("/api/v1/sessions/slots", coach, json!({
        "dayOfWeek": day, "startTime": start, "endTime": end, "location": "North Field", "maxPlayers": players
    })).await;
    assert_eq!(status, StatusCode::CREATED);
    slot["id"].as_str().unwrap().to_string()
}

fn monday() -> NaiveDate {
    // 2026-10-19 is a Monday
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

#[tokio::test]
async fn test_monday_template_two_weeks_from_a_monday() {
    let app = TestApp::new().await;
    let coach = app.coach().await;
    slot(&app, &coach, 1, "16:00", "17:00", 1).await;

    let result = app.state.generator.generate(&coach.profile_id, 2, monday()).await.unwrap();

    assert_eq!(result.created, 2);
    let dates: Vec<NaiveDate> = result.sessions.iter().map(|s| s.date).collect();
    assert_eq!(dates, vec![monday(), NaiveDate::from_ymd_opt(2026, 10, 26).unwrap()]);
    for session in &result.sessions {
        assert_eq!(session.date.weekday(), Weekday::Mon);
        assert_eq!(session.max_capacity, 1);
        assert_eq!(session.session_type.as_str(), "INDIVIDUAL");
        assert_eq!(session.status.as_str(), "SCHEDULED");
        assert_eq!(session.start_time, "16:00");
    }
}

#[tokio::test]
async fn test_group_type_follows_template_capacity() {
    let app = TestApp::new().await;
    let coach = app.coach().await;
    slot(&app, &coach, 3, "10:00", "11:30", 8).await;

    let result = app.state.generator.generate(&coach.profile_id, 1, monday()).await.unwrap();
    assert_eq!(result.created, 1);
    assert_eq!(result.sessions[0].session_type.as_str(), "GROUP");
    assert_eq!(result.sessions[0].max_capacity, 8);
}

#[tokio::test]
async fn test_zero_horizon_creates_nothing() {
    let app = TestApp::new().await;
    let coach = app.coach().await;
    slot(&app, &coach, 1, "16:00", "17:00", 1).await;

    let (status, result) = app.post("/api/v1/sessions/generate", &coach, json!({ "weeksAhead": 0 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["created"], 0);
    assert!(result["sessions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_rerun_creates_nothing_new() {
    let app = TestApp::new().await;
    let coach = app.coach().await;
    slot(&app, &coach, 1, "16:00", "17:00", 1).await;
    slot(&app, &coach, 4, "18:00", "19:00", 6).await;

    let (status, first) = app.post("/api/v1/sessions/generate", &coach, json!({ "weeksAhead": 4 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["created"], 8);

    let (status, second) = app.post("/api/v1/sessions/generate", &coach, json!({ "weeksAhead": 4 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["created"], 0);

    let (_, sessions) = app.get("/api/v1/sessions", &coach).await;
    assert_eq!(sessions.as_array().unwrap().len(), 8);
}

#[tokio::test]
async fn test_default_horizon_is_four_weeks() {
    let app = TestApp::new().await;
    let coach = app.coach().await;
    slot(&app, &coach, 2, "16:00", "17:00", 1).await;

    let (status, result) = app.post("/api/v1/sessions/generate", &coach, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["created"], 4);
}

#[tokio::test]
async fn test_longer_horizon_fills_only_the_gap() {
    let app = TestApp::new().await;
    let coach = app.coach().await;
    slot(&app, &coach, 1, "16:00", "17:00", 1).await;

    let first = app.state.generator.generate(&coach.profile_id, 2, monday()).await.unwrap();
    assert_eq!(first.created, 2);

    let second = app.state.generator.generate(&coach.profile_id, 5, monday()).await.unwrap();
    assert_eq!(second.created, 3);
    assert_eq!(second.sessions[0].date, NaiveDate::from_ymd_opt(2026, 11, 2).unwrap());
}

#[tokio::test]
async fn test_manual_session_blocks_generated_occurrence() {
    let app = TestApp::new().await;
    let coach = app.coach().await;
    slot(&app, &coach, 1, "16:00", "17:00", 1).await;
    app.session(&coach, monday(), "16:00", 3).await;

    let result = app.state.generator.generate(&coach.profile_id, 2, monday()).await.unwrap();
    assert_eq!(result.created, 1);
}

#[tokio::test]
async fn test_cancelled_session_is_not_regenerated() {
    let app = TestApp::new().await;
    let coach = app.coach().await;
    slot(&app, &coach, 1, "16:00", "17:00", 1).await;

    let first = app.state.generator.generate(&coach.profile_id, 1, monday()).await.unwrap();
    let id = &first.sessions[0].id;
    let (status, _) = app.post(&format!("/api/v1/sessions/{}/cancel", id), &coach, json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let again = app.state.generator.generate(&coach.profile_id, 1, monday()).await.unwrap();
    assert_eq!(again.created, 0);
}

#[tokio::test]
async fn test_inactive_and_one_off_templates_are_skipped() {
    let app = TestApp::new().await;
    let coach = app.coach().await;
    let removed = slot(&app, &coach, 1, "16:00", "17:00", 1).await;
    app.request("DELETE", &format!("/api/v1/sessions/slots/{}", removed), Some(&coach.token), None).await;

    let (status, _) = app.post("/api/v1/sessions/slots", &coach, json!({
        "dayOfWeek": 2, "startTime": "16:00", "endTime": "17:00", "location": "Gym",
        "isRecurring": false, "specificDate": "2026-10-20"
    })).await;
    assert_eq!(status, StatusCode::CREATED);

    let result = app.state.generator.generate(&coach.profile_id, 4, monday()).await.unwrap();
    assert_eq!(result.created, 0);
}

#[tokio::test]
async fn test_horizon_over_a_year_is_rejected() {
    let app = TestApp::new().await;
    let coach = app.coach().await;

    let (status, err) = app.post("/api/v1/sessions/generate", &coach, json!({ "weeksAhead": 53 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["kind"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_generation_only_touches_own_templates() {
    let app = TestApp::new().await;
    let coach = app.coach().await;
    let other = app.coach().await;
    slot(&app, &other, 1, "16:00", "17:00", 1).await;

    let result = app.state.generator.generate(&coach.profile_id, 4, monday()).await.unwrap();
    assert_eq!(result.created, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_runs_never_duplicate() {
    let app = TestApp::new().await;
    let coach = app.coach().await;
    slot(&app, &coach, 1, "16:00", "17:00", 1).await;
    slot(&app, &coach, 5, "09:00", "10:00", 4).await;

    let mut runs = JoinSet::new();
    for _ in 0..6 {
        let generator = app.state.generator.clone();
        let coach_id = coach.profile_id.clone();
        runs.spawn(async move { generator.generate(&coach_id, 3, days_from_today(0)).await.unwrap().created });
    }

    let mut total = 0;
    while let Some(created) = runs.join_next().await {
        total += created.unwrap();
    }

    assert_eq!(total, 6);
    let (_, sessions) = app.get("/api/v1/sessions", &coach).await;
    assert_eq!(sessions.as_array().unwrap().len(), 6);
}
