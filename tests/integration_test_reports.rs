mod common;

use axum::http::StatusCode;
use common::{days_from_today, TestApp, TestUser};
use serde_json::json;

struct Fixture {
    app: TestApp,
    coach: TestUser,
    parent: TestUser,
    session_id: String,
    player_id: String,
}

async fn fixture() -> Fixture {
    let app = TestApp::new().await;
    let coach = app.coach().await;
    let parent = app.parent("Dana").await;
    let player_id = app.player(&coach, &parent, "Alex").await;
    let session_id = app.session(&coach, days_from_today(1), "10:00", 4).await;
    Fixture { app, coach, parent, session_id, player_id }
}

#[tokio::test]
async fn test_report_defaults() {
    let f = fixture().await;

    let (status, report) = f.app.post("/api/v1/reports", &f.coach, json!({
        "sessionId": f.session_id,
        "playerId": f.player_id,
        "highlights": "Great first touch",
    })).await;

    assert_eq!(status, StatusCode::CREATED, "{}", report);
    assert_eq!(report["coachId"], f.coach.profile_id.as_str());
    assert_eq!(report["effortRating"], 5);
    assert_eq!(report["focusRating"], 5);
    assert_eq!(report["technicalRating"], 5);
    assert_eq!(report["attendance"], true);
    assert_eq!(report["drillsCompleted"], json!([]));
    assert_eq!(report["highlights"], "Great first touch");
}

#[tokio::test]
async fn test_one_report_per_player_and_session() {
    let f = fixture().await;
    let body = json!({ "sessionId": f.session_id, "playerId": f.player_id });

    let (status, _) = f.app.post("/api/v1/reports", &f.coach, body.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, err) = f.app.post("/api/v1/reports", &f.coach, body).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["kind"], "CONFLICT");
}

#[tokio::test]
async fn test_create_rejects_bad_input() {
    let f = fixture().await;

    let (status, err) = f.app.post("/api/v1/reports", &f.coach, json!({
        "sessionId": f.session_id, "playerId": f.player_id, "effortRating": 11,
    })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["kind"], "VALIDATION_ERROR");

    let (status, _) = f.app.post("/api/v1/reports", &f.coach, json!({
        "sessionId": "missing", "playerId": f.player_id,
    })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let other = f.app.coach().await;
    let (status, err) = f.app.post("/api/v1/reports", &other, json!({
        "sessionId": f.session_id, "playerId": f.player_id,
    })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(err["kind"], "FORBIDDEN");

    let (status, _) = f.app.post("/api/v1/reports", &f.parent, json!({
        "sessionId": f.session_id, "playerId": f.player_id,
    })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_update_only_touches_sent_fields() {
    let f = fixture().await;
    let (_, report) = f.app.post("/api/v1/reports", &f.coach, json!({
        "sessionId": f.session_id,
        "playerId": f.player_id,
        "highlights": "Strong passing",
        "focusAreas": ["weak foot"],
    })).await;
    let uri = format!("/api/v1/reports/{}", report["id"].as_str().unwrap());

    let (status, updated) = f.app.put(&uri, &f.coach, json!({ "effortRating": 9, "attendance": false })).await;
    assert_eq!(status, StatusCode::OK, "{}", updated);
    assert_eq!(updated["effortRating"], 9);
    assert_eq!(updated["attendance"], false);
    assert_eq!(updated["highlights"], "Strong passing");
    assert_eq!(updated["focusAreas"], json!(["weak foot"]));

    let (status, _) = f.app.put(&uri, &f.coach, json!({ "technicalRating": 0 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let other = f.app.coach().await;
    let (status, _) = f.app.put(&uri, &other, json!({ "effortRating": 1 })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_session_reports_visibility() {
    let f = fixture().await;
    let second = f.app.player(&f.coach, &f.parent, "Blake").await;
    for player in [&f.player_id, &second] {
        let (status, _) = f.app.post("/api/v1/reports", &f.coach, json!({
            "sessionId": f.session_id, "playerId": player,
        })).await;
        assert_eq!(status, StatusCode::CREATED);
    }
    let uri = format!("/api/v1/reports/session/{}", f.session_id);

    let (status, reports) = f.app.get(&uri, &f.coach).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = reports.as_array().unwrap().iter().map(|r| r["playerFirstName"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Alex", "Blake"]);
    assert_eq!(reports[0]["sessionStartTime"], "10:00");

    let (status, reports) = f.app.get(&uri, &f.app.admin()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reports.as_array().unwrap().len(), 2);

    let (status, _) = f.app.get(&uri, &f.parent).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, detail) = f.app.get(&format!("/api/v1/sessions/{}", f.session_id), &f.coach).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["reportCount"], 2);
}

#[tokio::test]
async fn test_player_history_newest_first() {
    let f = fixture().await;
    let later = f.app.session(&f.coach, days_from_today(2), "10:00", 4).await;
    for session in [&f.session_id, &later] {
        let (status, _) = f.app.post("/api/v1/reports", &f.coach, json!({
            "sessionId": session, "playerId": f.player_id,
        })).await;
        assert_eq!(status, StatusCode::CREATED);
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    let uri = format!("/api/v1/reports/player/{}", f.player_id);

    let (status, reports) = f.app.get(&uri, &f.parent).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reports.as_array().unwrap().len(), 2);
    assert_eq!(reports[0]["sessionId"], later.as_str());

    let (status, reports) = f.app.get(&format!("{}?limit=1", uri), &f.coach).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reports.as_array().unwrap().len(), 1);

    let stranger = f.app.parent("Eve").await;
    let (status, _) = f.app.get(&uri, &stranger).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
