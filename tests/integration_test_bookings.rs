mod common;

use axum::http::StatusCode;
use common::{days_from_today, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_parent_books_pending() {
    let app = TestApp::new().await;
    let coach = app.coach().await;
    let parent = app.parent("Dana").await;
    let player = app.player(&coach, &parent, "Alex").await;
    let session = app.session(&coach, days_from_today(1), "16:00", 1).await;

    let (status, booking) = app.post("/api/v1/bookings", &parent, json!({
        "sessionId": session, "playerId": player, "notes": "First time"
    })).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(booking["status"], "PENDING");
    assert_eq!(booking["parentId"], parent.profile_id.as_str());
    assert_eq!(booking["notes"], "First time");
    assert!(booking["confirmedAt"].is_null());
    assert!(booking["cancelledAt"].is_null());
}

#[tokio::test]
async fn test_admission_failure_modes() {
    let app = TestApp::new().await;
    let coach = app.coach().await;
    let parent = app.parent("Dana").await;
    let stranger = app.parent("Eve").await;
    let player = app.player(&coach, &parent, "Alex").await;
    let session = app.session(&coach, days_from_today(1), "16:00", 2).await;

    let (status, err) = app.book(&parent, "missing-session", &player).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["kind"], "NOT_FOUND");

    // Someone else's child
    let (status, err) = app.book(&stranger, &session, &player).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(err["kind"], "FORBIDDEN");

    let (status, err) = app.book(&parent, &session, "missing-player").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(err["kind"], "FORBIDDEN");

    let cancelled = app.session(&coach, days_from_today(1), "18:00", 2).await;
    app.post(&format!("/api/v1/sessions/{}/cancel", cancelled), &coach, json!({})).await;
    let (status, err) = app.book(&parent, &cancelled, &player).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["kind"], "INVALID_STATE");
}

#[tokio::test]
async fn test_session_state_is_checked_before_ownership() {
    let app = TestApp::new().await;
    let coach = app.coach().await;
    let parent = app.parent("Dana").await;
    let stranger = app.parent("Eve").await;
    let player = app.player(&coach, &parent, "Alex").await;
    let session = app.session(&coach, days_from_today(1), "16:00", 2).await;
    app.put(&format!("/api/v1/sessions/{}/status", session), &coach, json!({ "status": "IN_PROGRESS" })).await;

    let (status, err) = app.book(&stranger, &session, &player).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["kind"], "INVALID_STATE");
}

#[tokio::test]
async fn test_same_player_twice_conflicts() {
    let app = TestApp::new().await;
    let coach = app.coach().await;
    let parent = app.parent("Dana").await;
    let player = app.player(&coach, &parent, "Alex").await;
    let session = app.session(&coach, days_from_today(1), "16:00", 3).await;

    let (status, _) = app.book(&parent, &session, &player).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, err) = app.book(&parent, &session, &player).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["kind"], "CONFLICT");
}

#[tokio::test]
async fn test_duplicate_is_reported_before_capacity() {
    let app = TestApp::new().await;
    let coach = app.coach().await;
    let parent = app.parent("Dana").await;
    let player = app.player(&coach, &parent, "Alex").await;
    let session = app.session(&coach, days_from_today(1), "16:00", 1).await;
    app.book(&parent, &session, &player).await;

    let (status, err) = app.book(&parent, &session, &player).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["kind"], "CONFLICT");
}

#[tokio::test]
async fn test_capacity_boundary() {
    let app = TestApp::new().await;
    let coach = app.coach().await;
    let parent = app.parent("Dana").await;
    let session = app.session(&coach, days_from_today(1), "16:00", 3).await;

    let mut players = Vec::new();
    for name in ["Alex", "Sam", "Kim", "Lee"] {
        players.push(app.player(&coach, &parent, name).await);
    }

    for player in &players[..3] {
        let (status, _) = app.book(&parent, &session, player).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, err) = app.book(&parent, &session, &players[3]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["kind"], "CAPACITY_EXCEEDED");
}

#[tokio::test]
async fn test_cancelled_booking_frees_the_seat_and_allows_rebooking() {
    let app = TestApp::new().await;
    let coach = app.coach().await;
    let parent = app.parent("Dana").await;
    let alex = app.player(&coach, &parent, "Alex").await;
    let sam = app.player(&coach, &parent, "Sam").await;
    let session = app.session(&coach, days_from_today(1), "16:00", 1).await;

    let (_, first) = app.book(&parent, &session, &alex).await;
    let (status, _) = app.book(&parent, &session, &sam).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, cancelled) = app.post(&format!("/api/v1/bookings/{}/cancel", first["id"].as_str().unwrap()), &parent, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "CANCELLED");

    let (status, rebooked) = app.book(&parent, &session, &alex).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_ne!(rebooked["id"], first["id"]);
}

#[tokio::test]
async fn test_confirm_rules() {
    let app = TestApp::new().await;
    let coach = app.coach().await;
    let other_coach = app.coach().await;
    let parent = app.parent("Dana").await;
    let player = app.player(&coach, &parent, "Alex").await;
    let session = app.session(&coach, days_from_today(1), "16:00", 1).await;
    let (_, booking) = app.book(&parent, &session, &player).await;
    let uri = format!("/api/v1/bookings/{}/confirm", booking["id"].as_str().unwrap());

    let (status, _) = app.post(&uri, &other_coach, json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.post(&uri, &parent, json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, confirmed) = app.post(&uri, &coach, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(confirmed["status"], "CONFIRMED");
    assert!(!confirmed["confirmedAt"].is_null());

    let (status, err) = app.post(&uri, &coach, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["kind"], "INVALID_STATE");

    let (status, _) = app.post("/api/v1/bookings/nope/confirm", &coach, json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cancel_rules() {
    let app = TestApp::new().await;
    let coach = app.coach().await;
    let parent = app.parent("Dana").await;
    let stranger = app.parent("Eve").await;
    let alex = app.player(&coach, &parent, "Alex").await;
    let sam = app.player(&coach, &parent, "Sam").await;
    let session = app.session(&coach, days_from_today(1), "16:00", 2).await;

    let (_, by_parent) = app.book(&parent, &session, &alex).await;
    let (_, by_coach) = app.book(&parent, &session, &sam).await;
    let parent_uri = format!("/api/v1/bookings/{}/cancel", by_parent["id"].as_str().unwrap());
    let coach_uri = format!("/api/v1/bookings/{}/cancel", by_coach["id"].as_str().unwrap());

    let (status, _) = app.post(&parent_uri, &stranger, json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.post(&parent_uri, &app.admin(), json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.post(&parent_uri, &parent, json!({})).await;
    assert_eq!(status, StatusCode::OK);

    app.post(&format!("/api/v1/bookings/{}/confirm", by_coach["id"].as_str().unwrap()), &coach, json!({})).await;
    let (status, cancelled) = app.post(&coach_uri, &coach, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "CANCELLED");
    assert!(!cancelled["confirmedAt"].is_null());

    let (status, err) = app.post(&coach_uri, &coach, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["kind"], "INVALID_STATE");
}

#[tokio::test]
async fn test_no_show_has_no_status_precondition() {
    let app = TestApp::new().await;
    let coach = app.coach().await;
    let parent = app.parent("Dana").await;
    let player = app.player(&coach, &parent, "Alex").await;
    let session = app.session(&coach, days_from_today(1), "16:00", 1).await;
    let (_, booking) = app.book(&parent, &session, &player).await;
    let id = booking["id"].as_str().unwrap();

    app.post(&format!("/api/v1/bookings/{}/cancel", id), &parent, json!({})).await;

    let (status, _) = app.post(&format!("/api/v1/bookings/{}/no-show", id), &parent, json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, marked) = app.post(&format!("/api/v1/bookings/{}/no-show", id), &coach, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(marked["status"], "NO_SHOW");
}

#[tokio::test]
async fn test_coach_sees_pending_oldest_first() {
    let app = TestApp::new().await;
    let coach = app.coach().await;
    let parent = app.parent("Dana").await;
    let alex = app.player(&coach, &parent, "Alex").await;
    let sam = app.player(&coach, &parent, "Sam").await;
    let session = app.session(&coach, days_from_today(1), "16:00", 3).await;

    let (_, first) = app.book(&parent, &session, &alex).await;
    let (_, second) = app.book(&parent, &session, &sam).await;

    let (status, pending) = app.get("/api/v1/bookings/pending", &coach).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = pending.as_array().unwrap().iter().map(|b| b["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec![first["id"].as_str().unwrap(), second["id"].as_str().unwrap()]);
    assert_eq!(pending[0]["playerFirstName"], "Alex");
    assert_eq!(pending[0]["parentName"], "Dana");

    app.post(&format!("/api/v1/bookings/{}/confirm", first["id"].as_str().unwrap()), &coach, json!({})).await;
    let (_, pending) = app.get("/api/v1/bookings", &coach).await;
    assert_eq!(pending.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_parent_listing_filters() {
    let app = TestApp::new().await;
    let coach = app.coach().await;
    let parent = app.parent("Dana").await;
    let other = app.parent("Eve").await;
    let alex = app.player(&coach, &parent, "Alex").await;
    let kim = app.player(&coach, &other, "Kim").await;

    let past = app.session(&coach, days_from_today(-2), "16:00", 3).await;
    let later = app.session(&coach, days_from_today(5), "16:00", 3).await;
    let sooner = app.session(&coach, days_from_today(2), "16:00", 3).await;
    app.book(&parent, &past, &alex).await;
    let (_, later_booking) = app.book(&parent, &later, &alex).await;
    app.book(&parent, &sooner, &alex).await;
    app.book(&other, &sooner, &kim).await;
    app.post(&format!("/api/v1/bookings/{}/cancel", later_booking["id"].as_str().unwrap()), &parent, json!({})).await;

    let (_, all) = app.get("/api/v1/bookings", &parent).await;
    let dates: Vec<&str> = all.as_array().unwrap().iter().map(|b| b["sessionDate"].as_str().unwrap()).collect();
    assert_eq!(dates.len(), 3);
    assert!(dates.windows(2).all(|w| w[0] <= w[1]));

    let (_, upcoming) = app.get("/api/v1/bookings?upcoming=true", &parent).await;
    assert_eq!(upcoming.as_array().unwrap().len(), 2);

    let (_, cancelled) = app.get("/api/v1/bookings?status=CANCELLED", &parent).await;
    assert_eq!(cancelled.as_array().unwrap().len(), 1);
    assert_eq!(cancelled[0]["sessionId"], later.as_str());

    let (_, upcoming_pending) = app.get("/api/v1/bookings?status=PENDING&upcoming=true", &parent).await;
    assert_eq!(upcoming_pending.as_array().unwrap().len(), 1);
    assert_eq!(upcoming_pending[0]["sessionId"], sooner.as_str());
}

#[tokio::test]
async fn test_booking_visibility() {
    let app = TestApp::new().await;
    let coach = app.coach().await;
    let other_coach = app.coach().await;
    let parent = app.parent("Dana").await;
    let stranger = app.parent("Eve").await;
    let player = app.player(&coach, &parent, "Alex").await;
    let session = app.session(&coach, days_from_today(1), "16:00", 1).await;
    let (_, booking) = app.book(&parent, &session, &player).await;
    let uri = format!("/api/v1/bookings/{}", booking["id"].as_str().unwrap());

    for (user, expected) in [
        (&parent, StatusCode::OK),
        (&coach, StatusCode::OK),
        (&stranger, StatusCode::FORBIDDEN),
        (&other_coach, StatusCode::FORBIDDEN),
    ] {
        let (status, _) = app.get(&uri, user).await;
        assert_eq!(status, expected);
    }
    let (status, view) = app.get(&uri, &app.admin()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["sessionLocation"], "North Field");

    let session_uri = format!("/api/v1/bookings/session/{}", session);
    let (status, list) = app.get(&session_uri, &coach).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list[0]["parentPhone"], "555-0100");
    let (status, _) = app.get(&session_uri, &other_coach).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.get(&session_uri, &parent).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
