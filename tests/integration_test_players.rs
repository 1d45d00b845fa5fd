mod common;

use axum::http::StatusCode;
use common::{send, TestApp};
use serde_json::json;
use tokio::task::JoinSet;

#[tokio::test]
async fn test_coach_creates_player_for_parent() {
    let app = TestApp::new().await;
    let coach = app.coach().await;
    let parent = app.parent("Dana").await;

    let (status, player) = app.post("/api/v1/players", &coach, json!({
        "firstName": "Alex",
        "lastName": "Smith",
        "dateOfBirth": "2015-04-02",
        "position": "Midfield",
        "preferredFoot": "left",
        "parentId": parent.profile_id,
    })).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(player["coachId"], coach.profile_id.as_str());
    assert_eq!(player["parentId"], parent.profile_id.as_str());
    assert_eq!(player["dateOfBirth"], "2015-04-02");
    assert_eq!(player["isActive"], true);
}

#[tokio::test]
async fn test_create_rejects_bad_input() {
    let app = TestApp::new().await;
    let coach = app.coach().await;

    let (status, err) = app.post("/api/v1/players", &coach, json!({ "firstName": "", "lastName": "Smith" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["kind"], "VALIDATION_ERROR");

    let (status, _) = app.post("/api/v1/players", &coach, json!({
        "firstName": "Alex", "lastName": "Smith", "parentId": "nobody"
    })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let parent = app.parent("Dana").await;
    let (status, _) = app.post("/api/v1/players", &parent, json!({ "firstName": "Alex", "lastName": "Smith" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_listing_by_role() {
    let app = TestApp::new().await;
    let coach = app.coach().await;
    let other_coach = app.coach().await;
    let dana = app.parent("Dana").await;
    let eve = app.parent("Eve").await;

    app.player(&coach, &dana, "Sam").await;
    app.player(&coach, &dana, "Alex").await;
    app.player(&coach, &eve, "Kim").await;
    app.player(&other_coach, &dana, "Lee").await;

    let (status, roster) = app.get("/api/v1/players", &coach).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = roster.as_array().unwrap().iter().map(|p| p["firstName"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Alex", "Kim", "Sam"]);

    let (_, children) = app.get("/api/v1/players", &dana).await;
    let names: Vec<&str> = children.as_array().unwrap().iter().map(|p| p["firstName"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Alex", "Lee", "Sam"]);

    let (status, _) = app.get("/api/v1/players", &app.admin()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_deactivate_hides_player_unless_requested() {
    let app = TestApp::new().await;
    let coach = app.coach().await;
    let parent = app.parent("Dana").await;
    let player = app.player(&coach, &parent, "Alex").await;
    app.player(&coach, &parent, "Sam").await;

    let (status, _) = app.request("DELETE", &format!("/api/v1/players/{}", player), Some(&coach.token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, active) = app.get("/api/v1/players", &coach).await;
    assert_eq!(active.as_array().unwrap().len(), 1);

    let (_, everyone) = app.get("/api/v1/players?includeInactive=true", &coach).await;
    assert_eq!(everyone.as_array().unwrap().len(), 2);
    let deactivated = everyone.as_array().unwrap().iter().find(|p| p["id"] == player.as_str()).unwrap();
    assert_eq!(deactivated["isActive"], false);

    let (_, children) = app.get("/api/v1/players", &parent).await;
    assert_eq!(children.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_reassign_and_unlink_parent() {
    let app = TestApp::new().await;
    let coach = app.coach().await;
    let dana = app.parent("Dana").await;
    let eve = app.parent("Eve").await;
    let player = app.player(&coach, &dana, "Alex").await;
    let uri = format!("/api/v1/players/{}/parent", player);

    let (status, moved) = app.put(&uri, &coach, json!({ "parentId": eve.profile_id })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["parentId"], eve.profile_id.as_str());

    let (_, children) = app.get("/api/v1/players", &dana).await;
    assert!(children.as_array().unwrap().is_empty());

    let (status, unlinked) = app.put(&uri, &coach, json!({ "parentId": null })).await;
    assert_eq!(status, StatusCode::OK);
    assert!(unlinked["parentId"].is_null());

    let (status, _) = app.put(&uri, &coach, json!({ "parentId": "nobody" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_only_owning_coach_may_change_player() {
    let app = TestApp::new().await;
    let coach = app.coach().await;
    let other_coach = app.coach().await;
    let parent = app.parent("Dana").await;
    let player = app.player(&coach, &parent, "Alex").await;

    let (status, _) = app.put(&format!("/api/v1/players/{}/parent", player), &other_coach, json!({ "parentId": null })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.request("DELETE", &format!("/api/v1/players/{}", player), Some(&other_coach.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.request("DELETE", "/api/v1/players/missing", Some(&coach.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_parent_cannot_book_for_unlinked_player() {
    let app = TestApp::new().await;
    let coach = app.coach().await;
    let parent = app.parent("Dana").await;
    let player = app.player(&coach, &parent, "Alex").await;
    let session = app.session(&coach, common::days_from_today(1), "16:00", 2).await;

    app.put(&format!("/api/v1/players/{}/parent", player), &coach, json!({ "parentId": null })).await;

    let (status, _) = app.book(&parent, &session, &player).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parent_reassignment_racing_deactivation_keeps_player_inactive() {
    let app = TestApp::new().await;
    let coach = app.coach().await;
    let dana = app.parent("Dana").await;
    let eve = app.parent("Eve").await;

    for round in 0..5 {
        let player = app.player(&coach, &dana, &format!("Alex{}", round)).await;

        let mut set = JoinSet::new();
        for i in 0..3 {
            let router = app.router.clone();
            let token = coach.token.clone();
            let player = player.clone();
            let parent_id = eve.profile_id.clone();
            set.spawn(async move {
                if i == 1 {
                    let (status, _) = send(router, "DELETE", &format!("/api/v1/players/{}", player), Some(&token), None).await;
                    (true, status)
                } else {
                    let uri = format!("/api/v1/players/{}/parent", player);
                    let (status, _) = send(router, "PUT", &uri, Some(&token), Some(json!({ "parentId": parent_id }))).await;
                    (false, status)
                }
            });
        }

        while let Some(result) = set.join_next().await {
            let (is_delete, status) = result.unwrap();
            if is_delete {
                assert_eq!(status, StatusCode::NO_CONTENT);
            } else {
                assert_eq!(status, StatusCode::OK);
            }
        }

        let (_, active) = app.get("/api/v1/players", &coach).await;
        assert!(
            active.as_array().unwrap().iter().all(|p| p["id"] != player.as_str()),
            "deactivated player came back"
        );
    }
}
