use serde_json::{json, Value};

use crate::helpers::{seeded_leaderboard, spawn_app};

#[tokio::test]
async fn test_add_participant_assigns_next_id() {
    let app = spawn_app(seeded_leaderboard()).await;

    let response = app.post("/api/participants", json!({"name": "Carla"})).await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["participant"]["id"], 3);
    assert_eq!(body["participant"]["name"], "Carla");
    assert_eq!(body["participant"]["attendance"], json!([]));

    let document = app.leaderboard();
    assert_eq!(document.participants.len(), 3);
    assert!(document.updated_at.is_some());
}

#[tokio::test]
async fn test_add_participant_requires_name() {
    let app = spawn_app(seeded_leaderboard()).await;

    let response = app.post("/api/participants", json!({"name": "  "})).await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "name is required");
    assert_eq!(app.leaderboard().participants.len(), 2);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = spawn_app(seeded_leaderboard()).await;

    let response = app
        .client
        .post(app.url("/api/participants/1/attendance"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_attendance_add_and_remove() {
    let app = spawn_app(seeded_leaderboard()).await;

    let response = app
        .post(
            "/api/participants/1/attendance",
            json!({"date": "2026-03-07", "type": "embaixada"}),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    let record = &body["participant"]["attendance"][0];
    assert_eq!(record["date"], "2026-03-07");
    assert_eq!(record["type"], "embaixada");
    assert!(record["addedAt"].is_string());

    let response = app.delete("/api/participants/1/attendance/0").await;
    assert_eq!(response.status(), 200);
    assert!(app.leaderboard().participants[0].attendance.is_empty());
}

#[tokio::test]
async fn test_attendance_validation() {
    let app = spawn_app(seeded_leaderboard()).await;

    let response = app
        .post("/api/participants/1/attendance", json!({"date": "2026-03-07"}))
        .await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "date and type are required");

    let response = app
        .post(
            "/api/participants/1/attendance",
            json!({"date": "07/03/2026", "type": "pg"}),
        )
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_unknown_participant_is_not_found() {
    let app = spawn_app(seeded_leaderboard()).await;

    let response = app
        .post(
            "/api/participants/99/attendance",
            json!({"date": "2026-03-07", "type": "pg"}),
        )
        .await;
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Participant not found");

    let response = app.delete("/api/participants/99/visitor/0").await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_invalid_index_is_bad_request() {
    let app = spawn_app(seeded_leaderboard()).await;

    let response = app.delete("/api/participants/1/attendance/0").await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid attendance index");

    let response = app.delete("/api/participants/1/verse/abc").await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_bulk_attendance_skips_unknown_ids() {
    let app = spawn_app(seeded_leaderboard()).await;

    let response = app
        .post(
            "/api/participants/bulk/attendance",
            json!({"participantIds": [1, "2", 42], "date": "2026-03-08", "type": "igreja"}),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["updatedIds"], json!([1, 2]));

    let document = app.leaderboard();
    for participant in &document.participants {
        assert_eq!(participant.attendance.len(), 1);
        assert_eq!(participant.attendance[0].kind, "igreja");
    }
}

#[tokio::test]
async fn test_bulk_attendance_requires_id_array() {
    let app = spawn_app(seeded_leaderboard()).await;

    let response = app
        .post(
            "/api/participants/bulk/attendance",
            json!({"participantIds": 1, "date": "2026-03-08", "type": "igreja"}),
        )
        .await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["error"],
        "participantIds (array), date, and type are required"
    );
}

#[tokio::test]
async fn test_duplicate_verse_is_rejected_without_writing() {
    let mut leaderboard = seeded_leaderboard();
    leaderboard["participants"][0]["memorizedVerses"] = json!(["Jo 3:16"]);
    let app = spawn_app(leaderboard).await;
    let before = std::fs::read_to_string(app.data.leaderboard_path()).unwrap();

    let response = app
        .post("/api/participants/1/verse", json!({"ref": "Jo 3:16"}))
        .await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Verse already memorized");

    let after = std::fs::read_to_string(app.data.leaderboard_path()).unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_verse_and_visitor_records_are_timestamped() {
    let app = spawn_app(seeded_leaderboard()).await;

    let response = app
        .post("/api/participants/2/verse", json!({"ref": "Sl 23:1"}))
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["participant"]["memorizedVerses"][0]["ref"], "Sl 23:1");
    assert!(body["participant"]["memorizedVerses"][0]["addedAt"].is_string());

    let response = app
        .post("/api/participants/2/visitor", json!({"name": "Davi"}))
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["participant"]["visitors"][0]["name"], "Davi");

    let response = app.delete("/api/participants/2/visitor/0").await;
    assert_eq!(response.status(), 200);
    let response = app.delete("/api/participants/2/verse/0").await;
    assert_eq!(response.status(), 200);

    let bruno = &app.leaderboard().participants[1];
    assert!(bruno.visitors.is_empty());
    assert!(bruno.memorized_verses.is_empty());
    assert_eq!(bruno.start_points, Some(40));
}

#[tokio::test]
async fn test_discipline_add_and_remove() {
    let app = spawn_app(seeded_leaderboard()).await;

    let response = app
        .post(
            "/api/participants/1/discipline",
            json!({"points": -10, "reason": "Atraso"}),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["participant"]["disciplines"][0]["points"], -10);
    assert_eq!(body["participant"]["disciplines"][0]["reason"], "Atraso");

    let response = app
        .post("/api/participants/1/discipline", json!({"reason": "Atraso"}))
        .await;
    assert_eq!(response.status(), 400);

    let response = app.delete("/api/participants/1/discipline/0").await;
    assert_eq!(response.status(), 200);
    assert!(app.leaderboard().participants[0].disciplines().is_empty());
}

#[tokio::test]
async fn test_oversized_verse_range_is_rejected() {
    let app = spawn_app(seeded_leaderboard()).await;
    let before = std::fs::read_to_string(app.data.leaderboard_path()).unwrap();

    let response = app
        .post("/api/participants/1/verse", json!({"ref": "Sl 1:1-4000000000"}))
        .await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["error"],
        "verse range \"Sl 1:1-4000000000\" covers more than 176 verses"
    );
    let after = std::fs::read_to_string(app.data.leaderboard_path()).unwrap();
    assert_eq!(before, after);

    let response = app
        .post("/api/participants/1/verse", json!({"ref": "Sl 119:1-176"}))
        .await;
    assert_eq!(response.status(), 200);
}
