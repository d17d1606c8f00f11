use serde_json::{json, Value};

use crate::helpers::{seeded_leaderboard, spawn_app, write_document};

#[tokio::test]
async fn test_get_leaderboard_returns_document() {
    let app = spawn_app(seeded_leaderboard()).await;

    let response = app.get("/api/leaderboard").await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["season"], "2026");
    assert_eq!(body["participants"][1]["name"], "Bruno");
    assert_eq!(body["participants"][1]["startPoints"], 40);
}

#[tokio::test]
async fn test_scores_follow_recorded_activity() {
    let app = spawn_app(seeded_leaderboard()).await;

    app.post(
        "/api/participants/1/attendance",
        json!({"date": "2026-03-07", "type": "embaixada"}),
    )
    .await;
    app.post("/api/participants/1/visitor", json!({"name": "Davi"}))
        .await;

    let body: Value = app.get("/api/rankings").await.json().await.unwrap();
    assert_eq!(body["version"], "NVI");
    let ana = &body["participants"][1];
    assert_eq!(ana["name"], "Ana");
    assert_eq!(ana["points"], 35);
    assert_eq!(ana["rank"], 2);
    assert!(ana.get("delta").is_none());

    // no verses document: every verse is worth the small tier
    app.post("/api/participants/1/verse", json!({"ref": "Jo 3:16"}))
        .await;

    let body: Value = app.get("/api/rankings").await.json().await.unwrap();
    let leader = &body["participants"][0];
    assert_eq!(leader["name"], "Ana");
    assert_eq!(leader["points"], 60);
    assert_eq!(leader["rank"], 1);
    assert_eq!(body["participants"][1]["points"], 40);
}

#[tokio::test]
async fn test_verse_word_counts_pick_the_tier() {
    let mut leaderboard = seeded_leaderboard();
    leaderboard["participants"][0]["memorizedVerses"] = json!(["Jo 3:16", "Jo 11:35"]);
    let app = spawn_app(leaderboard).await;
    write_document(
        &app.data.verses_path(),
        &json!({
            "defaultVersion": "NVI",
            "versions": {"NVI": {"id": 129, "name": "Nova Versão Internacional"}},
            "verses": {
                "Jo 3:16": {"NVI": {
                    "reference": "João 3:16",
                    "text": "...",
                    "wordCount": 26,
                    "youversionUrl": "https://www.bible.com/pt/bible/129/JHN.3.16"
                }},
                "Jo 11:35": {"NVI": {
                    "reference": "João 11:35",
                    "text": "Jesus chorou.",
                    "wordCount": 2,
                    "youversionUrl": "https://www.bible.com/pt/bible/129/JHN.11.35"
                }}
            }
        }),
    );

    let body: Value = app.get("/api/rankings").await.json().await.unwrap();
    assert_eq!(body["participants"][0]["name"], "Ana");
    assert_eq!(body["participants"][0]["points"], 35 + 25);

    // unknown version: no word counts, both fall back to the small tier
    let body: Value = app
        .get("/api/rankings?version=ARA")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["version"], "ARA");
    assert_eq!(body["participants"][0]["points"], 50);
}

#[tokio::test]
async fn test_points_as_of_enables_deltas() {
    let app = spawn_app(seeded_leaderboard()).await;

    let response = app
        .client
        .put(app.url("/api/points-as-of"))
        .json(&json!({"pointsAsOf": "2026-01-01"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"success": true, "pointsAsOf": "2026-01-01"}));

    app.post("/api/participants/1/visitor", json!({"name": "Davi"}))
        .await;

    let body: Value = app.get("/api/rankings").await.json().await.unwrap();
    assert_eq!(body["pointsAsOf"], "2026-01-01");
    let bruno = &body["participants"][0];
    assert_eq!(bruno["name"], "Bruno");
    assert_eq!(bruno["delta"], 0);
    let ana = &body["participants"][1];
    assert_eq!(ana["delta"], 25);
}

#[tokio::test]
async fn test_points_as_of_rejects_garbage() {
    let app = spawn_app(seeded_leaderboard()).await;

    let response = app
        .client
        .put(app.url("/api/points-as-of"))
        .json(&json!({"pointsAsOf": "last sunday"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    assert!(app.leaderboard().points_as_of.is_none());

    let response = app
        .client
        .put(app.url("/api/points-as-of"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "pointsAsOf is required");
}

#[tokio::test]
async fn test_activity_history_lists_newest_first() {
    let mut leaderboard = seeded_leaderboard();
    leaderboard["participants"][1]["attendance"] = json!([
        {"date": "2025-12-01", "type": "pg"},
        {"date": "2026-01-10", "type": "pg", "addedAt": "2026-01-10T20:00:00.000Z"}
    ]);
    leaderboard["participants"][1]["visitors"] = json!(["Edu"]);
    let app = spawn_app(leaderboard).await;

    app.post("/api/participants/1/verse", json!({"ref": "Sl 23:1"}))
        .await;

    let body: Value = app
        .get("/api/activity-history")
        .await
        .json()
        .await
        .unwrap();
    let activities = body["activities"].as_array().unwrap();
    assert_eq!(activities.len(), 4);

    assert_eq!(activities[0]["type"], "verse");
    assert_eq!(activities[0]["participantName"], "Ana");
    assert_eq!(activities[0]["data"]["ref"], "Sl 23:1");

    assert_eq!(activities[1]["type"], "attendance");
    assert_eq!(activities[1]["index"], 1);

    // untimed records come last
    assert_eq!(activities[2]["addedAt"], "1970-01-01T00:00:00.000Z");
    assert_eq!(activities[3]["addedAt"], "1970-01-01T00:00:00.000Z");
    assert_eq!(activities[3]["data"], json!({"name": "Edu"}));
}

#[tokio::test]
async fn test_health_check() {
    let app = spawn_app(seeded_leaderboard()).await;

    let response = app.get("/api/health_check").await;
    assert_eq!(response.status(), 200);

    std::fs::remove_file(app.data.leaderboard_path()).unwrap();
    let response = app.get("/api/health_check").await;
    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "internal server error");
}

#[tokio::test]
async fn test_leaderboard_page_renders_rankings() {
    let app = spawn_app(seeded_leaderboard()).await;

    let response = app.get("/").await;
    assert_eq!(response.status(), 200);
    let html = response.text().await.unwrap();
    assert!(html.contains("Bruno"));
    assert!(html.contains("Presença na Embaixada"));
    assert!(html.contains("rankingTable"));
}
