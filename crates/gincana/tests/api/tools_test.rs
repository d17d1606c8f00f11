use gincana::{
    domain::{collect_references, snapshot_points, LeaderboardStore, VerseFetcher},
    infra::{
        bible::{Error, Passage},
        json_file::{read_json, write_json},
    },
};
use gincana_core::{BibleId, BibleVersionsConfig, ConfiguredVersion, LeaderboardDocument};
use serde_json::json;
use std::{sync::Arc, time::Duration};
use tempfile::TempDir;

use crate::helpers::{
    data_settings, default_rules, seeded_leaderboard, setup_static_logger, write_document,
    MockBibleClient,
};

fn versions() -> BibleVersionsConfig {
    BibleVersionsConfig {
        default_version: String::from("NVI"),
        versions: vec![
            ConfiguredVersion {
                id: BibleId::Numeric(129),
                abbreviation: String::from("NVI"),
                name: String::from("Nova Versão Internacional"),
            },
            ConfiguredVersion {
                id: BibleId::Numeric(1608),
                abbreviation: String::from("ARA"),
                name: String::from("Almeida Revista e Atualizada"),
            },
        ],
    }
}

#[tokio::test]
async fn test_fetch_verses_records_texts_and_failures() {
    setup_static_logger();
    let document: LeaderboardDocument = serde_json::from_value(json!({
        "participants": [
            {"id": 1, "name": "Ana", "memorizedVerses": ["Jo 11:35-36", {"ref": "Xy 1:1"}]}
        ]
    }))
    .unwrap();
    let references = collect_references(&document);
    assert_eq!(references, vec!["Jo 11:35", "Jo 11:36", "Xy 1:1"]);

    let mut bible = MockBibleClient::new();
    bible
        .expect_get_passage()
        .withf(|bible_id, usfm| bible_id.to_string() == "1608" && usfm.to_string() == "JHN.11.36")
        .times(1)
        .returning(|_, usfm| Err(Error::NotFound(usfm.to_string())));
    bible
        .expect_get_passage()
        .times(3)
        .returning(|_, _| {
            Ok(Passage {
                content: String::from("  Jesus   chorou.\n"),
                reference: None,
            })
        });

    let fetcher = VerseFetcher::new(Arc::new(bible), Duration::ZERO);
    let report = fetcher.fetch(&versions(), &references).await;

    assert_eq!(report.skipped, vec![String::from("Xy 1:1")]);
    assert_eq!(
        report.unavailable,
        vec![(String::from("Jo 11:36"), String::from("ARA"))]
    );
    assert_eq!(report.fetched(), 3);

    let document = &report.document;
    assert_eq!(document.default_version.as_deref(), Some("NVI"));
    assert_eq!(document.versions.len(), 2);
    let nvi = &document.verses["Jo 11:35"]["NVI"];
    assert_eq!(nvi.text, "Jesus chorou.");
    assert_eq!(nvi.word_count, 2);
    assert_eq!(nvi.reference, "Jo 11:35");
    assert_eq!(
        nvi.youversion_url,
        "https://www.bible.com/pt/bible/129/JHN.11.35"
    );
    assert!(!document.verses["Jo 11:36"].contains_key("ARA"));
    assert!(!document.verses.contains_key("Xy 1:1"));

    // the written document loads back as the scoring input
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("verses.json");
    write_json(&path, document).await.unwrap();
    let loaded: gincana_core::VersesDocument = read_json(&path).await.unwrap();
    assert_eq!(loaded.word_count("Jo 11:35", "ARA"), Some(2));
}

#[tokio::test]
async fn test_fetch_without_references_writes_empty_document() {
    setup_static_logger();
    let mut bible = MockBibleClient::new();
    bible.expect_get_passage().never();

    let fetcher = VerseFetcher::new(Arc::new(bible), Duration::ZERO);
    let report = fetcher.fetch(&versions(), &[]).await;

    assert_eq!(report.fetched(), 0);
    assert!(report.document.versions.is_empty());
    assert!(report.document.verses.is_empty());
}

#[tokio::test]
async fn test_snapshot_stores_current_totals() {
    setup_static_logger();
    let dir = TempDir::new().unwrap();
    let data = data_settings(dir.path());
    let mut leaderboard = seeded_leaderboard();
    leaderboard["participants"][0]["attendance"] =
        json!([{"date": "2026-03-07", "type": "embaixada"}]);
    leaderboard["participants"][0]["visitors"] = json!(["Edu"]);
    leaderboard["participants"][1]["disciplines"] = json!([{"points": -5}]);
    write_document(&data.leaderboard_path(), &leaderboard);
    write_document(&data.scoring_files().rules, &default_rules());
    write_document(
        &data.scoring_files().bonus,
        &json!({"challenges": [{
            "id": 1,
            "name": "Quiz bíblico",
            "date": "2026-03-01",
            "results": [{"participantId": 1, "points": 7}]
        }]}),
    );

    let store = LeaderboardStore::new(data.leaderboard_path(), None);
    let entries = snapshot_points(&store, &data.scoring_files()).await.unwrap();

    let totals: Vec<(u32, i64)> = entries.iter().map(|entry| (entry.id, entry.points)).collect();
    assert_eq!(totals, vec![(1, 42), (2, 35)]);

    let document = store.read().await.unwrap();
    assert_eq!(document.participants[0].previous_points, Some(42));
    assert_eq!(document.participants[1].previous_points, Some(35));
    assert!(document.participants[0].previous_points_at.is_some());
    assert!(document.updated_at.is_some());
}

#[tokio::test]
async fn test_fetch_records_transient_failures_as_unavailable() {
    setup_static_logger();
    let mut bible = MockBibleClient::new();
    bible
        .expect_get_passage()
        .times(2)
        .returning(|_, _| Err(Error::Transient(String::from("503 Service Unavailable"))));

    let fetcher = VerseFetcher::new(Arc::new(bible), Duration::ZERO);
    let report = fetcher
        .fetch(&versions(), &[String::from("Jo 3:16")])
        .await;

    assert_eq!(report.fetched(), 0);
    assert_eq!(
        report.unavailable,
        vec![
            (String::from("Jo 3:16"), String::from("NVI")),
            (String::from("Jo 3:16"), String::from("ARA")),
        ]
    );
}
