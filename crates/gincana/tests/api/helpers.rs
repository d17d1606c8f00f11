use async_trait::async_trait;
use gincana::{
    infra::bible::{BibleApi, Error, Passage},
    APISettings, Application, DataSettings, Settings,
};
use gincana_core::{BibleId, LeaderboardDocument};
use mockall::mock;
use serde_json::{json, Value};
use std::{fs, net::SocketAddr, path::Path, sync::Once};
use tempfile::TempDir;

mock! {
    #[derive(Send, Sync)]
    pub BibleClient { }

    #[async_trait]
    impl BibleApi for BibleClient {
        async fn get_passage(&self, bible_id: &BibleId, usfm: &str) -> Result<Passage, Error>;
    }
}

static INIT_LOGGER: Once = Once::new();

pub fn setup_static_logger() {
    INIT_LOGGER.call_once(|| {
        env_logger::init();
    });
}

pub fn default_rules() -> Value {
    json!({
        "rules": [
            {"id": 1, "description": "Presença na Embaixada", "points": 10, "activityType": "embaixada"},
            {"id": 2, "description": "Compromissos da igreja", "points": 15},
            {"id": 3, "description": "Trazer visitante", "points": 25},
            {"id": 4, "description": "Versículo decorado (<20 palavras)", "points": 25},
            {"id": 5, "description": "Versículo decorado (>=20 palavras)", "points": 35}
        ]
    })
}

pub fn seeded_leaderboard() -> Value {
    json!({
        "season": "2026",
        "participants": [
            {"id": 1, "name": "Ana", "attendance": [], "memorizedVerses": [], "visitors": []},
            {"id": 2, "name": "Bruno", "startPoints": 40, "attendance": [], "memorizedVerses": [], "visitors": []}
        ]
    })
}

pub fn write_document(path: &Path, value: &Value) {
    fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

pub fn data_settings(data_dir: &Path) -> DataSettings {
    DataSettings {
        data_folder: data_dir.to_string_lossy().to_string(),
        ..Default::default()
    }
}

pub struct TestApp {
    pub address: SocketAddr,
    pub client: reqwest::Client,
    pub data: DataSettings,
    /// Removed with the app at the end of the test
    _data_dir: TempDir,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.address, path)
    }

    pub fn leaderboard(&self) -> LeaderboardDocument {
        let raw = fs::read_to_string(self.data.leaderboard_path()).unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    pub async fn post(&self, path: &str, body: Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    pub async fn delete(&self, path: &str) -> reqwest::Response {
        self.client.delete(self.url(path)).send().await.unwrap()
    }
}

/// Start the server on an ephemeral port over a seeded data folder
pub async fn spawn_app(leaderboard: Value) -> TestApp {
    setup_static_logger();
    let data_dir = TempDir::new().unwrap();
    let data = data_settings(data_dir.path());
    write_document(&data.leaderboard_path(), &leaderboard);
    write_document(&data.scoring_files().rules, &default_rules());

    let settings = Settings {
        api_settings: APISettings {
            domain: String::from("127.0.0.1"),
            port: String::from("0"),
            origins: vec![],
        },
        data_settings: data.clone(),
        ..Default::default()
    };

    let application = Application::build(settings).await.unwrap();
    let address = application.address();
    tokio::spawn(application.run_until_stopped());

    TestApp {
        address,
        client: reqwest::Client::new(),
        data,
        _data_dir: data_dir,
    }
}
