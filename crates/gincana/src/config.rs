use anyhow::anyhow;
use clap::Parser;
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::{
    env,
    fs::{self, File},
    io::{Read, Write},
    path::{Path, PathBuf},
};
use time::{format_description::well_known::Iso8601, OffsetDateTime};

use crate::domain::ScoringFiles;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to Settings.toml file holding configuration options
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level to run with the service (default: info)
    #[arg(short, long)]
    pub level: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Settings {
    pub config: Option<String>,
    pub level: Option<String>,
    #[serde(default)]
    pub api_settings: APISettings,
    #[serde(default)]
    pub data_settings: DataSettings,
    #[serde(default)]
    pub bible_settings: BibleSettings,
    #[serde(default)]
    pub ui_settings: UISettings,
}

impl ConfigurableSettings for Settings {
    fn apply_cli_overrides(&mut self, cli_settings: &CliSettings) {
        if let Some(level) = &cli_settings.level {
            self.level = Some(level.clone());
        }
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("./config/local.toml")
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataSettings {
    /// Folder holding the JSON documents the site is built from
    pub data_folder: String,
    pub leaderboard_file: String,
    /// Optional second copy of the leaderboard (e.g. the git tracked config source),
    /// written after every change; failures only produce a warning
    pub mirror_file: Option<String>,
    pub rules_file: String,
    pub verses_file: String,
    pub games_file: String,
    pub bonus_file: String,
    /// Bible versions to fetch, relative to the working directory
    pub bible_versions_file: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        DataSettings {
            data_folder: String::from("./public/data"),
            leaderboard_file: String::from("leaderboard.json"),
            mirror_file: None,
            rules_file: String::from("rules.json"),
            verses_file: String::from("verses.json"),
            games_file: String::from("games.json"),
            bonus_file: String::from("bonus.json"),
            bible_versions_file: String::from("./config/bible-versions.json"),
        }
    }
}

impl DataSettings {
    fn data_path(&self, file: &str) -> PathBuf {
        Path::new(&self.data_folder).join(file)
    }

    pub fn leaderboard_path(&self) -> PathBuf {
        self.data_path(&self.leaderboard_file)
    }

    pub fn mirror_path(&self) -> Option<PathBuf> {
        self.mirror_file.as_ref().map(PathBuf::from)
    }

    pub fn verses_path(&self) -> PathBuf {
        self.data_path(&self.verses_file)
    }

    pub fn bible_versions_path(&self) -> PathBuf {
        PathBuf::from(&self.bible_versions_file)
    }

    pub fn scoring_files(&self) -> ScoringFiles {
        ScoringFiles {
            rules: self.data_path(&self.rules_file),
            verses: self.verses_path(),
            games: self.data_path(&self.games_file),
            bonus: self.data_path(&self.bonus_file),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BibleSettings {
    /// Base url of the Bible content API
    pub base_url: String,
    /// App key sent with every request, falls back to the YOUVERSION_API_KEY env var
    pub api_key: Option<String>,
    /// Pause between two passage requests, keeps us under the API rate limit
    pub request_delay_ms: u64,
    /// Retries for transient failures (timeouts, 5xx, 429)
    pub max_retries: u32,
}

impl Default for BibleSettings {
    fn default() -> Self {
        BibleSettings {
            base_url: String::from("https://api.youversion.com"),
            api_key: None,
            request_delay_ms: 150,
            max_retries: 3,
        }
    }
}

impl BibleSettings {
    pub fn api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| env::var("YOUVERSION_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UISettings {
    pub title: String,
}

impl Default for UISettings {
    fn default() -> Self {
        UISettings {
            title: String::from("Gincana"),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct APISettings {
    pub domain: String,
    pub port: String,
    pub origins: Vec<String>,
}

impl Default for APISettings {
    fn default() -> Self {
        APISettings {
            domain: String::from("127.0.0.1"),
            port: String::from("3001"),
            origins: vec![
                String::from("http://localhost:3001"),
                String::from("http://localhost:5173"),
                String::from("http://localhost:8080"),
            ],
        }
    }
}

pub fn get_settings() -> Result<Settings, anyhow::Error> {
    get_settings_with_cli(Cli::parse().into())
}

pub struct CliSettings {
    pub config: Option<String>,
    pub level: Option<String>,
}

impl From<Cli> for CliSettings {
    fn from(cli: Cli) -> Self {
        Self {
            config: cli.config,
            level: cli.level,
        }
    }
}

pub trait ConfigurableSettings: Serialize + for<'de> Deserialize<'de> + Default {
    /// Apply CLI settings after loading from file
    fn apply_cli_overrides(&mut self, cli_settings: &CliSettings);

    /// Get the default config file path
    fn default_config_path() -> PathBuf {
        PathBuf::from("./config/settings.toml")
    }

    /// Get the config directory path
    fn config_directory() -> PathBuf {
        PathBuf::from("./config")
    }
}

fn read_settings_file<T: ConfigurableSettings>(path: &Path) -> Result<T, anyhow::Error> {
    let mut file = File::open(path).map_err(|e| anyhow!("Failed to find file: {}", e))?;
    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| anyhow!("Failed to read config: {}", e))?;
    toml::from_str(&content).map_err(|e| anyhow!("Failed to map config to settings: {}", e))
}

pub fn get_settings_with_cli<T: ConfigurableSettings>(
    cli_settings: CliSettings,
) -> Result<T, anyhow::Error> {
    let mut settings = if let Some(config_path) = cli_settings.config.clone() {
        let path = PathBuf::from(config_path);

        let absolute_path = if path.is_absolute() {
            path
        } else {
            env::current_dir()?.join(path)
        };

        read_settings_file(&absolute_path)?
    } else {
        let default_path = T::default_config_path();
        if default_path.exists() {
            read_settings_file(&default_path)?
        } else {
            let default_settings = T::default();

            fs::create_dir_all(T::config_directory())
                .map_err(|e| anyhow!("Failed to create config directory: {}", e))?;

            let toml_content = toml::to_string(&default_settings)
                .map_err(|e| anyhow!("Failed to serialize default settings: {}", e))?;

            let mut file = fs::File::create(&default_path)
                .map_err(|e| anyhow!("Failed to create config file: {}", e))?;
            file.write_all(toml_content.as_bytes())
                .map_err(|e| anyhow!("Failed to write default config: {}", e))?;

            default_settings
        }
    };

    settings.apply_cli_overrides(&cli_settings);

    Ok(settings)
}

pub fn setup_logger(
    level: Option<String>,
    filter_targets: Vec<String>,
) -> Result<(), fern::InitError> {
    let rust_log = get_log_level(level);
    let colors = ColoredLevelConfig::new()
        .trace(Color::White)
        .debug(Color::Cyan)
        .info(Color::Blue)
        .warn(Color::Yellow)
        .error(Color::Magenta);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            let now = OffsetDateTime::now_utc()
                .format(&Iso8601::DEFAULT)
                .unwrap_or_default();
            out.finish(format_args!(
                "[{} {}] {}: {}",
                now,
                colors.color(record.level()),
                record.target(),
                message
            ));
        })
        .level(rust_log)
        .filter(move |metadata| {
            !filter_targets
                .iter()
                .any(|filter| metadata.target().starts_with(filter))
        })
        .chain(std::io::stdout())
        .apply()?;
    Ok(())
}

pub fn get_log_level(level: Option<String>) -> LevelFilter {
    let level = level
        .or_else(|| env::var("RUST_LOG").ok())
        .unwrap_or_default();
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}
