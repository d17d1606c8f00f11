use gincana_core::{
    parse_cutoff, rank_participants, BonusDocument, GamesDocument, RankedParticipant, Rule,
    RulesDocument, ScoringContext, VersesDocument, DEFAULT_BIBLE_VERSION,
};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, sync::Arc};

use super::{Error, LeaderboardStore};
use crate::infra::json_file::{read_json, read_optional_json};

/// Documents besides the leaderboard that scoring reads
#[derive(Debug, Clone)]
pub struct ScoringFiles {
    pub rules: PathBuf,
    pub verses: PathBuf,
    pub games: PathBuf,
    pub bonus: PathBuf,
}

/// Rules are required; verses, games and bonus are optional
#[derive(Debug, Clone, Default)]
pub struct ScoringData {
    pub rules: Vec<Rule>,
    pub verses: Option<VersesDocument>,
    pub games: Option<GamesDocument>,
    pub bonus: Option<BonusDocument>,
}

impl ScoringData {
    pub async fn load(files: &ScoringFiles) -> Result<Self, Error> {
        let rules: RulesDocument = read_json(&files.rules).await?;
        Ok(Self {
            rules: rules.rules,
            verses: read_optional_json(&files.verses).await?,
            games: read_optional_json(&files.games).await?,
            bonus: read_optional_json(&files.bonus).await?,
        })
    }

    /// Version named by the verses document, "NVI" otherwise
    pub fn default_version(&self) -> &str {
        self.verses
            .as_ref()
            .and_then(|verses| verses.default_version.as_deref())
            .unwrap_or(DEFAULT_BIBLE_VERSION)
    }

    pub fn context<'a>(&'a self, version: &'a str) -> ScoringContext<'a> {
        ScoringContext::new(&self.rules)
            .with_verses(self.verses.as_ref())
            .with_version(version)
            .with_games(self.games.as_ref())
            .with_bonus(self.bonus.as_ref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rankings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Bible version whose word counts were used
    pub version: String,
    /// Cutoff the deltas were computed against
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points_as_of: Option<String>,
    pub participants: Vec<RankedParticipant>,
}

/// Everything the public leaderboard page shows
#[derive(Debug, Clone)]
pub struct LeaderboardView {
    pub rankings: Rankings,
    pub rules: Vec<Rule>,
}

/// Computes rankings from the store and the scoring documents
pub struct Scoreboard {
    store: Arc<LeaderboardStore>,
    files: ScoringFiles,
}

impl Scoreboard {
    pub fn new(store: Arc<LeaderboardStore>, files: ScoringFiles) -> Self {
        Self { store, files }
    }

    pub async fn view(&self, version: Option<&str>) -> Result<LeaderboardView, Error> {
        let document = self.store.read().await?;
        let data = ScoringData::load(&self.files).await?;

        let version = version
            .map(str::trim)
            .filter(|version| !version.is_empty())
            .unwrap_or_else(|| data.default_version())
            .to_string();

        // A cutoff that no longer parses disables deltas instead of failing the page
        let cutoff = document
            .points_as_of
            .as_deref()
            .and_then(|points_as_of| match parse_cutoff(points_as_of) {
                Ok(cutoff) => Some(cutoff),
                Err(e) => {
                    warn!("ignoring pointsAsOf: {}", e);
                    None
                }
            });

        let participants = rank_participants(&document.participants, &data.context(&version), cutoff);

        Ok(LeaderboardView {
            rankings: Rankings {
                season: document.season,
                updated_at: document.updated_at,
                version,
                points_as_of: document.points_as_of,
                participants,
            },
            rules: data.rules,
        })
    }

    pub async fn rankings(&self, version: Option<&str>) -> Result<Rankings, Error> {
        self.view(version).await.map(|view| view.rankings)
    }
}
