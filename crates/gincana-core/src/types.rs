//! Document types shared between the admin server and the command line tools
//!
//! Every document mirrors the JSON files the static site reads. Keys the code does
//! not model are kept in `extra` so rewriting a document never drops data.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{collections::BTreeMap, fmt};

/// The leaderboard store: one document holding every participant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Cutoff for delta scoring, activity at or after this instant counts as "new"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points_as_of: Option<String>,
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LeaderboardDocument {
    pub fn participant(&self, id: u32) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn participant_mut(&mut self, id: u32) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| p.id == id)
    }

    /// Next free id: one past the highest id in use (1 for an empty board)
    pub fn next_participant_id(&self) -> u32 {
        self.participants.iter().map(|p| p.id).max().unwrap_or(0) + 1
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: u32,
    pub name: String,
    /// Frozen points earned before activity was tracked record by record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_points: Option<i64>,
    #[serde(default)]
    pub attendance: Vec<AttendanceRecord>,
    #[serde(default)]
    pub memorized_verses: Vec<VerseRecord>,
    #[serde(default)]
    pub visitors: Vec<VisitorRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disciplines: Option<Vec<DisciplineRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidato_progress: Option<CandidatoProgress>,
    /// Total computed by the last points snapshot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_points: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_points_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Participant {
    pub fn new(id: u32, name: String) -> Self {
        Self {
            id,
            name,
            ..Default::default()
        }
    }

    pub fn start_points(&self) -> i64 {
        self.start_points.unwrap_or(0)
    }

    pub fn disciplines(&self) -> &[DisciplineRecord] {
        self.disciplines.as_deref().unwrap_or_default()
    }

    /// Whether `reference` is already memorized, whatever shape the record has
    pub fn has_verse(&self, reference: &str) -> bool {
        self.memorized_verses
            .iter()
            .any(|verse| verse.reference() == reference)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    /// Calendar day, `YYYY-MM-DD`
    pub date: String,
    /// Open activity tag (embaixada, igreja, pg, ...)
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A memorized verse: legacy documents hold bare strings, current ones objects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VerseRecord {
    Plain(String),
    Detailed(VerseEntry),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerseEntry {
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspended: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VerseRecord {
    pub fn reference(&self) -> &str {
        match self {
            VerseRecord::Plain(reference) => reference,
            VerseRecord::Detailed(entry) => &entry.reference,
        }
    }

    pub fn added_at(&self) -> Option<&str> {
        match self {
            VerseRecord::Plain(_) => None,
            VerseRecord::Detailed(entry) => entry.added_at.as_deref(),
        }
    }

    /// Suspended verses stay listed but earn nothing
    pub fn is_suspended(&self) -> bool {
        match self {
            VerseRecord::Plain(_) => false,
            VerseRecord::Detailed(entry) => entry.suspended.unwrap_or(false),
        }
    }

    /// Object form of the record
    pub fn to_entry(&self) -> VerseEntry {
        match self {
            VerseRecord::Plain(reference) => VerseEntry {
                reference: reference.clone(),
                ..Default::default()
            },
            VerseRecord::Detailed(entry) => entry.clone(),
        }
    }
}

/// A visitor brought by a participant: bare name (legacy) or object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VisitorRecord {
    Plain(String),
    Detailed(VisitorEntry),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VisitorRecord {
    pub fn name(&self) -> &str {
        match self {
            VisitorRecord::Plain(name) => name,
            VisitorRecord::Detailed(entry) => &entry.name,
        }
    }

    pub fn added_at(&self) -> Option<&str> {
        match self {
            VisitorRecord::Plain(_) => None,
            VisitorRecord::Detailed(entry) => entry.added_at.as_deref(),
        }
    }

    pub fn to_entry(&self) -> VisitorEntry {
        match self {
            VisitorRecord::Plain(name) => VisitorEntry {
                name: name.clone(),
                ..Default::default()
            },
            VisitorRecord::Detailed(entry) => entry.clone(),
        }
    }
}

/// Penalty (or correction) carrying its own signed point value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisciplineRecord {
    pub points: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Progress towards the "candidato" rank
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidatoProgress {
    #[serde(default)]
    pub prerequisites: bool,
    #[serde(default)]
    pub manual_tasks: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesDocument {
    #[serde(default)]
    pub rules: Vec<Rule>,
}

/// A scoring rule as shown on the site ("Presença na Embaixada", +10)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub description: String,
    pub points: i64,
    /// Structured key matched against attendance types before any text search
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<String>,
}

impl Rule {
    pub fn new(description: &str, points: i64) -> Self {
        Self {
            description: description.to_string(),
            points,
            ..Default::default()
        }
    }

    pub fn with_activity_type(mut self, activity_type: &str) -> Self {
        self.activity_type = Some(activity_type.to_string());
        self
    }
}

/// Bible version identifier used by the content API (numeric for YouVersion)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BibleId {
    Numeric(u64),
    Text(String),
}

impl fmt::Display for BibleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BibleId::Numeric(id) => write!(f, "{}", id),
            BibleId::Text(id) => write!(f, "{}", id),
        }
    }
}

/// Verse metadata produced by `fetch-verses`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersesDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_version: Option<String>,
    #[serde(default)]
    pub versions: BTreeMap<String, BibleVersionInfo>,
    /// reference -> version abbreviation -> text
    #[serde(default)]
    pub verses: BTreeMap<String, BTreeMap<String, VerseText>>,
}

impl VersesDocument {
    pub fn word_count(&self, reference: &str, version: &str) -> Option<u32> {
        self.verses
            .get(reference)
            .and_then(|versions| versions.get(version))
            .map(|text| text.word_count)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BibleVersionInfo {
    pub id: BibleId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerseText {
    pub reference: String,
    pub text: String,
    pub word_count: u32,
    pub youversion_url: String,
}

/// `bible-versions.json`: which translations `fetch-verses` downloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BibleVersionsConfig {
    pub default_version: String,
    pub versions: Vec<ConfiguredVersion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfiguredVersion {
    pub id: BibleId,
    pub abbreviation: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GamesDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub default_rules: Vec<GameRule>,
    #[serde(default)]
    pub games: Vec<Game>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRule {
    pub position: u32,
    pub label: String,
    pub points: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: u32,
    pub name: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<GameRule>>,
    #[serde(default)]
    pub results: Vec<GameResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    pub participant_id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    pub points: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub challenges: Vec<BonusChallenge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusChallenge {
    pub id: u32,
    pub name: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub results: Vec<BonusResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusResult {
    pub participant_id: u32,
    pub points: i64,
}
