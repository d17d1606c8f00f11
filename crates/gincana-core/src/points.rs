//! Points calculation for participants
//!
//! Rule values come from `rules.json` so the site can change them without a release.
//! Rules are resolved by their structured `activityType` first and by a
//! case-insensitive search of their description otherwise.

use log::debug;
use time::OffsetDateTime;

use crate::{
    expand_verse_range, parse_timestamp, BonusDocument, GamesDocument, Participant, Rule,
    VerseTier, VersesDocument, DEFAULT_LARGE_VERSE_POINTS, DEFAULT_SMALL_VERSE_POINTS,
};

/// Translation used when neither the caller nor the verses document names one
pub const DEFAULT_BIBLE_VERSION: &str = "NVI";

/// Everything besides the participant that scoring depends on
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    pub rules: &'a [Rule],
    pub verses: Option<&'a VersesDocument>,
    /// Bible version abbreviation whose word counts are used
    pub version: &'a str,
    pub games: Option<&'a GamesDocument>,
    pub bonus: Option<&'a BonusDocument>,
}

impl<'a> ScoringContext<'a> {
    pub fn new(rules: &'a [Rule]) -> Self {
        Self {
            rules,
            verses: None,
            version: DEFAULT_BIBLE_VERSION,
            games: None,
            bonus: None,
        }
    }

    pub fn with_verses(mut self, verses: Option<&'a VersesDocument>) -> Self {
        self.verses = verses;
        self
    }

    pub fn with_version(mut self, version: &'a str) -> Self {
        self.version = version;
        self
    }

    pub fn with_games(mut self, games: Option<&'a GamesDocument>) -> Self {
        self.games = games;
        self
    }

    pub fn with_bonus(mut self, bonus: Option<&'a BonusDocument>) -> Self {
        self.bonus = bonus;
        self
    }
}

/// Points of the first rule keyed by `activity_type`, 0 when there is none
pub fn rule_points_by_activity_type(rules: &[Rule], activity_type: &str) -> i64 {
    rules
        .iter()
        .find(|rule| rule.activity_type.as_deref() == Some(activity_type))
        .map(|rule| rule.points)
        .unwrap_or(0)
}

/// Points of the first rule whose description contains `pattern` (case-insensitive)
pub fn rule_points_by_pattern(rules: &[Rule], pattern: &str) -> i64 {
    let pattern = pattern.to_lowercase();
    rules
        .iter()
        .find(|rule| rule.description.to_lowercase().contains(&pattern))
        .map(|rule| rule.points)
        .unwrap_or(0)
}

/// Points for one attendance record of type `kind`.
///
/// A structured rule worth 0 looks the same as a missing one, so it falls through to
/// the description search.
pub fn attendance_points(rules: &[Rule], kind: &str) -> i64 {
    let by_type = rule_points_by_activity_type(rules, kind);
    if by_type != 0 {
        return by_type;
    }
    match kind {
        "embaixada" => rule_points_by_pattern(rules, "embaixada"),
        "igreja" => rule_points_by_pattern(rules, "compromissos"),
        other => rule_points_by_pattern(rules, other),
    }
}

pub fn visitor_points(rules: &[Rule]) -> i64 {
    rule_points_by_pattern(rules, "visitante")
}

pub fn small_verse_points(rules: &[Rule]) -> i64 {
    match rule_points_by_pattern(rules, "<20") {
        0 => DEFAULT_SMALL_VERSE_POINTS,
        points => points,
    }
}

pub fn large_verse_points(rules: &[Rule]) -> i64 {
    match rule_points_by_pattern(rules, ">=20") {
        0 => DEFAULT_LARGE_VERSE_POINTS,
        points => points,
    }
}

/// Points for a memorized reference; ranges score every verse they cover
pub fn verse_points(context: &ScoringContext<'_>, reference: &str) -> i64 {
    let small = small_verse_points(context.rules);
    let large = large_verse_points(context.rules);

    expand_verse_range(reference)
        .iter()
        .map(|single| {
            let word_count = context
                .verses
                .and_then(|verses| verses.word_count(single, context.version));
            match VerseTier::for_word_count(word_count) {
                VerseTier::Small => small,
                VerseTier::Large => large,
            }
        })
        .sum()
}

pub fn game_points(games: Option<&GamesDocument>, participant_id: u32) -> i64 {
    games
        .map(|games| {
            games
                .games
                .iter()
                .flat_map(|game| game.results.iter())
                .filter(|result| result.participant_id == participant_id)
                .map(|result| result.points)
                .sum()
        })
        .unwrap_or(0)
}

pub fn bonus_points(bonus: Option<&BonusDocument>, participant_id: u32) -> i64 {
    bonus
        .map(|bonus| {
            bonus
                .challenges
                .iter()
                .flat_map(|challenge| challenge.results.iter())
                .filter(|result| result.participant_id == participant_id)
                .map(|result| result.points)
                .sum()
        })
        .unwrap_or(0)
}

/// Per category contributions to a participant's total
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointsBreakdown {
    pub baseline: i64,
    pub attendance: i64,
    pub visitors: i64,
    pub verses: i64,
    pub candidato: i64,
    pub discipline: i64,
    pub games: i64,
    pub bonus: i64,
}

impl PointsBreakdown {
    pub fn total(&self) -> i64 {
        self.baseline
            + self.attendance
            + self.visitors
            + self.verses
            + self.candidato
            + self.discipline
            + self.games
            + self.bonus
    }
}

pub fn compute_breakdown(participant: &Participant, context: &ScoringContext<'_>) -> PointsBreakdown {
    let rules = context.rules;

    let attendance = participant
        .attendance
        .iter()
        .map(|record| attendance_points(rules, &record.kind))
        .sum();

    let visitors = participant.visitors.len() as i64 * visitor_points(rules);

    let verses = participant
        .memorized_verses
        .iter()
        .filter(|verse| !verse.is_suspended())
        .map(|verse| verse_points(context, verse.reference()))
        .sum();

    let candidato = participant
        .candidato_progress
        .as_ref()
        .map(|progress| {
            let prerequisites = if progress.prerequisites {
                rule_points_by_pattern(rules, "pre-requisitos")
            } else {
                0
            };
            prerequisites + progress.manual_tasks * rule_points_by_pattern(rules, "tarefa manual")
        })
        .unwrap_or(0);

    let discipline = participant
        .disciplines()
        .iter()
        .map(|record| record.points)
        .sum();

    PointsBreakdown {
        baseline: participant.start_points(),
        attendance,
        visitors,
        verses,
        candidato,
        discipline,
        games: game_points(context.games, participant.id),
        bonus: bonus_points(context.bonus, participant.id),
    }
}

/// Total score of a participant; may be negative, nothing is clamped
pub fn compute_total(participant: &Participant, context: &ScoringContext<'_>) -> i64 {
    compute_breakdown(participant, context).total()
}

/// Whether a record created at `added_at` counts for the delta since `cutoff`
fn recorded_since(added_at: Option<&str>, cutoff: OffsetDateTime) -> bool {
    let Some(added_at) = added_at else {
        return false;
    };
    match parse_timestamp(added_at) {
        Ok(at) => at >= cutoff,
        Err(e) => {
            debug!("ignoring record in delta: {}", e);
            false
        }
    }
}

/// Points earned by attendance, verses and visitors recorded at or after `cutoff`
pub fn compute_delta(
    participant: &Participant,
    context: &ScoringContext<'_>,
    cutoff: OffsetDateTime,
) -> i64 {
    let rules = context.rules;

    let attendance: i64 = participant
        .attendance
        .iter()
        .filter(|record| recorded_since(record.added_at.as_deref(), cutoff))
        .map(|record| attendance_points(rules, &record.kind))
        .sum();

    let visitors = participant
        .visitors
        .iter()
        .filter(|visitor| recorded_since(visitor.added_at(), cutoff))
        .count() as i64
        * visitor_points(rules);

    let verses: i64 = participant
        .memorized_verses
        .iter()
        .filter(|verse| !verse.is_suspended() && recorded_since(verse.added_at(), cutoff))
        .map(|verse| verse_points(context, verse.reference()))
        .sum();

    attendance + visitors + verses
}
