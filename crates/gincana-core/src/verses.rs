//! Verse text helpers and word count tiers

/// Verses with at least this many words earn the large verse value
pub const VERSE_WORD_THRESHOLD: u32 = 20;
/// Used when no "<20" rule is configured
pub const DEFAULT_SMALL_VERSE_POINTS: i64 = 25;
/// Used when no ">=20" rule is configured
pub const DEFAULT_LARGE_VERSE_POINTS: i64 = 35;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerseTier {
    Small,
    Large,
}

impl VerseTier {
    /// Tier for a verse; unknown word counts fall in the small tier, never zero
    pub fn for_word_count(word_count: Option<u32>) -> Self {
        match word_count {
            Some(count) if count >= VERSE_WORD_THRESHOLD => VerseTier::Large,
            _ => VerseTier::Small,
        }
    }
}

/// Count words ignoring punctuation, accented letters count as letters
pub fn count_words(text: &str) -> u32 {
    text.chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .count() as u32
}

/// Collapse runs of whitespace (line breaks from the API included) into single spaces
pub fn clean_verse_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
