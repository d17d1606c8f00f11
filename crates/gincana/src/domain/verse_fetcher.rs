//! Fetches the text of every memorized verse in every configured Bible version

use gincana_core::{
    clean_verse_text, count_words, expand_verse_range, is_verse_range, now_timestamp,
    parse_reference, BibleVersionInfo, BibleVersionsConfig, LeaderboardDocument, VerseTier,
    VerseText, VersesDocument,
};
use itertools::Itertools;
use log::{error, info, warn};
use std::{collections::BTreeMap, sync::Arc, time::Duration};

use crate::infra::bible::BibleApi;

/// Unique single verse references across all participants, first seen order, ranges expanded
pub fn collect_references(document: &LeaderboardDocument) -> Vec<String> {
    document
        .participants
        .iter()
        .flat_map(|participant| participant.memorized_verses.iter())
        .map(|verse| verse.reference().to_string())
        .unique()
        .flat_map(|reference| {
            if is_verse_range(&reference) {
                let expanded = expand_verse_range(&reference);
                info!("expanding range {} into {} verses", reference, expanded.len());
                expanded
            } else {
                vec![reference]
            }
        })
        .unique()
        .collect()
}

pub fn youversion_url(bible_id: &impl std::fmt::Display, usfm: &str) -> String {
    format!("https://www.bible.com/pt/bible/{}/{}", bible_id, usfm)
}

/// Outcome of one fetch run
#[derive(Debug, Clone, Default)]
pub struct FetchReport {
    pub document: VersesDocument,
    /// References that could not be resolved to a book, never requested
    pub skipped: Vec<String>,
    /// (reference, version) pairs the API did not deliver
    pub unavailable: Vec<(String, String)>,
}

impl FetchReport {
    pub fn fetched(&self) -> usize {
        self.document.verses.values().map(|versions| versions.len()).sum()
    }

    /// One line per reference with the word count and tier in every version
    pub fn word_count_lines(&self) -> Vec<String> {
        let abbreviations: Vec<&String> = self.document.versions.keys().collect();
        let mut lines = vec![format!(
            "{:<16} | {}",
            "Referência",
            abbreviations.iter().map(|abbr| format!("{:<10}", abbr)).join(" | ")
        )];

        for (reference, versions) in &self.document.verses {
            let cells = abbreviations
                .iter()
                .map(|abbr| match versions.get(*abbr) {
                    Some(text) => {
                        let tier = match VerseTier::for_word_count(Some(text.word_count)) {
                            VerseTier::Large => ">=20",
                            VerseTier::Small => "<20",
                        };
                        format!("{:>3}w {:<5}", text.word_count, tier)
                    }
                    None => format!("{:<10}", "--"),
                })
                .join(" | ");
            lines.push(format!("{:<16} | {}", reference, cells));
        }
        lines
    }
}

pub struct VerseFetcher {
    bible: Arc<dyn BibleApi>,
    delay: Duration,
}

impl VerseFetcher {
    pub fn new(bible: Arc<dyn BibleApi>, delay: Duration) -> Self {
        Self { bible, delay }
    }

    /// Request every reference in every configured version, one call at a time.
    ///
    /// Failures are recorded in the report and never stop the run.
    pub async fn fetch(&self, config: &BibleVersionsConfig, references: &[String]) -> FetchReport {
        let mut report = FetchReport {
            document: VersesDocument {
                generated_at: Some(now_timestamp()),
                default_version: Some(config.default_version.clone()),
                ..Default::default()
            },
            ..Default::default()
        };

        if references.is_empty() {
            info!("no verses to fetch");
            return report;
        }

        for version in &config.versions {
            report.document.versions.insert(
                version.abbreviation.clone(),
                BibleVersionInfo {
                    id: version.id.clone(),
                    name: version.name.clone(),
                    full_title: Some(version.name.clone()),
                },
            );
        }

        for reference in references {
            let usfm = match parse_reference(reference) {
                Ok(verse) => verse.to_string(),
                Err(e) => {
                    warn!("skipping {}", e);
                    report.skipped.push(reference.clone());
                    continue;
                }
            };
            info!("fetching {} ({})", reference, usfm);

            let mut texts = BTreeMap::new();
            for version in &config.versions {
                match self.bible.get_passage(&version.id, &usfm).await {
                    Ok(passage) => {
                        let text = clean_verse_text(&passage.content);
                        texts.insert(
                            version.abbreviation.clone(),
                            VerseText {
                                reference: passage
                                    .reference
                                    .filter(|name| !name.trim().is_empty())
                                    .unwrap_or_else(|| reference.clone()),
                                word_count: count_words(&text),
                                text,
                                youversion_url: youversion_url(&version.id, &usfm),
                            },
                        );
                    }
                    Err(e) => {
                        if e.is_transient() {
                            warn!(
                                "{} {} still unavailable after retries: {}",
                                version.abbreviation, reference, e
                            );
                        } else {
                            error!("{} {}: {}", version.abbreviation, reference, e);
                        }
                        report
                            .unavailable
                            .push((reference.clone(), version.abbreviation.clone()));
                    }
                }
                if !self.delay.is_zero() {
                    tokio::time::sleep(self.delay).await;
                }
            }
            report.document.verses.insert(reference.clone(), texts);
        }

        report
    }
}
