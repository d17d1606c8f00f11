//! Recent activity feed across all participants

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use time::OffsetDateTime;

use crate::{parse_timestamp, LeaderboardDocument};

/// Number of entries returned by the activity history endpoint
pub const ACTIVITY_HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Attendance,
    Verse,
    Visitor,
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityKind::Attendance => write!(f, "attendance"),
            ActivityKind::Verse => write!(f, "verse"),
            ActivityKind::Visitor => write!(f, "visitor"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityItem {
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub participant_id: u32,
    pub participant_name: String,
    /// Position inside the participant's list, usable for deletion
    pub index: usize,
    /// The record itself, legacy strings normalized to objects
    pub data: Value,
    /// Creation timestamp; untimed records report the epoch
    pub added_at: String,
}

const EPOCH: &str = "1970-01-01T00:00:00.000Z";

/// Sort key and reported timestamp; missing or unparseable values fall back to the epoch
fn timestamp_of(added_at: Option<&str>) -> (OffsetDateTime, &str) {
    added_at
        .and_then(|raw| parse_timestamp(raw).ok().map(|at| (at, raw)))
        .unwrap_or((OffsetDateTime::UNIX_EPOCH, EPOCH))
}

/// Most recent attendance, verse and visitor records, newest first.
///
/// The sort is stable, so records with the same timestamp keep document order.
pub fn recent_activity(document: &LeaderboardDocument, limit: usize) -> Vec<ActivityItem> {
    let mut items: Vec<(OffsetDateTime, ActivityItem)> = Vec::new();

    for participant in &document.participants {
        let mut push = |kind, index, data: Value, added_at: Option<&str>| {
            let (key, reported) = timestamp_of(added_at);
            items.push((
                key,
                ActivityItem {
                    kind,
                    participant_id: participant.id,
                    participant_name: participant.name.clone(),
                    index,
                    data,
                    added_at: reported.to_string(),
                },
            ));
        };

        for (index, record) in participant.attendance.iter().enumerate() {
            let data = serde_json::to_value(record).unwrap_or_else(|_| json!({}));
            push(ActivityKind::Attendance, index, data, record.added_at.as_deref());
        }
        for (index, verse) in participant.memorized_verses.iter().enumerate() {
            let data = serde_json::to_value(verse.to_entry())
                .unwrap_or_else(|_| json!({ "ref": verse.reference() }));
            push(ActivityKind::Verse, index, data, verse.added_at());
        }
        for (index, visitor) in participant.visitors.iter().enumerate() {
            let data = serde_json::to_value(visitor.to_entry())
                .unwrap_or_else(|_| json!({ "name": visitor.name() }));
            push(ActivityKind::Visitor, index, data, visitor.added_at());
        }
    }

    items.sort_by(|(a, _), (b, _)| b.cmp(a));
    items
        .into_iter()
        .take(limit)
        .map(|(_, item)| item)
        .collect()
}
