use gincana_core::{compute_total, now_timestamp};
use log::info;

use super::{Error, LeaderboardStore, ScoringData, ScoringFiles};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry {
    pub id: u32,
    pub name: String,
    pub points: i64,
}

/// Store every participant's current total as `previousPoints`.
///
/// Totals use the verses document's default version.
pub async fn snapshot_points(
    store: &LeaderboardStore,
    files: &ScoringFiles,
) -> Result<Vec<SnapshotEntry>, Error> {
    let data = ScoringData::load(files).await?;
    let version = data.default_version().to_string();
    let context = data.context(&version);

    let entries = store
        .update(|document| {
            let now = now_timestamp();
            let entries = document
                .participants
                .iter_mut()
                .map(|participant| {
                    let points = compute_total(participant, &context);
                    participant.previous_points = Some(points);
                    participant.previous_points_at = Some(now.clone());
                    SnapshotEntry {
                        id: participant.id,
                        name: participant.name.clone(),
                        points,
                    }
                })
                .collect::<Vec<_>>();
            Ok(entries)
        })
        .await?;

    for entry in &entries {
        info!("{}: {} pts", entry.name, entry.points);
    }
    info!("snapshot complete, updated {} participants", entries.len());
    Ok(entries)
}
