use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use time::OffsetDateTime;

use crate::{compute_delta, compute_total, Participant, ScoringContext};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedParticipant {
    /// 1-based position after sorting
    pub rank: usize,
    pub id: u32,
    pub name: String,
    pub points: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_points: Option<i64>,
}

/// Order participants by points descending, then name, then id.
///
/// `delta` is only filled in when a cutoff is given.
pub fn rank_participants(
    participants: &[Participant],
    context: &ScoringContext<'_>,
    cutoff: Option<OffsetDateTime>,
) -> Vec<RankedParticipant> {
    let mut ranked: Vec<RankedParticipant> = participants
        .iter()
        .map(|participant| RankedParticipant {
            rank: 0,
            id: participant.id,
            name: participant.name.clone(),
            points: compute_total(participant, context),
            delta: cutoff.map(|cutoff| compute_delta(participant, context, cutoff)),
            previous_points: participant.previous_points,
        })
        .collect();

    ranked.sort_by(compare_ranked);
    for (position, entry) in ranked.iter_mut().enumerate() {
        entry.rank = position + 1;
    }
    ranked
}

fn compare_ranked(a: &RankedParticipant, b: &RankedParticipant) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}
