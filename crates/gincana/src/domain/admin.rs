use gincana_core::{
    check_range_size, now_timestamp, parse_cutoff, parse_local_date, recent_activity, ActivityItem,
    AttendanceRecord, DisciplineRecord, LeaderboardDocument, Participant, VerseEntry,
    VerseRecord, VisitorEntry, VisitorRecord, ACTIVITY_HISTORY_LIMIT,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use super::{Error, LeaderboardStore};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddParticipant {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddAttendance {
    pub date: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddBulkAttendance {
    /// Kept loose so ids sent as strings ("3") are accepted like numbers
    pub participant_ids: Option<Value>,
    pub date: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddVerse {
    #[serde(rename = "ref")]
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddVisitor {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddDiscipline {
    pub points: Option<i64>,
    pub reason: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPointsAsOf {
    pub points_as_of: Option<String>,
}

/// A required text field: absent and blank are both missing
fn required(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn validate_date(date: &str) -> Result<(), Error> {
    parse_local_date(date)
        .map(|_| ())
        .map_err(|e| Error::BadRequest(e.to_string()))
}

fn participant_ids(value: &Value) -> Option<Vec<u32>> {
    let ids = value.as_array()?;
    Some(
        ids.iter()
            .filter_map(|id| match id {
                Value::Number(number) => number.as_u64(),
                Value::String(text) => text.trim().parse().ok(),
                _ => None,
            })
            .filter_map(|id| u32::try_from(id).ok())
            .collect(),
    )
}

fn find_participant(
    document: &mut LeaderboardDocument,
    id: u32,
) -> Result<&mut Participant, Error> {
    document
        .participant_mut(id)
        .ok_or_else(Error::participant_not_found)
}

fn remove_at<T>(list: &mut Vec<T>, index: usize, label: &str) -> Result<T, Error> {
    if index >= list.len() {
        return Err(Error::BadRequest(format!("Invalid {} index", label)));
    }
    Ok(list.remove(index))
}

/// Read-modify-write operations behind the admin API
pub struct Admin {
    store: Arc<LeaderboardStore>,
}

impl Admin {
    pub fn new(store: Arc<LeaderboardStore>) -> Self {
        Self { store }
    }

    pub async fn leaderboard(&self) -> Result<LeaderboardDocument, Error> {
        self.store.read().await
    }

    pub async fn add_participant(&self, body: AddParticipant) -> Result<Participant, Error> {
        let name =
            required(body.name).ok_or_else(|| Error::BadRequest(String::from("name is required")))?;

        let participant = self
            .store
            .update(move |document| {
                let participant = Participant::new(document.next_participant_id(), name);
                document.participants.push(participant.clone());
                Ok(participant)
            })
            .await?;
        info!("added participant {} ({})", participant.id, participant.name);
        Ok(participant)
    }

    pub async fn add_attendance(&self, id: u32, body: AddAttendance) -> Result<Participant, Error> {
        let (Some(date), Some(kind)) = (required(body.date), required(body.kind)) else {
            return Err(Error::BadRequest(String::from("date and type are required")));
        };
        validate_date(&date)?;

        self.store
            .update(move |document| {
                let participant = find_participant(document, id)?;
                participant.attendance.push(AttendanceRecord {
                    date,
                    kind,
                    added_at: Some(now_timestamp()),
                    ..Default::default()
                });
                Ok(participant.clone())
            })
            .await
    }

    /// Add the same attendance to many participants; unknown ids are skipped
    pub async fn add_bulk_attendance(&self, body: AddBulkAttendance) -> Result<Vec<u32>, Error> {
        let ids = body.participant_ids.as_ref().and_then(participant_ids);
        let (Some(ids), Some(date), Some(kind)) = (ids, required(body.date), required(body.kind))
        else {
            return Err(Error::BadRequest(String::from(
                "participantIds (array), date, and type are required",
            )));
        };
        validate_date(&date)?;

        self.store
            .update(move |document| {
                let added_at = now_timestamp();
                let mut updated = Vec::new();
                for id in ids {
                    match document.participant_mut(id) {
                        Some(participant) => {
                            participant.attendance.push(AttendanceRecord {
                                date: date.clone(),
                                kind: kind.clone(),
                                added_at: Some(added_at.clone()),
                                ..Default::default()
                            });
                            updated.push(participant.id);
                        }
                        None => debug!("bulk attendance skipping unknown participant {}", id),
                    }
                }
                Ok(updated)
            })
            .await
    }

    pub async fn remove_attendance(&self, id: u32, index: usize) -> Result<Participant, Error> {
        self.store
            .update(move |document| {
                let participant = find_participant(document, id)?;
                remove_at(&mut participant.attendance, index, "attendance")?;
                Ok(participant.clone())
            })
            .await
    }

    pub async fn add_verse(&self, id: u32, body: AddVerse) -> Result<Participant, Error> {
        let reference = required(body.reference)
            .ok_or_else(|| Error::BadRequest(String::from("ref is required")))?;
        check_range_size(&reference).map_err(|e| Error::BadRequest(e.to_string()))?;

        self.store
            .update(move |document| {
                let participant = find_participant(document, id)?;
                if participant.has_verse(&reference) {
                    return Err(Error::BadRequest(String::from("Verse already memorized")));
                }
                participant
                    .memorized_verses
                    .push(VerseRecord::Detailed(VerseEntry {
                        reference,
                        added_at: Some(now_timestamp()),
                        ..Default::default()
                    }));
                Ok(participant.clone())
            })
            .await
    }

    pub async fn remove_verse(&self, id: u32, index: usize) -> Result<Participant, Error> {
        self.store
            .update(move |document| {
                let participant = find_participant(document, id)?;
                remove_at(&mut participant.memorized_verses, index, "verse")?;
                Ok(participant.clone())
            })
            .await
    }

    pub async fn add_visitor(&self, id: u32, body: AddVisitor) -> Result<Participant, Error> {
        let name =
            required(body.name).ok_or_else(|| Error::BadRequest(String::from("name is required")))?;

        self.store
            .update(move |document| {
                let participant = find_participant(document, id)?;
                participant
                    .visitors
                    .push(VisitorRecord::Detailed(VisitorEntry {
                        name,
                        added_at: Some(now_timestamp()),
                        ..Default::default()
                    }));
                Ok(participant.clone())
            })
            .await
    }

    pub async fn remove_visitor(&self, id: u32, index: usize) -> Result<Participant, Error> {
        self.store
            .update(move |document| {
                let participant = find_participant(document, id)?;
                remove_at(&mut participant.visitors, index, "visitor")?;
                Ok(participant.clone())
            })
            .await
    }

    pub async fn add_discipline(&self, id: u32, body: AddDiscipline) -> Result<Participant, Error> {
        let points = body
            .points
            .ok_or_else(|| Error::BadRequest(String::from("points is required")))?;
        let date = required(body.date);
        if let Some(date) = &date {
            validate_date(date)?;
        }
        let reason = required(body.reason);

        self.store
            .update(move |document| {
                let participant = find_participant(document, id)?;
                participant
                    .disciplines
                    .get_or_insert_with(Vec::new)
                    .push(DisciplineRecord {
                        points,
                        reason,
                        date,
                        added_at: Some(now_timestamp()),
                        ..Default::default()
                    });
                Ok(participant.clone())
            })
            .await
    }

    pub async fn remove_discipline(&self, id: u32, index: usize) -> Result<Participant, Error> {
        self.store
            .update(move |document| {
                let participant = find_participant(document, id)?;
                let disciplines = participant.disciplines.get_or_insert_with(Vec::new);
                remove_at(disciplines, index, "discipline")?;
                Ok(participant.clone())
            })
            .await
    }

    /// Set the cutoff used for deltas; returns the stored value
    pub async fn set_points_as_of(&self, body: SetPointsAsOf) -> Result<String, Error> {
        let points_as_of = required(body.points_as_of)
            .ok_or_else(|| Error::BadRequest(String::from("pointsAsOf is required")))?;
        parse_cutoff(&points_as_of).map_err(|e| Error::BadRequest(e.to_string()))?;

        self.store
            .update(move |document| {
                document.points_as_of = Some(points_as_of.clone());
                Ok(points_as_of)
            })
            .await
    }

    pub async fn activity_history(&self) -> Result<Vec<ActivityItem>, Error> {
        let document = self.store.read().await?;
        Ok(recent_activity(&document, ACTIVITY_HISTORY_LIMIT))
    }
}
