use axum::{extract::State, response::ErrorResponse, Json};
use gincana_core::Participant;
use log::error;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    api::extractors::{ApiJson, ApiPath},
    domain::{
        AddAttendance, AddBulkAttendance, AddDiscipline, AddParticipant, AddVerse, AddVisitor,
    },
    startup::AppState,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantResponse {
    pub success: bool,
    pub participant: Participant,
}

impl From<Participant> for ParticipantResponse {
    fn from(participant: Participant) -> Self {
        Self {
            success: true,
            participant,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkAttendanceResponse {
    pub success: bool,
    pub updated_ids: Vec<u32>,
}

pub async fn add_participant(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<AddParticipant>,
) -> Result<Json<ParticipantResponse>, ErrorResponse> {
    state
        .admin
        .add_participant(body)
        .await
        .map(|participant| Json(participant.into()))
        .map_err(|e| {
            error!("error adding participant: {:?}", e);
            e.into()
        })
}

pub async fn add_attendance(
    State(state): State<Arc<AppState>>,
    ApiPath(participant_id): ApiPath<u32>,
    ApiJson(body): ApiJson<AddAttendance>,
) -> Result<Json<ParticipantResponse>, ErrorResponse> {
    state
        .admin
        .add_attendance(participant_id, body)
        .await
        .map(|participant| Json(participant.into()))
        .map_err(|e| {
            error!("error adding attendance: {:?}", e);
            e.into()
        })
}

pub async fn add_bulk_attendance(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<AddBulkAttendance>,
) -> Result<Json<BulkAttendanceResponse>, ErrorResponse> {
    state
        .admin
        .add_bulk_attendance(body)
        .await
        .map(|updated_ids| {
            Json(BulkAttendanceResponse {
                success: true,
                updated_ids,
            })
        })
        .map_err(|e| {
            error!("error adding bulk attendance: {:?}", e);
            e.into()
        })
}

pub async fn remove_attendance(
    State(state): State<Arc<AppState>>,
    ApiPath((participant_id, index)): ApiPath<(u32, usize)>,
) -> Result<Json<ParticipantResponse>, ErrorResponse> {
    state
        .admin
        .remove_attendance(participant_id, index)
        .await
        .map(|participant| Json(participant.into()))
        .map_err(|e| {
            error!("error removing attendance: {:?}", e);
            e.into()
        })
}

pub async fn add_verse(
    State(state): State<Arc<AppState>>,
    ApiPath(participant_id): ApiPath<u32>,
    ApiJson(body): ApiJson<AddVerse>,
) -> Result<Json<ParticipantResponse>, ErrorResponse> {
    state
        .admin
        .add_verse(participant_id, body)
        .await
        .map(|participant| Json(participant.into()))
        .map_err(|e| {
            error!("error adding verse: {:?}", e);
            e.into()
        })
}

pub async fn remove_verse(
    State(state): State<Arc<AppState>>,
    ApiPath((participant_id, index)): ApiPath<(u32, usize)>,
) -> Result<Json<ParticipantResponse>, ErrorResponse> {
    state
        .admin
        .remove_verse(participant_id, index)
        .await
        .map(|participant| Json(participant.into()))
        .map_err(|e| {
            error!("error removing verse: {:?}", e);
            e.into()
        })
}

pub async fn add_visitor(
    State(state): State<Arc<AppState>>,
    ApiPath(participant_id): ApiPath<u32>,
    ApiJson(body): ApiJson<AddVisitor>,
) -> Result<Json<ParticipantResponse>, ErrorResponse> {
    state
        .admin
        .add_visitor(participant_id, body)
        .await
        .map(|participant| Json(participant.into()))
        .map_err(|e| {
            error!("error adding visitor: {:?}", e);
            e.into()
        })
}

pub async fn remove_visitor(
    State(state): State<Arc<AppState>>,
    ApiPath((participant_id, index)): ApiPath<(u32, usize)>,
) -> Result<Json<ParticipantResponse>, ErrorResponse> {
    state
        .admin
        .remove_visitor(participant_id, index)
        .await
        .map(|participant| Json(participant.into()))
        .map_err(|e| {
            error!("error removing visitor: {:?}", e);
            e.into()
        })
}

pub async fn add_discipline(
    State(state): State<Arc<AppState>>,
    ApiPath(participant_id): ApiPath<u32>,
    ApiJson(body): ApiJson<AddDiscipline>,
) -> Result<Json<ParticipantResponse>, ErrorResponse> {
    state
        .admin
        .add_discipline(participant_id, body)
        .await
        .map(|participant| Json(participant.into()))
        .map_err(|e| {
            error!("error adding discipline: {:?}", e);
            e.into()
        })
}

pub async fn remove_discipline(
    State(state): State<Arc<AppState>>,
    ApiPath((participant_id, index)): ApiPath<(u32, usize)>,
) -> Result<Json<ParticipantResponse>, ErrorResponse> {
    state
        .admin
        .remove_discipline(participant_id, index)
        .await
        .map(|participant| Json(participant.into()))
        .map_err(|e| {
            error!("error removing discipline: {:?}", e);
            e.into()
        })
}
