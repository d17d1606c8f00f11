use axum::{
    extract::{Query, State},
    response::ErrorResponse,
    Json,
};
use gincana_core::{ActivityItem, LeaderboardDocument};
use log::error;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    api::extractors::ApiJson,
    domain::{Rankings, SetPointsAsOf},
    startup::AppState,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsAsOfResponse {
    pub success: bool,
    pub points_as_of: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityHistory {
    pub activities: Vec<ActivityItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VersionQuery {
    /// Bible version abbreviation used for verse word counts
    pub version: Option<String>,
}

pub async fn get_leaderboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<LeaderboardDocument>, ErrorResponse> {
    state.admin.leaderboard().await.map(Json).map_err(|e| {
        error!("error reading leaderboard: {:?}", e);
        e.into()
    })
}

pub async fn set_points_as_of(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<SetPointsAsOf>,
) -> Result<Json<PointsAsOfResponse>, ErrorResponse> {
    state
        .admin
        .set_points_as_of(body)
        .await
        .map(|points_as_of| {
            Json(PointsAsOfResponse {
                success: true,
                points_as_of,
            })
        })
        .map_err(|e| {
            error!("error updating pointsAsOf: {:?}", e);
            e.into()
        })
}

pub async fn get_activity_history(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ActivityHistory>, ErrorResponse> {
    state
        .admin
        .activity_history()
        .await
        .map(|activities| Json(ActivityHistory { activities }))
        .map_err(|e| {
            error!("error getting activity history: {:?}", e);
            e.into()
        })
}

pub async fn get_rankings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VersionQuery>,
) -> Result<Json<Rankings>, ErrorResponse> {
    state
        .scoreboard
        .rankings(query.version.as_deref())
        .await
        .map(Json)
        .map_err(|e| {
            error!("error computing rankings: {:?}", e);
            e.into()
        })
}
