use axum::{extract::State, http::StatusCode, response::ErrorResponse};
use log::error;
use std::sync::Arc;

use crate::startup::AppState;

/// Healthy as long as the leaderboard document can be read and parsed
pub async fn health(State(state): State<Arc<AppState>>) -> Result<StatusCode, ErrorResponse> {
    match state.admin.leaderboard().await {
        Ok(_) => Ok(StatusCode::OK),
        Err(e) => {
            error!("health check failed: {:?}", e);
            Err(e.into())
        }
    }
}
