use axum::{
    extract::{Query, State},
    response::{ErrorResponse, Html},
};
use log::error;
use std::sync::Arc;

use crate::{
    api::routes::VersionQuery,
    startup::AppState,
    templates::{
        layouts::base::{base, PageConfig},
        pages::leaderboard_page,
    },
};

pub async fn leaderboard_page_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VersionQuery>,
) -> Result<Html<String>, ErrorResponse> {
    let view = state
        .scoreboard
        .view(query.version.as_deref())
        .await
        .map_err(|e| {
            error!("error rendering leaderboard page: {:?}", e);
            ErrorResponse::from(e)
        })?;

    let config = PageConfig {
        title: &state.title,
        version: &view.rankings.version,
    };
    let content = leaderboard_page(&view.rankings, &view.rules);
    Ok(Html(base(&config, content).into_string()))
}
