use gincana::{
    domain::{snapshot_points, LeaderboardStore},
    get_settings, setup_logger,
};
use log::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = get_settings()?;
    setup_logger(settings.level.clone(), vec![String::from("hyper")])?;

    let data = &settings.data_settings;
    let store = LeaderboardStore::new(data.leaderboard_path(), data.mirror_path());
    info!("snapshotting points in {}", store.path().display());

    let entries = snapshot_points(&store, &data.scoring_files()).await?;
    info!("stored previousPoints for {} participants", entries.len());
    Ok(())
}
