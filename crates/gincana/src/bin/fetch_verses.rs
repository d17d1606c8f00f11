use anyhow::anyhow;
use gincana::{
    build_reqwest_client,
    domain::{collect_references, VerseFetcher},
    get_settings,
    infra::{
        bible::YouVersionClient,
        json_file::{read_json, write_json},
    },
    setup_logger,
};
use gincana_core::{BibleVersionsConfig, LeaderboardDocument};
use log::{info, warn};
use std::{sync::Arc, time::Duration};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = get_settings()?;
    setup_logger(settings.level.clone(), vec![String::from("hyper")])?;

    let data = &settings.data_settings;
    let bible = &settings.bible_settings;

    let versions: BibleVersionsConfig = read_json(&data.bible_versions_path()).await?;
    info!(
        "loaded {} bible versions (default {})",
        versions.versions.len(),
        versions.default_version
    );

    let leaderboard: LeaderboardDocument = read_json(&data.leaderboard_path()).await?;
    let references = collect_references(&leaderboard);
    info!(
        "found {} unique verses across {} participants",
        references.len(),
        leaderboard.participants.len()
    );

    let api_key = bible.api_key().ok_or_else(|| {
        anyhow!("no bible api key, set bible_settings.api_key or YOUVERSION_API_KEY")
    })?;
    let client = YouVersionClient::new(
        build_reqwest_client(bible.max_retries),
        &bible.base_url,
        api_key,
    );
    let fetcher = VerseFetcher::new(
        Arc::new(client),
        Duration::from_millis(bible.request_delay_ms),
    );

    let report = fetcher.fetch(&versions, &references).await;

    let verses_path = data.verses_path();
    write_json(&verses_path, &report.document).await?;
    info!("wrote {}", verses_path.display());

    for line in report.word_count_lines() {
        info!("{}", line);
    }
    for reference in &report.skipped {
        warn!("skipped unrecognized reference {}", reference);
    }
    for (reference, version) in &report.unavailable {
        warn!("{} unavailable in {}", reference, version);
    }
    info!(
        "fetched {} verse texts for {} references, {} skipped, {} unavailable",
        report.fetched(),
        references.len(),
        report.skipped.len(),
        report.unavailable.len()
    );
    Ok(())
}
