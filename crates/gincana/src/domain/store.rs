use gincana_core::{now_timestamp, LeaderboardDocument};
use log::{debug, warn};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use super::Error;
use crate::infra::json_file::{read_json, write_json};

/// The leaderboard JSON document, the single source of truth for participants.
///
/// Mutations in this process are serialized by an async lock so concurrent requests
/// do not lose each other's updates. Nothing protects against other processes
/// writing the same file.
pub struct LeaderboardStore {
    path: PathBuf,
    mirror_path: Option<PathBuf>,
    write_lock: Mutex<()>,
}

impl LeaderboardStore {
    pub fn new(path: PathBuf, mirror_path: Option<PathBuf>) -> Self {
        Self {
            path,
            mirror_path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn read(&self) -> Result<LeaderboardDocument, Error> {
        Ok(read_json(&self.path).await?)
    }

    /// Refresh `updatedAt` and replace the whole file, then the mirror copy if any
    pub async fn write(&self, document: &mut LeaderboardDocument) -> Result<(), Error> {
        document.updated_at = Some(now_timestamp());
        write_json(&self.path, document).await?;
        debug!("wrote leaderboard to {}", self.path.display());

        if let Some(mirror) = &self.mirror_path {
            if let Err(e) = write_json(mirror, document).await {
                warn!("could not write leaderboard mirror: {}", e);
            }
        }
        Ok(())
    }

    /// Read, apply `change` and write back while holding the write lock.
    ///
    /// Nothing is written when `change` fails.
    pub async fn update<T, F>(&self, change: F) -> Result<T, Error>
    where
        F: FnOnce(&mut LeaderboardDocument) -> Result<T, Error>,
    {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read().await?;
        let result = change(&mut document)?;
        self.write(&mut document).await?;
        Ok(result)
    }
}
