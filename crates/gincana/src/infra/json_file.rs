//! Whole-document JSON file access
//!
//! Every document is read and written in one piece. Writes go to a sibling
//! temporary file that is renamed over the target, so readers never see a
//! half-written document.

use serde::{de::DeserializeOwned, Serialize};
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tokio::fs;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid json in {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("failed to serialize {path}: {source}")]
    Serialize {
        path: String,
        source: serde_json::Error,
    },
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

pub async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, Error> {
    let content = fs::read_to_string(path).await.map_err(|source| Error::Read {
        path: display(path),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| Error::Parse {
        path: display(path),
        source,
    })
}

/// Like [`read_json`] but a missing file is `None` instead of an error
pub async fn read_optional_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, Error> {
    match fs::read_to_string(path).await {
        Ok(content) => serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| Error::Parse {
                path: display(path),
                source,
            }),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(Error::Read {
            path: display(path),
            source,
        }),
    }
}

/// Write `value` pretty-printed (2 space indent, trailing newline)
pub async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), Error> {
    let mut content = serde_json::to_string_pretty(value).map_err(|source| Error::Serialize {
        path: display(path),
        source,
    })?;
    content.push('\n');

    let write_error = |source| Error::Write {
        path: display(path),
        source,
    };

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(write_error)?;
    }

    let temp = temp_path(path);
    fs::write(&temp, content).await.map_err(write_error)?;
    if let Err(e) = fs::rename(&temp, path).await {
        let _ = fs::remove_file(&temp).await;
        return Err(write_error(e));
    }
    Ok(())
}
