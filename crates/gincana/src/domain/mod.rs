mod admin;
mod scoring;
mod snapshot;
mod store;
mod verse_fetcher;

pub use admin::*;
pub use scoring::*;
pub use snapshot::*;
pub use store::*;
pub use verse_fetcher::*;

use thiserror::Error;

use crate::infra::json_file;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("problem accessing data file: {0}")]
    Store(#[from] json_file::Error),
}

impl Error {
    pub fn participant_not_found() -> Self {
        Error::NotFound(String::from("Participant not found"))
    }
}
