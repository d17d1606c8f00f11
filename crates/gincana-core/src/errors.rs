//! Shared error types

use thiserror::Error;

/// Errors produced while interpreting user entered values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid reference format: \"{0}\"")]
    InvalidReference(String),

    #[error("unknown book abbreviation \"{book}\" in reference \"{reference}\"")]
    UnknownBook { book: String, reference: String },

    #[error("verse range \"{reference}\" covers more than {max} verses")]
    RangeTooLong { reference: String, max: u32 },

    #[error("invalid date \"{0}\", expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid timestamp \"{0}\", expected an RFC 3339 timestamp or YYYY-MM-DD")]
    InvalidTimestamp(String),
}
