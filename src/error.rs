//! Error types for each layer
//!
//! - `SourceError`: content API client errors
//! - `ContentError`: raw records that cannot become post summaries
//! - `DateError`: unparseable timestamps and bad date settings
//! - `ListError`: failures surfaced by the paginated list controller

use thiserror::Error;

/// Content API client errors
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Unauthorized - invalid access token")]
    Unauthorized,

    #[error("No master ref advertised by {0}")]
    NoMasterRef(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

/// Date parsing and formatting errors
#[derive(Debug, Error)]
pub enum DateError {
    #[error("Unparseable date: {0}")]
    Unparseable(String),

    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error("No date locale for language: {0}")]
    UnsupportedLocale(String),

    #[error("Unsupported date token: {0}")]
    UnsupportedToken(String),

    #[error("Invalid date format: {0}")]
    InvalidPattern(String),
}

/// Raw post records that cannot be turned into summaries
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Document {0} has no uid")]
    MissingUid(String),

    #[error("Document {uid}: {source}")]
    InvalidDate {
        uid: String,
        #[source]
        source: DateError,
    },
}

/// Errors surfaced by `PaginatedList::load_next_page`
#[derive(Debug, Error)]
pub enum ListError {
    #[error("Network failure: {0}")]
    Network(SourceError),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
}

impl From<SourceError> for ListError {
    fn from(e: SourceError) -> Self {
        match e {
            SourceError::Deserialization(msg) => ListError::MalformedPayload(msg),
            other => ListError::Network(other),
        }
    }
}

impl From<ContentError> for ListError {
    fn from(e: ContentError) -> Self {
        ListError::MalformedPayload(e.to_string())
    }
}
