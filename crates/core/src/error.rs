use hms_types::{RecordId, TextError};

#[derive(Debug, thiserror::Error)]
pub enum HmsError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid API base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} answered with HTTP {status}")]
    Status { status: u16, url: String },
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: RecordId },
    #[error("{resource} {id} is already occupied")]
    Occupied { resource: &'static str, id: RecordId },
    #[error("failed to read stub fixtures: {0}")]
    FixtureRead(std::io::Error),
    #[error("failed to parse stub fixtures: {0}")]
    FixtureParse(serde_yaml::Error),
    #[error("invalid text: {0}")]
    Text(#[from] TextError),
}

pub type HmsResult<T> = std::result::Result<T, HmsError>;
