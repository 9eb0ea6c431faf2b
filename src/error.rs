use thiserror::Error;

use crate::models::LoadType;

/// Raised when plugin options have the wrong shape. Fatal: the plugin is not installed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("plugin options must be an object")]
    NotAnObject,
    #[error("option `{key}` must be {expected}")]
    WrongType { key: &'static str, expected: &'static str },
    #[error("option `{key}` must be a positive integer")]
    NotPositive { key: &'static str },
}

/// A catalog track record that cannot be turned into a track.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("track record is missing")]
    MissingRecord,
    #[error("track record has no artist")]
    MissingArtist,
    #[error("track record has no title")]
    MissingTitle,
    #[error("track title is not a string")]
    TitleNotString,
}

/// Transport or payload failure while talking to the catalog.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoteFetchError {
    #[error("request to the catalog failed: {0}")]
    Transport(String),
    #[error("catalog returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },
    #[error("malformed catalog response from {url}: {reason}")]
    Malformed { url: String, reason: String },
    #[error("catalog error {code} ({kind}): {message}")]
    Api {
        kind: String,
        message: String,
        code: i64,
    },
}

/// Deezer answers "no data" with this code when an id does not exist.
pub const DEEZER_NO_DATA: i64 = 800;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error(transparent)]
    Remote(#[from] RemoteFetchError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl FetchError {
    /// Load type the failed search should report.
    pub fn load_type(&self) -> LoadType {
        match self {
            FetchError::Remote(RemoteFetchError::Api { code, .. }) if *code == DEEZER_NO_DATA => {
                LoadType::NoMatches
            }
            _ => LoadType::LoadFailed,
        }
    }
}
