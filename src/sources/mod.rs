pub mod deezer;

use serde_json::Value;

use crate::error::{FetchError, RemoteFetchError};
use crate::models::{CatalogKind, CatalogReference, FetchResult, Requester};

/// A music catalog that can look up tracks, albums and playlists by id.
pub trait CatalogSource: Send + Sync {
    fn name(&self) -> &str;
    /// Exactly one track and no name.
    fn fetch_track(&self, id: &str, requester: Option<&Requester>) -> Result<FetchResult, FetchError>;
    fn fetch_album(&self, id: &str, requester: Option<&Requester>) -> Result<FetchResult, FetchError>;
    fn fetch_playlist(
        &self,
        id: &str,
        requester: Option<&Requester>,
    ) -> Result<FetchResult, FetchError>;

    /// Dispatches to the fetcher for `reference.kind`.
    fn fetch(
        &self,
        reference: &CatalogReference,
        requester: Option<&Requester>,
    ) -> Result<FetchResult, FetchError> {
        match reference.kind {
            CatalogKind::Track => self.fetch_track(&reference.id, requester),
            CatalogKind::Album => self.fetch_album(&reference.id, requester),
            CatalogKind::Playlist => self.fetch_playlist(&reference.id, requester),
        }
    }
}

/// Performs a GET and decodes the body as JSON. Non-2xx statuses are errors.
pub trait JsonTransport: Send + Sync {
    fn get_json(&self, url: &str) -> Result<Value, RemoteFetchError>;
}

pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("deezer-resolver/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl JsonTransport for HttpTransport {
    fn get_json(&self, url: &str) -> Result<Value, RemoteFetchError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| RemoteFetchError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RemoteFetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        resp.json().map_err(|e| RemoteFetchError::Malformed {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}
