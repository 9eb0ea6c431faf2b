use std::num::NonZeroUsize;

use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::{PluginOptions, DEFAULT_API_BASE};
use crate::core::normalizer::{normalize, RawCatalogTrack};
use crate::error::{FetchError, RemoteFetchError};
use crate::models::{CatalogKind, FetchResult, Requester};
use crate::sources::{CatalogSource, HttpTransport, JsonTransport};

pub const UNTITLED_ALBUM: &str = "Untitled album";
pub const UNTITLED_PLAYLIST: &str = "Untitled playlist";

/// Deezer public API client. No authentication is needed for tracks, albums
/// and public playlists.
pub struct DeezerCatalog<T = HttpTransport> {
    transport: T,
    api_base: String,
    album_limit: Option<NonZeroUsize>,
    playlist_limit: Option<NonZeroUsize>,
}

/// Deezer reports lookup errors with HTTP 200 and this envelope.
#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    code: i64,
}

#[derive(Deserialize)]
struct ContainerPayload {
    #[serde(default)]
    title: Option<String>,
    tracks: TrackList,
}

#[derive(Deserialize)]
struct TrackList {
    data: Vec<Option<RawCatalogTrack>>,
}

impl DeezerCatalog<HttpTransport> {
    pub fn new(options: &PluginOptions) -> anyhow::Result<Self> {
        Ok(Self::with_transport(HttpTransport::new()?, DEFAULT_API_BASE, options))
    }
}

impl<T: JsonTransport> DeezerCatalog<T> {
    pub fn with_transport(transport: T, api_base: &str, options: &PluginOptions) -> Self {
        Self {
            transport,
            api_base: api_base.trim_end_matches('/').to_string(),
            album_limit: options.album_page_limit,
            playlist_limit: options.playlist_page_limit,
        }
    }

    fn get<D: DeserializeOwned>(&self, kind: CatalogKind, id: &str) -> Result<D, RemoteFetchError> {
        let url = format!("{}/{}/{}", self.api_base, kind, id);
        debug!("GET {}", url);
        let body = self.transport.get_json(&url)?;

        if body.get("error").is_some() {
            let envelope: ErrorEnvelope =
                serde_json::from_value(body).map_err(|e| malformed(&url, e))?;
            return Err(RemoteFetchError::Api {
                kind: envelope.error.kind,
                message: envelope.error.message,
                code: envelope.error.code,
            });
        }

        serde_json::from_value(body).map_err(|e| malformed(&url, e))
    }

    fn fetch_container(
        &self,
        kind: CatalogKind,
        id: &str,
        limit: Option<NonZeroUsize>,
        untitled: &str,
        requester: Option<&Requester>,
    ) -> Result<FetchResult, FetchError> {
        let payload: ContainerPayload = self.get(kind, id)?;
        let total = payload.tracks.data.len();

        let mut tracks = payload
            .tracks
            .data
            .iter()
            .flatten()
            .filter(|raw| raw.has_title())
            .map(|raw| normalize(Some(raw), requester))
            .collect::<Result<Vec<_>, _>>()?;

        if tracks.len() < total {
            debug!("{} {}: skipped {} untitled records", kind, id, total - tracks.len());
        }
        if let Some(limit) = limit {
            tracks.truncate(limit.get());
        }

        let name = payload
            .title
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| untitled.to_string());

        info!("{} {} \"{}\": {} tracks", kind, id, name, tracks.len());
        Ok(FetchResult {
            tracks,
            name: Some(name),
        })
    }
}

fn malformed(url: &str, err: serde_json::Error) -> RemoteFetchError {
    RemoteFetchError::Malformed {
        url: url.to_string(),
        reason: err.to_string(),
    }
}

impl<T: JsonTransport> CatalogSource for DeezerCatalog<T> {
    fn name(&self) -> &str {
        "Deezer"
    }

    fn fetch_track(&self, id: &str, requester: Option<&Requester>) -> Result<FetchResult, FetchError> {
        let raw: RawCatalogTrack = self.get(CatalogKind::Track, id)?;
        let track = normalize(Some(&raw), requester)?;
        info!("track {}: {} - {}", id, track.author(), track.title());
        Ok(FetchResult {
            tracks: vec![track],
            name: None,
        })
    }

    fn fetch_album(&self, id: &str, requester: Option<&Requester>) -> Result<FetchResult, FetchError> {
        self.fetch_container(CatalogKind::Album, id, self.album_limit, UNTITLED_ALBUM, requester)
    }

    fn fetch_playlist(
        &self,
        id: &str,
        requester: Option<&Requester>,
    ) -> Result<FetchResult, FetchError> {
        self.fetch_container(
            CatalogKind::Playlist,
            id,
            self.playlist_limit,
            UNTITLED_PLAYLIST,
            requester,
        )
    }
}
