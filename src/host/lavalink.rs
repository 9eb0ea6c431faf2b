use anyhow::{Context, Result};
use serde::Deserialize;

use crate::config::LavalinkConfig;
use crate::host::SearchDelegate;
use crate::models::{
    Failure, LoadType, PlaylistSummary, Requester, ResolvedTrack, SearchOutcome, SearchQuery,
    Severity, Track,
};

/// Lavalink (v3 REST) node used as the host search.
pub struct LavalinkNode {
    client: reqwest::blocking::Client,
    base_url: String,
    password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoadTracksResponse {
    load_type: LoadType,
    #[serde(default)]
    tracks: Vec<LavalinkTrack>,
    #[serde(default)]
    playlist_info: Option<PlaylistInfo>,
    #[serde(default)]
    exception: Option<LavalinkException>,
}

#[derive(Deserialize)]
struct LavalinkTrack {
    track: String,
    info: TrackInfo,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackInfo {
    identifier: String,
    author: String,
    length: u64,
    #[serde(default)]
    is_stream: bool,
    title: String,
    #[serde(default)]
    uri: Option<String>,
    #[serde(default)]
    source_name: Option<String>,
}

#[derive(Deserialize)]
struct PlaylistInfo {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Deserialize)]
struct LavalinkException {
    #[serde(default)]
    message: Option<String>,
    severity: Severity,
}

impl LavalinkNode {
    pub fn new(config: &LavalinkConfig) -> Result<Self> {
        let base_url = config
            .url
            .as_ref()
            .filter(|u| !u.is_empty())
            .context("Lavalink url is not configured")?;

        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("deezer-resolver/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to create Lavalink HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            password: config.password.clone().unwrap_or_default(),
        })
    }
}

impl SearchDelegate for LavalinkNode {
    fn search(&self, query: &SearchQuery, requester: Option<&Requester>) -> Result<SearchOutcome> {
        let identifier = identifier(query);
        log::debug!("lavalink loadtracks {}", identifier);

        let resp: LoadTracksResponse = self
            .client
            .get(format!("{}/loadtracks", self.base_url))
            .header("Authorization", &self.password)
            .query(&[("identifier", identifier.as_str())])
            .send()
            .context("failed to reach Lavalink")?
            .error_for_status()
            .context("Lavalink rejected the search")?
            .json()
            .context("failed to parse Lavalink response")?;

        Ok(into_outcome(resp, requester))
    }
}

/// URLs are loaded as-is; plain text becomes a search on the requested source (YouTube by default).
fn identifier(query: &SearchQuery) -> String {
    let text = query.text().trim();
    if text.starts_with("http://") || text.starts_with("https://") {
        return text.to_string();
    }

    let prefix = match query.source().map(|s| s.to_ascii_lowercase()) {
        None => "ytsearch".to_string(),
        Some(source) => match source.as_str() {
            "youtube" => "ytsearch".to_string(),
            "youtube music" => "ytmsearch".to_string(),
            "soundcloud" => "scsearch".to_string(),
            _ => source,
        },
    };
    format!("{}:{}", prefix, text)
}

fn into_outcome(resp: LoadTracksResponse, requester: Option<&Requester>) -> SearchOutcome {
    let tracks: Vec<Track> = resp
        .tracks
        .into_iter()
        .map(|t| {
            Track::Resolved(ResolvedTrack {
                encoded: t.track,
                identifier: t.info.identifier,
                title: t.info.title,
                author: t.info.author,
                duration_ms: t.info.length,
                uri: t.info.uri,
                is_stream: t.info.is_stream,
                source_name: t.info.source_name,
                requester: requester.cloned(),
            })
        })
        .collect();

    let playlist = resp
        .playlist_info
        .and_then(|p| p.name)
        .filter(|name| !name.is_empty())
        .map(|name| PlaylistSummary {
            name,
            duration_ms: tracks
                .iter()
                .fold(0u64, |total, t| total.saturating_add(t.duration_ms())),
        });

    let exception = resp.exception.map(|e| Failure {
        message: e.message.unwrap_or_default(),
        severity: e.severity,
    });

    SearchOutcome {
        load_type: resp.load_type,
        tracks,
        playlist,
        exception,
    }
}
