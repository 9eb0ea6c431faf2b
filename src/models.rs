use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Catalog entity kinds this crate can load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    Track,
    Album,
    Playlist,
}

impl CatalogKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogKind::Track => "track",
            CatalogKind::Album => "album",
            CatalogKind::Playlist => "playlist",
        }
    }

    pub fn is_container(&self) -> bool {
        !matches!(self, CatalogKind::Track)
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CatalogKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "track" => Ok(CatalogKind::Track),
            "album" => Ok(CatalogKind::Album),
            "playlist" => Ok(CatalogKind::Playlist),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogReference {
    pub kind: CatalogKind,
    pub id: String,
}

/// What the classifier made of a catalog URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Supported(CatalogReference),
    /// A catalog URL for an entity we have no fetcher for (artist, show, ...).
    Unsupported { kind: String, id: String },
}

/// Opaque token identifying who asked for a track. Never inspected, only carried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Requester(pub serde_json::Value);

impl From<&str> for Requester {
    fn from(value: &str) -> Self {
        Requester(serde_json::Value::String(value.to_string()))
    }
}

/// Input accepted by a host search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    Text(String),
    Structured {
        query: String,
        source: Option<String>,
    },
}

impl SearchQuery {
    pub fn text(&self) -> &str {
        match self {
            SearchQuery::Text(text) => text,
            SearchQuery::Structured { query, .. } => query,
        }
    }

    pub fn source(&self) -> Option<&str> {
        match self {
            SearchQuery::Text(_) => None,
            SearchQuery::Structured { source, .. } => source.as_deref(),
        }
    }
}

impl From<&str> for SearchQuery {
    fn from(value: &str) -> Self {
        SearchQuery::Text(value.to_string())
    }
}

/// A catalog track that is not bound to any audio source yet.
/// Built only by [`crate::core::normalizer::normalize`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnresolvedTrack {
    title: String,
    author: String,
    #[serde(rename = "duration")]
    duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    requester: Option<Requester>,
}

impl UnresolvedTrack {
    pub(crate) fn from_parts(
        title: String,
        author: String,
        duration_ms: u64,
        requester: Option<Requester>,
    ) -> Self {
        Self {
            title,
            author,
            duration_ms,
            requester,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn requester(&self) -> Option<&Requester> {
        self.requester.as_ref()
    }

    /// Text used to look the track up on a playback source.
    pub fn search_text(&self) -> String {
        format!("{} - {}", self.author, self.title)
    }
}

/// A track the host can play directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTrack {
    #[serde(rename = "track")]
    pub encoded: String,
    pub identifier: String,
    pub title: String,
    pub author: String,
    #[serde(rename = "length")]
    pub duration_ms: u64,
    pub uri: Option<String>,
    pub is_stream: bool,
    pub source_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester: Option<Requester>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Track {
    Unresolved(UnresolvedTrack),
    Resolved(ResolvedTrack),
}

impl Track {
    pub fn title(&self) -> &str {
        match self {
            Track::Unresolved(t) => t.title(),
            Track::Resolved(t) => &t.title,
        }
    }

    pub fn author(&self) -> &str {
        match self {
            Track::Unresolved(t) => t.author(),
            Track::Resolved(t) => &t.author,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        match self {
            Track::Unresolved(t) => t.duration_ms(),
            Track::Resolved(t) => t.duration_ms,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Track::Resolved(_))
    }
}

/// Tracks and display name produced by one catalog fetch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FetchResult {
    pub tracks: Vec<UnresolvedTrack>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoadType {
    TrackLoaded,
    PlaylistLoaded,
    SearchResult,
    NoMatches,
    LoadFailed,
}

impl fmt::Display for LoadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LoadType::TrackLoaded => "TRACK_LOADED",
            LoadType::PlaylistLoaded => "PLAYLIST_LOADED",
            LoadType::SearchResult => "SEARCH_RESULT",
            LoadType::NoMatches => "NO_MATCHES",
            LoadType::LoadFailed => "LOAD_FAILED",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Common,
    Suspicious,
    Fault,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub message: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaylistSummary {
    pub name: String,
    #[serde(rename = "duration")]
    pub duration_ms: u64,
}

/// Result of a search, in the host's load-result shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome {
    pub load_type: LoadType,
    pub tracks: Vec<Track>,
    #[serde(rename = "playlistInfo", skip_serializing_if = "Option::is_none")]
    pub playlist: Option<PlaylistSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception: Option<Failure>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_query_text_wins() {
        let query = SearchQuery::Structured {
            query: "https://www.deezer.com/track/1".to_string(),
            source: Some("youtube".to_string()),
        };
        assert_eq!(query.text(), "https://www.deezer.com/track/1");
        assert_eq!(query.source(), Some("youtube"));
        assert_eq!(SearchQuery::from("daft punk").text(), "daft punk");
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("album".parse::<CatalogKind>(), Ok(CatalogKind::Album));
        assert!("artist".parse::<CatalogKind>().is_err());
        assert!(CatalogKind::Playlist.is_container());
        assert!(!CatalogKind::Track.is_container());
    }

    #[test]
    fn test_outcome_serializes_in_host_shape() {
        let outcome = SearchOutcome {
            load_type: LoadType::PlaylistLoaded,
            tracks: vec![Track::Unresolved(UnresolvedTrack::from_parts(
                "One More Time".to_string(),
                "Daft Punk".to_string(),
                320_000,
                None,
            ))],
            playlist: Some(PlaylistSummary {
                name: "Discovery".to_string(),
                duration_ms: 320_000,
            }),
            exception: None,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["loadType"], "PLAYLIST_LOADED");
        assert_eq!(json["tracks"][0]["author"], "Daft Punk");
        assert_eq!(json["tracks"][0]["duration"], 320_000);
        assert_eq!(json["playlistInfo"]["name"], "Discovery");
        assert!(json.get("exception").is_none());
    }
}
