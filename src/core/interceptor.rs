use std::sync::Arc;

use anyhow::Result;
use log::{debug, warn};

use crate::core::classifier::UrlClassifier;
use crate::core::outcome::{build_outcome, failed};
use crate::host::{SearchDelegate, TrackResolver};
use crate::models::{
    CatalogKind, CatalogReference, Classification, LoadType, Requester, SearchOutcome, SearchQuery,
    Track, UnresolvedTrack,
};
use crate::sources::CatalogSource;

/// Container name used when the catalog gave none.
pub const UNTITLED: &str = "Untitled";

/// Wraps the host search: catalog URLs are answered from the catalog,
/// everything else goes to the original search untouched.
pub struct SearchInterceptor {
    classifier: UrlClassifier,
    catalog: Arc<dyn CatalogSource>,
    original: Arc<dyn SearchDelegate>,
    /// Set only when eager resolution is enabled.
    resolver: Option<Arc<dyn TrackResolver>>,
}

impl SearchInterceptor {
    pub fn new(catalog: Arc<dyn CatalogSource>, original: Arc<dyn SearchDelegate>) -> Self {
        Self {
            classifier: UrlClassifier::default(),
            catalog,
            original,
            resolver: None,
        }
    }

    pub fn with_classifier(mut self, classifier: UrlClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_eager_resolution(mut self, resolver: Arc<dyn TrackResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    fn load(&self, reference: &CatalogReference, requester: Option<&Requester>) -> SearchOutcome {
        let fetched = match self.catalog.fetch(reference, requester) {
            Ok(fetched) => fetched,
            Err(err) => {
                warn!("{} {} {} failed: {}", self.catalog.name(), reference.kind, reference.id, err);
                return failed(err.load_type(), &err.to_string());
            }
        };

        let load_type = match reference.kind {
            CatalogKind::Track => LoadType::TrackLoaded,
            CatalogKind::Album | CatalogKind::Playlist => LoadType::PlaylistLoaded,
        };

        let name = if reference.kind.is_container() {
            Some(
                fetched
                    .name
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| UNTITLED.to_string()),
            )
        } else {
            None
        };

        let tracks = self.resolve_all(fetched.tracks);
        build_outcome(load_type, Some(tracks), None, name.as_deref())
    }

    /// Sequential and in catalog order; a track that fails to resolve is dropped alone.
    fn resolve_all(&self, tracks: Vec<UnresolvedTrack>) -> Vec<Track> {
        let resolver = match &self.resolver {
            Some(resolver) => resolver,
            None => return tracks.into_iter().map(Track::Unresolved).collect(),
        };

        let total = tracks.len();
        let resolved: Vec<Track> = tracks
            .into_iter()
            .filter_map(|track| match resolver.resolve(&track) {
                Ok(resolved) => Some(Track::Resolved(resolved)),
                Err(e) => {
                    warn!("dropping \"{}\": {:#}", track.search_text(), e);
                    None
                }
            })
            .collect();

        debug!("resolved {}/{} tracks", resolved.len(), total);
        resolved
    }
}

impl SearchDelegate for SearchInterceptor {
    fn search(&self, query: &SearchQuery, requester: Option<&Requester>) -> Result<SearchOutcome> {
        let reference = match self.classifier.classify(query.text()) {
            None => return self.original.search(query, requester),
            Some(Classification::Unsupported { kind, id }) => {
                debug!("unsupported {} entity {} {}", self.catalog.name(), kind, id);
                let message = format!("Unsupported {} entity: {}", self.catalog.name(), kind);
                return Ok(failed(LoadType::LoadFailed, &message));
            }
            Some(Classification::Supported(reference)) => reference,
        };

        debug!("loading {} {} from {}", reference.kind, reference.id, self.catalog.name());
        Ok(self.load(&reference, requester))
    }
}
