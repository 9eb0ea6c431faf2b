use std::sync::Arc;

use anyhow::{bail, Result};

use crate::host::{SearchDelegate, TrackResolver};
use crate::models::{LoadType, ResolvedTrack, SearchQuery, Track, UnresolvedTrack};

/// Tolerance when matching a candidate by length.
const DURATION_TOLERANCE_MS: u64 = 1500;

/// Resolves catalog tracks by searching the host for `"<author> - <title>"`.
///
/// Candidates are preferred in this order: same author (or the author's
/// auto-generated "- Topic" channel) or same title, then a length within
/// 1.5 seconds, then the first result.
pub struct DelegateResolver {
    search: Arc<dyn SearchDelegate>,
    source: Option<String>,
}

impl DelegateResolver {
    pub fn new(search: Arc<dyn SearchDelegate>) -> Self {
        Self {
            search,
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl TrackResolver for DelegateResolver {
    fn resolve(&self, track: &UnresolvedTrack) -> Result<ResolvedTrack> {
        let query = SearchQuery::Structured {
            query: track.search_text(),
            source: self.source.clone(),
        };
        let outcome = self.search.search(&query, track.requester())?;

        if outcome.load_type == LoadType::LoadFailed {
            let reason = outcome
                .exception
                .map(|e| e.message)
                .unwrap_or_else(|| "search failed".to_string());
            bail!("no playable source for \"{}\": {}", query.text(), reason);
        }

        let candidates: Vec<ResolvedTrack> = outcome
            .tracks
            .into_iter()
            .filter_map(|t| match t {
                Track::Resolved(resolved) => Some(resolved),
                Track::Unresolved(_) => None,
            })
            .collect();

        let mut best = match pick_best_match(track, &candidates) {
            Some(best) => best.clone(),
            None => bail!("no playable source for \"{}\"", query.text()),
        };
        best.requester = track.requester().cloned();
        Ok(best)
    }
}

pub fn pick_best_match<'a>(
    track: &UnresolvedTrack,
    candidates: &'a [ResolvedTrack],
) -> Option<&'a ResolvedTrack> {
    let author = track.author().to_lowercase();
    let topic = format!("{} - topic", author);
    let title = track.title().to_lowercase();

    let same_artist = candidates.iter().find(|c| {
        let candidate_author = c.author.to_lowercase();
        candidate_author == author || candidate_author == topic || c.title.to_lowercase() == title
    });
    if same_artist.is_some() {
        return same_artist;
    }

    if track.duration_ms() > 0 {
        let low = track.duration_ms().saturating_sub(DURATION_TOLERANCE_MS);
        let high = track.duration_ms().saturating_add(DURATION_TOLERANCE_MS);
        let same_length = candidates
            .iter()
            .find(|c| (low..=high).contains(&c.duration_ms));
        if same_length.is_some() {
            return same_length;
        }
    }

    candidates.first()
}
