//! Seams to the audio-player host: its search entry point, its track
//! resolution capability and the manager plugins are installed into.

pub mod lavalink;
pub mod resolver;

use std::sync::Arc;

use anyhow::Result;

use crate::core::outcome::build_outcome;
use crate::models::{LoadType, Requester, ResolvedTrack, SearchOutcome, SearchQuery, UnresolvedTrack};

/// The host's search entry point.
pub trait SearchDelegate: Send + Sync {
    fn search(&self, query: &SearchQuery, requester: Option<&Requester>) -> Result<SearchOutcome>;
}

/// Binds an unresolved catalog track to something the host can play.
pub trait TrackResolver: Send + Sync {
    fn resolve(&self, track: &UnresolvedTrack) -> Result<ResolvedTrack>;
}

/// Something that hooks itself into a [`PlayerManager`] once, at installation.
pub trait Plugin {
    fn load(&self, manager: &mut PlayerManager);
}

/// Minimal view of the host manager: it owns the current search implementation.
pub struct PlayerManager {
    search: Arc<dyn SearchDelegate>,
}

impl PlayerManager {
    pub fn new(search: Arc<dyn SearchDelegate>) -> Self {
        Self { search }
    }

    pub fn search(&self, query: &SearchQuery, requester: Option<&Requester>) -> Result<SearchOutcome> {
        self.search.search(query, requester)
    }

    /// Hands the current search implementation to `install` and uses whatever it returns.
    pub fn replace_search<F>(&mut self, install: F)
    where
        F: FnOnce(Arc<dyn SearchDelegate>) -> Arc<dyn SearchDelegate>,
    {
        let current = Arc::clone(&self.search);
        self.search = install(current);
    }

    pub fn use_plugin(&mut self, plugin: &dyn Plugin) {
        plugin.load(self);
    }
}

/// Search backend for when no playback node is configured. Finds nothing.
pub struct OfflineSearch;

impl SearchDelegate for OfflineSearch {
    fn search(&self, query: &SearchQuery, _requester: Option<&Requester>) -> Result<SearchOutcome> {
        log::debug!("offline search for {:?}: no playback node", query.text());
        Ok(build_outcome(LoadType::NoMatches, None, None, None))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Records every call and answers with a fixed outcome.
    pub(crate) struct RecordingSearch {
        pub(crate) calls: Mutex<Vec<(SearchQuery, Option<Requester>)>>,
        pub(crate) answer: SearchOutcome,
    }

    impl RecordingSearch {
        pub(crate) fn answering(answer: SearchOutcome) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                answer,
            }
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl SearchDelegate for RecordingSearch {
        fn search(&self, query: &SearchQuery, requester: Option<&Requester>) -> Result<SearchOutcome> {
            self.calls
                .lock()
                .unwrap()
                .push((query.clone(), requester.cloned()));
            Ok(self.answer.clone())
        }
    }

    struct Tagging(&'static str);

    impl SearchDelegate for Tagging {
        fn search(&self, _query: &SearchQuery, _requester: Option<&Requester>) -> Result<SearchOutcome> {
            Ok(build_outcome(LoadType::LoadFailed, None, Some(self.0), None))
        }
    }

    struct Wrapper(Arc<dyn SearchDelegate>);

    impl SearchDelegate for Wrapper {
        fn search(&self, query: &SearchQuery, requester: Option<&Requester>) -> Result<SearchOutcome> {
            self.0.search(query, requester)
        }
    }

    #[test]
    fn test_replace_search_hands_over_current_delegate() {
        let mut manager = PlayerManager::new(Arc::new(Tagging("original")));
        manager.replace_search(|original| Arc::new(Wrapper(original)) as Arc<dyn SearchDelegate>);

        let outcome = manager.search(&SearchQuery::from("anything"), None).unwrap();
        assert_eq!(outcome.exception.unwrap().message, "original");
    }

    #[test]
    fn test_offline_search_finds_nothing() {
        let outcome = OfflineSearch.search(&SearchQuery::from("anything"), None).unwrap();
        assert_eq!(outcome.load_type, LoadType::NoMatches);
        assert!(outcome.tracks.is_empty());
    }
}
