use crate::models::{Failure, LoadType, PlaylistSummary, SearchOutcome, Severity, Track};

/// Assembles a [`SearchOutcome`].
///
/// The playlist summary is only set for a non-empty `playlist_name`, and the
/// exception only for a non-empty `failure_message`. Both may be set together
/// with tracks; the caller decides which to honour.
pub fn build_outcome(
    load_type: LoadType,
    tracks: Option<Vec<Track>>,
    failure_message: Option<&str>,
    playlist_name: Option<&str>,
) -> SearchOutcome {
    let tracks = tracks.unwrap_or_default();

    let playlist = playlist_name
        .filter(|name| !name.is_empty())
        .map(|name| PlaylistSummary {
            name: name.to_string(),
            duration_ms: tracks
                .iter()
                .fold(0u64, |total, t| total.saturating_add(t.duration_ms())),
        });

    let exception = failure_message
        .filter(|message| !message.is_empty())
        .map(|message| Failure {
            message: message.to_string(),
            severity: Severity::Common,
        });

    SearchOutcome {
        load_type,
        tracks,
        playlist,
        exception,
    }
}

pub fn failed(load_type: LoadType, message: &str) -> SearchOutcome {
    build_outcome(load_type, None, Some(message), None)
}
