use serde::Deserialize;
use serde_json::Value;

use crate::error::ValidationError;
use crate::models::{Requester, UnresolvedTrack};

/// Track record as the catalog sends it. Everything is optional here;
/// [`normalize`] decides what is required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCatalogTrack {
    #[serde(default)]
    pub title: Option<Value>,
    /// Seconds.
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default)]
    pub artist: Option<RawArtist>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawArtist {
    #[serde(default)]
    pub name: Option<String>,
}

impl RawCatalogTrack {
    /// Whether the record carries any title at all. Containers silently skip records without one.
    pub fn has_title(&self) -> bool {
        match &self.title {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }
}

/// Turns a raw catalog record into an unresolved track.
pub fn normalize(
    raw: Option<&RawCatalogTrack>,
    requester: Option<&Requester>,
) -> Result<UnresolvedTrack, ValidationError> {
    let raw = raw.ok_or(ValidationError::MissingRecord)?;

    let author = raw
        .artist
        .as_ref()
        .and_then(|a| a.name.as_deref())
        .filter(|name| !name.is_empty())
        .ok_or(ValidationError::MissingArtist)?;

    let title = match &raw.title {
        None | Some(Value::Null) => return Err(ValidationError::MissingTitle),
        Some(Value::String(s)) if s.is_empty() => return Err(ValidationError::MissingTitle),
        Some(Value::String(s)) => s,
        Some(_) => return Err(ValidationError::TitleNotString),
    };

    let duration_ms = raw.duration.unwrap_or(0).saturating_mul(1000);

    Ok(UnresolvedTrack::from_parts(
        title.clone(),
        author.to_string(),
        duration_ms,
        requester.cloned(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawCatalogTrack {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_duration_seconds_to_millis() {
        let track = normalize(
            Some(&raw(json!({
                "title": "Harder, Better, Faster, Stronger",
                "duration": 215,
                "artist": { "name": "Daft Punk" }
            }))),
            None,
        )
        .unwrap();
        assert_eq!(track.title(), "Harder, Better, Faster, Stronger");
        assert_eq!(track.author(), "Daft Punk");
        assert_eq!(track.duration_ms(), 215_000);
        assert!(track.requester().is_none());
    }

    #[test]
    fn test_missing_duration_is_zero() {
        let track = normalize(
            Some(&raw(json!({ "title": "Intro", "artist": { "name": "M83" } }))),
            None,
        )
        .unwrap();
        assert_eq!(track.duration_ms(), 0);
    }

    #[test]
    fn test_requester_is_carried() {
        let requester = Requester(json!({ "id": "42", "tag": "dj#0001" }));
        let track = normalize(
            Some(&raw(json!({ "title": "Aerodynamic", "duration": 212, "artist": { "name": "Daft Punk" } }))),
            Some(&requester),
        )
        .unwrap();
        assert_eq!(track.requester(), Some(&requester));
    }

    #[test]
    fn test_validation_failures() {
        assert_eq!(normalize(None, None), Err(ValidationError::MissingRecord));
        assert_eq!(
            normalize(Some(&raw(json!({ "title": "Alone" }))), None),
            Err(ValidationError::MissingArtist)
        );
        assert_eq!(
            normalize(Some(&raw(json!({ "title": "Alone", "artist": {} }))), None),
            Err(ValidationError::MissingArtist)
        );
        assert_eq!(
            normalize(Some(&raw(json!({ "artist": { "name": "Marshmello" } }))), None),
            Err(ValidationError::MissingTitle)
        );
        assert_eq!(
            normalize(
                Some(&raw(json!({ "title": 1999, "artist": { "name": "Prince" } }))),
                None
            ),
            Err(ValidationError::TitleNotString)
        );
    }

    #[test]
    fn test_same_input_same_output() {
        let record = raw(json!({ "title": "Digital Love", "duration": 301, "artist": { "name": "Daft Punk" } }));
        assert_eq!(normalize(Some(&record), None), normalize(Some(&record), None));
    }

    #[test]
    fn test_has_title() {
        assert!(!raw(json!({})).has_title());
        assert!(!raw(json!({ "title": null })).has_title());
        assert!(!raw(json!({ "title": "" })).has_title());
        assert!(raw(json!({ "title": "Veridis Quo" })).has_title());
        assert!(raw(json!({ "title": 7 })).has_title());
    }
}
