use regex::Regex;

use crate::models::{CatalogKind, CatalogReference, Classification};

pub const DEEZER_HOST: &str = "deezer.com";

/// Recognises catalog URLs such as `https://www.deezer.com/fr/playlist/123`.
pub struct UrlClassifier {
    pattern: Regex,
}

impl UrlClassifier {
    pub fn new(host: &str) -> Self {
        Self::with_unsupported_kinds(host, &[])
    }

    /// Also matches URLs of `kinds`, reported as [`Classification::Unsupported`]
    /// instead of being left to the host search.
    pub fn with_unsupported_kinds(host: &str, kinds: &[&str]) -> Self {
        let mut alternatives = vec!["track".to_string(), "album".to_string(), "playlist".to_string()];
        alternatives.extend(kinds.iter().map(|k| regex::escape(k)));
        let pattern = format!(
            r"(?i)^(?:https?://)?(?:www\.)?{}/(?:[a-z]{{2}}/)?({})/(\d+)",
            regex::escape(host),
            alternatives.join("|")
        );
        Self {
            // Host and kinds are escaped, so the pattern is always valid.
            pattern: Regex::new(&pattern).expect("catalog URL pattern"),
        }
    }

    /// `None` for anything that is not a catalog URL, which is the usual case for text searches.
    pub fn classify(&self, input: &str) -> Option<Classification> {
        let caps = self.pattern.captures(input.trim())?;
        let kind = caps.get(1)?.as_str().to_ascii_lowercase();
        let id = caps.get(2)?.as_str().to_string();

        Some(match kind.parse::<CatalogKind>() {
            Ok(kind) => Classification::Supported(CatalogReference { kind, id }),
            Err(()) => Classification::Unsupported { kind, id },
        })
    }
}

impl Default for UrlClassifier {
    fn default() -> Self {
        Self::new(DEEZER_HOST)
    }
}
