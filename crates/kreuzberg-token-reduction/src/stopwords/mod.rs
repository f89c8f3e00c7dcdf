//! Stopwords management for token reduction.
//!
//! Stopwords are common words (the, is, and, etc.) that carry little information
//! and are removed by the moderate reduction level.
//!
//! Two sources are combined:
//!
//! - **Built-in stopwords**: a bundled JSON dataset (language code -> word list),
//!   embedded in the binary and parsed once per process into [`STOPWORDS`].
//! - **Custom stopwords**: per-manager additions supplied inline or loaded from an
//!   external JSON file, see [`StopwordsManager`].
//!
//! # Supported Languages
//!
//! The bundled dataset covers Danish (da), German (de), English (en), Spanish (es),
//! Finnish (fi), French (fr), Italian (it), Dutch (nl), Norwegian (no), Polish (pl),
//! Portuguese (pt), Russian (ru), Swedish (sv) and Turkish (tr). Any other language
//! can be added through custom stopwords.
//!
//! # Usage
//!
//! ```rust
//! use kreuzberg_token_reduction::stopwords::{default_stopwords_manager, load_default_stopwords};
//!
//! let builtin = load_default_stopwords();
//! assert!(builtin["en"].contains("the"));
//!
//! let manager = default_stopwords_manager();
//! assert!(manager.has_language("de"));
//! assert!(manager.get_stopwords("unknown").is_empty());
//! ```

mod cache;
mod manager;

pub use manager::{StopwordsManager, default_stopwords_manager};

use ahash::{AHashMap, AHashSet};
use once_cell::sync::Lazy;

/// Bundled stopword dataset, a single JSON object mapping language codes to word arrays.
const STOPWORDS_JSON: &str = include_str!("../../stopwords/stop_words.json");

/// Global built-in stopwords registry.
///
/// Parsed from the embedded dataset on first access and never mutated afterwards.
/// Words are stored lower-cased. Lookups are exact: `"EN"` or `"en-US"` are not
/// aliases of `"en"`.
///
/// # Panics
///
/// First access panics if the embedded dataset is malformed. That is a packaging
/// defect, not a runtime condition callers can recover from.
pub static STOPWORDS: Lazy<AHashMap<String, AHashSet<String>>> = Lazy::new(|| {
    let raw: std::collections::HashMap<String, Vec<String>> = match serde_json::from_str(STOPWORDS_JSON) {
        Ok(raw) => raw,
        Err(e) => panic!(
            "Failed to parse bundled stopwords dataset (stopwords/stop_words.json): {}. \
            This indicates corrupted or malformed JSON in the embedded stopwords data.",
            e
        ),
    };

    let map: AHashMap<String, AHashSet<String>> = raw
        .into_iter()
        .map(|(lang, words)| (lang, words.into_iter().map(|w| w.to_lowercase()).collect()))
        .collect();

    tracing::debug!("Loaded built-in stopwords for {} languages", map.len());
    map
});

/// Returns the built-in language -> stopword-set map.
///
/// The dataset is loaded exactly once per process; every call returns the same
/// memoized map.
pub fn load_default_stopwords() -> &'static AHashMap<String, AHashSet<String>> {
    &STOPWORDS
}
