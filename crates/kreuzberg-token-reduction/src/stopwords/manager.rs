use super::cache::{CustomStopwordsKey, SharedStopwords, StopwordsCache};
use super::load_default_stopwords;
use crate::error::{KreuzbergError, Result};
use ahash::{AHashMap, AHashSet};
use once_cell::sync::Lazy;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

static DEFAULT_MANAGER: Lazy<StopwordsManager> = Lazy::new(StopwordsManager::new);

/// Process-wide default manager with built-in stopwords only.
///
/// Constructed on first access and reused for the life of the process.
pub fn default_stopwords_manager() -> &'static StopwordsManager {
    &DEFAULT_MANAGER
}

/// Combines the built-in stopword dataset with custom, per-manager additions.
///
/// Custom words are additive: they never remove built-in words. All words are
/// stored lower-cased. Lookups of resolved sets are memoized in bounded LRU caches
/// owned by the manager.
///
/// Reads take `&self` and are safe to share across threads.
/// [`add_custom_stopwords`](Self::add_custom_stopwords) takes `&mut self`, so
/// mutation of a shared manager has to be serialized by the caller.
///
/// # Example
///
/// ```rust
/// use kreuzberg_token_reduction::stopwords::StopwordsManager;
/// use std::collections::HashMap;
///
/// let mut custom = HashMap::new();
/// custom.insert("test".to_string(), vec!["custom".to_string(), "words".to_string()]);
///
/// let mut manager = StopwordsManager::with_custom_stopwords(custom);
/// assert!(manager.get_stopwords("test").contains("custom"));
///
/// manager.add_custom_stopwords("en", ["lorem", "ipsum"]);
/// assert!(manager.get_stopwords("en").contains("lorem"));
/// assert!(manager.get_stopwords("en").contains("the"));
/// ```
#[derive(Default)]
pub struct StopwordsManager {
    custom: AHashMap<String, AHashSet<String>>,
    cache: StopwordsCache,
}

impl std::fmt::Debug for StopwordsManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StopwordsManager")
            .field("custom_languages", &self.custom.keys().collect::<BTreeSet<_>>())
            .finish_non_exhaustive()
    }
}

impl StopwordsManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_custom_stopwords(custom_stopwords: HashMap<String, Vec<String>>) -> Self {
        let mut manager = Self::new();
        for (language, words) in custom_stopwords {
            manager.add_custom_stopwords(&language, words);
        }
        manager
    }

    /// Create a manager whose custom stopwords are read from a JSON file.
    ///
    /// The file must contain a single JSON object mapping language codes to
    /// arrays of strings, the same shape as the bundled dataset.
    ///
    /// # Errors
    ///
    /// Returns [`KreuzbergError::StopwordsFile`] if the file does not exist, is not
    /// valid JSON, is not a JSON object, or holds a language entry that is not a
    /// list of strings. The message names the offending path or language.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_custom_stopwords_and_file(HashMap::new(), path)
    }

    /// Create a manager from inline custom stopwords plus a JSON file.
    ///
    /// Entries from the file replace inline entries for the same language.
    pub fn with_custom_stopwords_and_file(
        custom_stopwords: HashMap<String, Vec<String>>,
        path: impl AsRef<Path>,
    ) -> Result<Self> {
        let mut manager = Self::with_custom_stopwords(custom_stopwords);
        for (language, words) in read_stopwords_file(path.as_ref())? {
            manager.custom.insert(language, words);
        }
        Ok(manager)
    }

    /// Union of built-in and custom stopwords for `language`.
    ///
    /// Unknown languages yield an empty set.
    pub fn get_stopwords(&self, language: &str) -> AHashSet<String> {
        let mut result = AHashSet::new();

        if let Some(builtin) = load_default_stopwords().get(language) {
            result.extend(builtin.iter().cloned());
        }

        if let Some(custom) = self.custom.get(language) {
            result.extend(custom.iter().cloned());
        }

        result
    }

    pub fn has_language(&self, language: &str) -> bool {
        load_default_stopwords().contains_key(language) || self.custom.contains_key(language)
    }

    /// All languages known to either source, sorted.
    pub fn supported_languages(&self) -> Vec<String> {
        load_default_stopwords()
            .keys()
            .chain(self.custom.keys())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Merge `words` into the custom set for `language`, creating it if absent.
    ///
    /// Adding words that are already present is a no-op. Memoized sets are
    /// discarded so later lookups observe the additions.
    pub fn add_custom_stopwords<I, S>(&mut self, language: &str, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.custom
            .entry(language.to_string())
            .or_default()
            .extend(words.into_iter().map(|w| w.as_ref().to_lowercase()));
        self.cache.clear();
    }

    /// Memoized equivalent of [`get_stopwords`](Self::get_stopwords).
    pub fn cached_stopwords(&self, language: &str) -> SharedStopwords {
        self.cache
            .get_or_insert_language(language, || self.get_stopwords(language))
    }

    /// Memoized manager stopwords for `language` extended with `extra_words`.
    ///
    /// The cache key is the language plus the sorted, lower-cased extra words, so
    /// the order of `extra_words` does not matter.
    pub fn cached_stopwords_with_custom(&self, language: &str, extra_words: &[String]) -> SharedStopwords {
        let key = CustomStopwordsKey::new(language, extra_words);
        self.cache.get_or_insert_custom(key, |key| {
            let mut set = (*self.cached_stopwords(language)).clone();
            set.extend(key.words().iter().cloned());
            set
        })
    }
}

fn read_stopwords_file(path: &Path) -> Result<AHashMap<String, AHashSet<String>>> {
    if !path.exists() {
        return Err(KreuzbergError::stopwords_file(format!(
            "Stopwords file not found: {}",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        KreuzbergError::stopwords_file_with_source(format!("Failed to read stopwords file {}", path.display()), e)
    })?;
    let data: serde_json::Value = serde_json::from_str(&content).map_err(|e| {
        KreuzbergError::stopwords_file_with_source(format!("Invalid JSON in stopwords file {}", path.display()), e)
    })?;

    let serde_json::Value::Object(entries) = data else {
        return Err(KreuzbergError::stopwords_file(format!(
            "Stopwords file must contain a JSON object: {}",
            path.display()
        )));
    };

    let mut result = AHashMap::with_capacity(entries.len());
    for (language, value) in entries {
        let serde_json::Value::Array(items) = value else {
            return Err(KreuzbergError::stopwords_file(format!(
                "Stopwords for language '{}' must be a list",
                language
            )));
        };

        let mut words = AHashSet::with_capacity(items.len());
        for item in items {
            match item {
                serde_json::Value::String(word) => {
                    words.insert(word.to_lowercase());
                }
                other => {
                    return Err(KreuzbergError::stopwords_file(format!(
                        "Stopwords for language '{}' must be a list of strings, found {}",
                        language, other
                    )));
                }
            }
        }

        result.insert(language, words);
    }

    tracing::debug!(
        "Loaded custom stopwords for {} languages from {}",
        result.len(),
        path.display()
    );
    Ok(result)
}
