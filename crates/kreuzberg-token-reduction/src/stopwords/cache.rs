//! Bounded memoization for resolved stopword sets.
//!
//! Two least-recently-used caches back the moderate reduction stage:
//! one keyed by language, one keyed by language plus the sorted, deduplicated
//! custom words from a [`TokenReductionConfig`](crate::TokenReductionConfig).
//! Values are shared through `Arc` so hits never clone the underlying set.
//!
//! The locks are held only for the lookup or insert, never while a set is being
//! computed. Two threads missing the same key both compute the set and the
//! second insert wins; the results are identical.

use ahash::AHashSet;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Capacity of the per-language cache.
pub(crate) const LANGUAGE_CACHE_CAPACITY: usize = 128;

/// Capacity of the language + custom words cache.
pub(crate) const CUSTOM_CACHE_CAPACITY: usize = 64;

pub(crate) type SharedStopwords = Arc<AHashSet<String>>;

/// Composite cache key for stopwords extended with config-level custom words.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct CustomStopwordsKey {
    language: String,
    words: Vec<String>,
}

impl CustomStopwordsKey {
    pub(crate) fn new(language: &str, words: &[String]) -> Self {
        let mut words: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();
        words.sort_unstable();
        words.dedup();

        Self {
            language: language.to_string(),
            words,
        }
    }

    pub(crate) fn words(&self) -> &[String] {
        &self.words
    }
}

pub(crate) struct StopwordsCache {
    by_language: Mutex<LruCache<String, SharedStopwords>>,
    by_custom: Mutex<LruCache<CustomStopwordsKey, SharedStopwords>>,
}

impl Default for StopwordsCache {
    fn default() -> Self {
        Self::with_capacity(LANGUAGE_CACHE_CAPACITY, CUSTOM_CACHE_CAPACITY)
    }
}

impl StopwordsCache {
    /// Zero capacities are bumped to one.
    pub(crate) fn with_capacity(language_capacity: usize, custom_capacity: usize) -> Self {
        Self {
            by_language: Mutex::new(LruCache::new(NonZeroUsize::new(language_capacity).unwrap_or(NonZeroUsize::MIN))),
            by_custom: Mutex::new(LruCache::new(NonZeroUsize::new(custom_capacity).unwrap_or(NonZeroUsize::MIN))),
        }
    }

    pub(crate) fn get_or_insert_language<F>(&self, language: &str, compute: F) -> SharedStopwords
    where
        F: FnOnce() -> AHashSet<String>,
    {
        if let Some(hit) = self.by_language.lock().get(language) {
            return Arc::clone(hit);
        }

        tracing::debug!("Stopwords cache miss for language '{}'", language);
        let computed = Arc::new(compute());
        self.by_language.lock().put(language.to_string(), Arc::clone(&computed));
        computed
    }

    pub(crate) fn get_or_insert_custom<F>(&self, key: CustomStopwordsKey, compute: F) -> SharedStopwords
    where
        F: FnOnce(&CustomStopwordsKey) -> AHashSet<String>,
    {
        if let Some(hit) = self.by_custom.lock().get(&key) {
            return Arc::clone(hit);
        }

        tracing::debug!(
            "Stopwords cache miss for language '{}' with {} custom words",
            key.language,
            key.words.len()
        );
        let computed = Arc::new(compute(&key));
        self.by_custom.lock().put(key, Arc::clone(&computed));
        computed
    }

    pub(crate) fn clear(&self) {
        self.by_language.lock().clear();
        self.by_custom.lock().clear();
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> (usize, usize) {
        (self.by_language.lock().len(), self.by_custom.lock().len())
    }
}
