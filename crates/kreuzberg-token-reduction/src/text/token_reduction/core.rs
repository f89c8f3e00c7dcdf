use crate::error::{KreuzbergError, Result};
use crate::stopwords::{StopwordsManager, default_stopwords_manager};
use crate::text::token_reduction::{
    config::{ReductionMode, TokenReductionConfig},
    filters,
};
use ahash::AHashSet;
use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;
use std::sync::Arc;

static LANGUAGE_CODE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9-]+$").expect("Language code regex pattern is valid and should compile"));

/// Maximum accepted input length, in characters.
pub const MAX_TEXT_CHARS: usize = 10_000_000;

/// Language used when neither the caller nor the config names one, and the
/// fallback for languages the stopwords manager doesn't know.
const FALLBACK_LANGUAGE: &str = "en";

/// Reusable token reducer bound to one configuration and language.
///
/// Construction validates the language; [`reduce`](Self::reduce) validates each
/// text. A reducer is `Send + Sync` and can be shared across threads.
///
/// # Example
///
/// ```rust
/// use kreuzberg_token_reduction::{ReductionMode, TokenReducer, TokenReductionConfig};
///
/// let config = TokenReductionConfig::new(ReductionMode::Light);
/// let reducer = TokenReducer::new(&config, None)?;
/// assert_eq!(reducer.reduce("Hello   world!!!")?, "Hello world!");
/// # Ok::<(), kreuzberg_token_reduction::KreuzbergError>(())
/// ```
pub struct TokenReducer<'a> {
    config: &'a TokenReductionConfig,
    manager: &'a StopwordsManager,
    language: String,
}

impl<'a> TokenReducer<'a> {
    /// Create a reducer backed by the process-wide default stopwords manager.
    ///
    /// # Errors
    ///
    /// Returns `KreuzbergError::Validation` if `language` is empty, whitespace-only
    /// or not made of ASCII letters, digits and hyphens.
    pub fn new(config: &'a TokenReductionConfig, language: Option<&str>) -> Result<Self> {
        Self::with_manager(config, language, default_stopwords_manager())
    }

    /// Create a reducer backed by a caller-owned stopwords manager.
    pub fn with_manager(
        config: &'a TokenReductionConfig,
        language: Option<&str>,
        manager: &'a StopwordsManager,
    ) -> Result<Self> {
        if let Some(lang) = language {
            validate_language(lang)?;
        }

        let language = language
            .or(config.language_hint.as_deref())
            .unwrap_or(FALLBACK_LANGUAGE)
            .to_string();

        Ok(Self {
            config,
            manager,
            language,
        })
    }

    /// The requested stopword language, before any fallback.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Reduce one text according to the configured mode.
    ///
    /// # Errors
    ///
    /// Returns `KreuzbergError::Validation` if the text exceeds
    /// [`MAX_TEXT_CHARS`] characters.
    pub fn reduce(&self, text: &str) -> Result<String> {
        validate_text_length(text)?;
        Ok(self.reduce_validated(text))
    }

    /// Reduce many texts in parallel. Output order matches input order.
    ///
    /// Every text is validated before any work starts.
    pub fn batch_reduce(&self, texts: &[&str]) -> Result<Vec<String>> {
        for text in texts {
            validate_text_length(text)?;
        }

        if texts.len() < 2 {
            return Ok(texts.iter().map(|text| self.reduce_validated(text)).collect());
        }

        Ok(texts.par_iter().map(|text| self.reduce_validated(text)).collect())
    }

    fn reduce_validated(&self, text: &str) -> String {
        tracing::trace!(
            mode = self.config.mode.as_str(),
            bytes = text.len(),
            preserve_markdown = self.config.preserve_markdown,
            "Reducing tokens"
        );

        match self.config.mode {
            ReductionMode::Off => text.to_string(),
            _ if text.trim().is_empty() => String::new(),
            ReductionMode::Light => self.apply_light_reduction(text),
            ReductionMode::Moderate => self.apply_moderate_reduction(text),
            ReductionMode::Unrecognized => text.to_string(),
        }
    }

    fn apply_light_reduction(&self, text: &str) -> String {
        if self.config.preserve_markdown {
            filters::apply_light_filters_preserving_markdown(text)
        } else {
            filters::apply_light_filters(text)
        }
    }

    fn apply_moderate_reduction(&self, text: &str) -> String {
        let result = self.apply_light_reduction(text);

        let Some(stopwords) = self.resolve_stopwords() else {
            return result;
        };

        if self.config.preserve_markdown {
            filters::remove_stopwords_preserving_markdown(&result, &stopwords)
        } else {
            filters::remove_stopwords(&result, &stopwords)
        }
    }

    /// Stopwords for the effective language, or `None` when even the fallback
    /// language is unknown to the manager.
    fn resolve_stopwords(&self) -> Option<Arc<AHashSet<String>>> {
        let language = if self.manager.has_language(&self.language) {
            self.language.as_str()
        } else if self.manager.has_language(FALLBACK_LANGUAGE) {
            tracing::debug!(
                "No stopwords for language '{}', falling back to '{}'",
                self.language,
                FALLBACK_LANGUAGE
            );
            FALLBACK_LANGUAGE
        } else {
            tracing::warn!(
                "No stopwords for language '{}' or fallback '{}', skipping stopword removal",
                self.language,
                FALLBACK_LANGUAGE
            );
            return None;
        };

        let custom_words = self
            .config
            .custom_stopwords
            .as_ref()
            .and_then(|custom| custom.get(language));

        Some(match custom_words {
            Some(words) => self.manager.cached_stopwords_with_custom(language, words),
            None => self.manager.cached_stopwords(language),
        })
    }
}

fn validate_language(language: &str) -> Result<()> {
    if language.trim().is_empty() {
        return Err(KreuzbergError::validation("Language cannot be empty or whitespace-only"));
    }

    if !LANGUAGE_CODE_REGEX.is_match(language) {
        return Err(KreuzbergError::validation(format!(
            "Invalid language code format: {}",
            language
        )));
    }

    Ok(())
}

fn validate_text_length(text: &str) -> Result<()> {
    // Byte length bounds character count from above, so short texts skip the count.
    if text.len() <= MAX_TEXT_CHARS {
        return Ok(());
    }

    let chars = text.chars().count();
    if chars > MAX_TEXT_CHARS {
        return Err(KreuzbergError::validation(format!(
            "Text too large: {} characters (max 10,000,000)",
            chars
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reducer_for(config: &TokenReductionConfig) -> TokenReducer<'_> {
        TokenReducer::new(config, None).unwrap()
    }

    #[test]
    fn test_off_mode_preserves_text() {
        let config = TokenReductionConfig::new(ReductionMode::Off);
        let reducer = reducer_for(&config);

        for input in ["Text   with    multiple   spaces!!!", "   ", "", "\n\n\n\nx"] {
            assert_eq!(reducer.reduce(input).unwrap(), input);
        }
    }

    #[test]
    fn test_whitespace_only_input_returns_empty() {
        for mode in [ReductionMode::Light, ReductionMode::Moderate] {
            let config = TokenReductionConfig::new(mode);
            let reducer = reducer_for(&config);
            assert_eq!(reducer.reduce("  \n\t  ").unwrap(), "");
            assert_eq!(reducer.reduce("").unwrap(), "");
        }
    }

    #[test]
    fn test_unrecognized_mode_passes_text_through() {
        let config: TokenReductionConfig = serde_json::from_str(r#"{"mode": "maximum"}"#).unwrap();
        assert_eq!(config.mode, ReductionMode::Unrecognized);
        let reducer = reducer_for(&config);

        assert_eq!(reducer.reduce("   ").unwrap(), "");
        assert_eq!(reducer.reduce(" \n\t ").unwrap(), "");
        assert_eq!(reducer.reduce("Keep   the   text!!!").unwrap(), "Keep   the   text!!!");
    }

    #[test]
    fn test_light_reduction() {
        let config = TokenReductionConfig::new(ReductionMode::Light);
        let reducer = reducer_for(&config);

        let result = reducer.reduce("Hello   world!!!   How are you???").unwrap();
        assert_eq!(result, "Hello world! How are you?");
    }

    #[test]
    fn test_moderate_reduction() {
        let config = TokenReductionConfig::new(ReductionMode::Moderate);
        let reducer = TokenReducer::new(&config, Some("en")).unwrap();

        let input = "The quick brown fox jumps over the lazy dog.";
        let result = reducer.reduce(input).unwrap();

        assert!(result.len() < input.len());
        let tokens: Vec<&str> = result.split_whitespace().collect();
        assert!(!tokens.contains(&"the"));
        assert!(!tokens.contains(&"The"));
        assert!(!tokens.contains(&"over"));
        assert!(tokens.contains(&"quick"));
        assert!(tokens.contains(&"brown"));
        assert!(tokens.contains(&"fox"));
    }

    #[test]
    fn test_language_resolution_order() {
        let config = TokenReductionConfig::new(ReductionMode::Moderate).with_language_hint("de");

        assert_eq!(TokenReducer::new(&config, Some("fr")).unwrap().language(), "fr");
        assert_eq!(TokenReducer::new(&config, None).unwrap().language(), "de");

        let no_hint = TokenReductionConfig::new(ReductionMode::Moderate);
        assert_eq!(TokenReducer::new(&no_hint, None).unwrap().language(), "en");
    }

    #[test]
    fn test_language_hint_selects_stopwords() {
        let config = TokenReductionConfig::new(ReductionMode::Moderate).with_language_hint("de");
        let reducer = reducer_for(&config);

        assert_eq!(reducer.reduce("Der Hund und die Katze").unwrap(), "Hund Katze");
    }

    #[test]
    fn test_unknown_language_falls_back_to_english() {
        let config = TokenReductionConfig::new(ReductionMode::Moderate);
        let reducer = TokenReducer::new(&config, Some("xx-unknown")).unwrap();

        assert_eq!(reducer.reduce("the cat and the hat").unwrap(), "cat hat");
    }

    #[test]
    fn test_resolve_stopwords_falls_back_to_english_set() {
        let manager = StopwordsManager::new();
        let config = TokenReductionConfig::new(ReductionMode::Moderate);
        let reducer = TokenReducer::with_manager(&config, Some("zz"), &manager).unwrap();

        let resolved = reducer.resolve_stopwords().unwrap();
        assert_eq!(*resolved, manager.get_stopwords("en"));
    }

    #[test]
    fn test_custom_stopwords_from_config() {
        let config = TokenReductionConfig::new(ReductionMode::Moderate).with_custom_stopwords("en", ["Lorem", "ipsum"]);
        let reducer = reducer_for(&config);

        assert_eq!(reducer.reduce("lorem ipsum dolor the sit").unwrap(), "dolor sit");
    }

    #[test]
    fn test_custom_stopwords_for_other_language_ignored() {
        let config = TokenReductionConfig::new(ReductionMode::Moderate).with_custom_stopwords("de", ["dolor"]);
        let reducer = reducer_for(&config);

        assert_eq!(reducer.reduce("lorem dolor").unwrap(), "lorem dolor");
    }

    #[test]
    fn test_custom_manager_language() {
        let mut manager = StopwordsManager::new();
        manager.add_custom_stopwords("xx", ["blah"]);
        let config = TokenReductionConfig::new(ReductionMode::Moderate);
        let reducer = TokenReducer::with_manager(&config, Some("xx"), &manager).unwrap();

        assert_eq!(reducer.reduce("blah value the").unwrap(), "value the");
    }

    #[test]
    fn test_invalid_language_codes() {
        let config = TokenReductionConfig::new(ReductionMode::Moderate);

        let err = TokenReducer::new(&config, Some("invalid/lang$code")).err().unwrap();
        assert!(matches!(err, KreuzbergError::Validation { .. }));
        assert!(err.to_string().contains("invalid/lang$code"));

        for bad in ["", "   ", "en US", "en_US", "日本"] {
            assert!(TokenReducer::new(&config, Some(bad)).is_err(), "{:?} should be rejected", bad);
        }
    }

    #[test]
    fn test_empty_language_message() {
        let config = TokenReductionConfig::default();
        let err = TokenReducer::new(&config, Some(" ")).err().unwrap();
        assert!(err.to_string().contains("empty or whitespace-only"));
    }

    #[test]
    fn test_invalid_language_rejected_even_when_off() {
        let config = TokenReductionConfig::new(ReductionMode::Off);
        assert!(TokenReducer::new(&config, Some("bad code")).is_err());
    }

    #[test]
    fn test_language_hint_is_not_validated() {
        let config = TokenReductionConfig::new(ReductionMode::Moderate).with_language_hint("weird/hint");
        let reducer = reducer_for(&config);
        assert_eq!(reducer.reduce("the cat").unwrap(), "cat");
    }

    #[test]
    fn test_text_too_large() {
        let config = TokenReductionConfig::new(ReductionMode::Off);
        let reducer = reducer_for(&config);
        let text = "a".repeat(MAX_TEXT_CHARS + 1);

        let err = reducer.reduce(&text).unwrap_err();
        assert!(matches!(err, KreuzbergError::Validation { .. }));
        assert!(err.to_string().contains("Text too large"));
    }

    #[test]
    fn test_text_at_limit_counts_characters_not_bytes() {
        let config = TokenReductionConfig::new(ReductionMode::Off);
        let reducer = reducer_for(&config);
        // Two bytes per character: byte length exceeds the limit, character count does not.
        let text = "é".repeat(MAX_TEXT_CHARS / 2 + 1);

        assert!(reducer.reduce(&text).is_ok());
    }

    #[test]
    fn test_markdown_code_block_untouched_in_moderate_mode() {
        let config = TokenReductionConfig::new(ReductionMode::Moderate).with_preserve_markdown(true);
        let reducer = reducer_for(&config);

        let input = "# The Guide\n\nThe   setup is over quickly!!!\n\n```python\ndef  the_fn():\n    return   the  value\n```\n\n- the first item";
        let result = reducer.reduce(input).unwrap();

        assert!(result.contains("```python\ndef  the_fn():\n    return   the  value\n```"));
        assert!(result.starts_with("# The Guide"));
        assert!(result.contains("- the first item"));
        assert!(result.contains("setup is quickly!"));
    }

    #[test]
    fn test_batch_matches_single() {
        let config = TokenReductionConfig::new(ReductionMode::Moderate);
        let reducer = reducer_for(&config);
        let texts = ["The quick brown fox", "over the   hills!!!", "", "and the NASA 42 the"];

        let batch = reducer.batch_reduce(&texts).unwrap();
        let single: Vec<String> = texts.iter().map(|t| reducer.reduce(t).unwrap()).collect();
        assert_eq!(batch, single);
    }

    #[test]
    fn test_batch_rejects_oversized_text() {
        let config = TokenReductionConfig::new(ReductionMode::Light);
        let reducer = reducer_for(&config);
        let big = "a".repeat(MAX_TEXT_CHARS + 1);

        assert!(reducer.batch_reduce(&["ok", &big]).is_err());
    }

    #[test]
    fn test_reducer_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TokenReducer<'static>>();
    }
}
