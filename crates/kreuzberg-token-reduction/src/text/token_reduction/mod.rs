mod config;
mod core;
mod filters;
mod markdown;
mod stats;

pub use config::{ReductionMode, TokenReductionConfig};
pub use core::{MAX_TEXT_CHARS, TokenReducer};
pub use stats::{ReductionStats, get_reduction_stats};

use crate::stopwords::StopwordsManager;

/// Reduces token count in text while preserving structure.
///
/// `light` mode collapses whitespace, repeated punctuation and HTML comments;
/// `moderate` additionally drops stopwords for the resolved language. With
/// `preserve_markdown` set, headings, tables, list items and fenced code pass
/// through untouched.
///
/// # Arguments
///
/// * `text` - The input text to reduce
/// * `config` - Configuration specifying reduction mode and options
/// * `language` - Optional language code (e.g., "en", "de"); falls back to
///   `config.language_hint`, then `"en"`
///
/// # Returns
///
/// Returns the reduced text. Mode `off` returns the input unchanged.
///
/// # Errors
///
/// Returns `KreuzbergError::Validation` if the language is empty or malformed,
/// or the text exceeds 10,000,000 characters.
///
/// # Examples
///
/// ```rust
/// use kreuzberg_token_reduction::{reduce_tokens, ReductionMode, TokenReductionConfig};
///
/// let config = TokenReductionConfig::new(ReductionMode::Moderate);
/// let reduced = reduce_tokens("The quick brown fox jumps over the lazy dog", &config, Some("en"))?;
/// assert_eq!(reduced, "quick brown fox jumps lazy dog");
/// # Ok::<(), kreuzberg_token_reduction::KreuzbergError>(())
/// ```
pub fn reduce_tokens(text: &str, config: &TokenReductionConfig, language: Option<&str>) -> crate::error::Result<String> {
    let reducer = TokenReducer::new(config, language)?;
    reducer.reduce(text)
}

/// Same as [`reduce_tokens`], using a caller-owned stopwords manager.
///
/// # Examples
///
/// ```rust
/// use kreuzberg_token_reduction::{reduce_tokens_with_manager, ReductionMode, TokenReductionConfig};
/// use kreuzberg_token_reduction::stopwords::StopwordsManager;
///
/// let mut manager = StopwordsManager::new();
/// manager.add_custom_stopwords("en", ["lorem"]);
///
/// let config = TokenReductionConfig::new(ReductionMode::Moderate);
/// let reduced = reduce_tokens_with_manager("lorem dolor sit", &config, None, &manager)?;
/// assert_eq!(reduced, "dolor sit");
/// # Ok::<(), kreuzberg_token_reduction::KreuzbergError>(())
/// ```
pub fn reduce_tokens_with_manager(
    text: &str,
    config: &TokenReductionConfig,
    language: Option<&str>,
    manager: &StopwordsManager,
) -> crate::error::Result<String> {
    let reducer = TokenReducer::with_manager(config, language, manager)?;
    reducer.reduce(text)
}

/// Reduces token count for multiple texts in parallel.
///
/// All texts share the configuration and language. Work is spread over the
/// Rayon thread pool.
///
/// # Returns
///
/// Returns the reduced texts in input order.
///
/// # Errors
///
/// Fails before reducing anything if the language is invalid or any text is
/// too large.
///
/// # Examples
///
/// ```rust
/// use kreuzberg_token_reduction::{batch_reduce_tokens, ReductionMode, TokenReductionConfig};
///
/// let texts = vec![
///     "This is the first document!!!",
///     "Here is   another one.",
/// ];
/// let config = TokenReductionConfig::new(ReductionMode::Light);
/// let reduced = batch_reduce_tokens(&texts, &config, None)?;
/// assert_eq!(reduced, vec!["This is the first document!", "Here is another one."]);
/// # Ok::<(), kreuzberg_token_reduction::KreuzbergError>(())
/// ```
pub fn batch_reduce_tokens(
    texts: &[&str],
    config: &TokenReductionConfig,
    language: Option<&str>,
) -> crate::error::Result<Vec<String>> {
    let reducer = TokenReducer::new(config, language)?;
    reducer.batch_reduce(texts)
}
