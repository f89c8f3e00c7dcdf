//! Kreuzberg Token Reduction - shrink extracted document text before it hits a context window
//!
//! Normalizes whitespace and punctuation, strips HTML comments and removes
//! low-information stopwords, while keeping acronyms, numbers, short words and
//! markdown structure intact.
//!
//! # Quick Start
//!
//! ```rust
//! use kreuzberg_token_reduction::{get_reduction_stats, reduce_tokens, ReductionMode, TokenReductionConfig};
//!
//! # fn main() -> kreuzberg_token_reduction::Result<()> {
//! let config = TokenReductionConfig::new(ReductionMode::Moderate);
//! let original = "The API is working with the SDK!!!";
//! let reduced = reduce_tokens(original, &config, Some("en"))?;
//! assert_eq!(reduced, "API is working SDK!");
//!
//! let stats = get_reduction_stats(original, &reduced);
//! assert!(stats.token_reduction_ratio > 0.0);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Stopwords** (`stopwords`): bundled per-language word lists, loaded once, and
//!   [`StopwordsManager`](stopwords::StopwordsManager) for custom overrides with memoized lookups
//! - **Token Reduction** (`text::token_reduction`): the light/moderate pipeline,
//!   markdown-aware line classification and reduction statistics
//! - **Error** (`error`): [`KreuzbergError`] and the crate [`Result`] alias
//!
//! # Modes
//!
//! - `off` - text is returned unchanged
//! - `light` - HTML comments removed, repeated `!?.,` collapsed, blank line runs
//!   and horizontal whitespace normalized
//! - `moderate` - `light` plus stopword removal

#![deny(unsafe_code)]

pub mod error;
pub mod stopwords;
pub mod text;

pub use error::{KreuzbergError, Result};
pub use text::token_reduction::{
    MAX_TEXT_CHARS, ReductionMode, ReductionStats, TokenReducer, TokenReductionConfig, batch_reduce_tokens,
    get_reduction_stats, reduce_tokens, reduce_tokens_with_manager,
};
