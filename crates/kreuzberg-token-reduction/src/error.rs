//! Error types for token reduction.
//!
//! All fallible operations return [`KreuzbergError`] through the [`Result`] alias:
//!
//! - `Validation` - caller input that violates a precondition (oversized text,
//!   malformed language codes, unreadable or invalid config files)
//! - `StopwordsFile` - problems with an external stopwords file (missing or unreadable
//!   file, invalid JSON, wrong shape)
//! - `Io` - system I/O errors, which always bubble up unchanged
//!
//! # Example
//!
//! ```rust
//! use kreuzberg_token_reduction::{KreuzbergError, Result};
//!
//! fn check_code(code: &str) -> Result<()> {
//!     if code.trim().is_empty() {
//!         return Err(KreuzbergError::validation("Language cannot be empty or whitespace-only"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_code(" ").is_err());
//! ```
use thiserror::Error;

/// Result type alias using `KreuzbergError`.
pub type Result<T> = std::result::Result<T, KreuzbergError>;

/// Main error type for token reduction and stopword management.
#[derive(Debug, Error)]
pub enum KreuzbergError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Stopwords file error: {message}")]
    StopwordsFile {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

macro_rules! error_constructor {
    ($name:ident, $with_source:ident, $variant:ident) => {
        #[doc = concat!("Create a ", stringify!($variant), " error")]
        pub fn $name<S: Into<String>>(message: S) -> Self {
            Self::$variant {
                message: message.into(),
                source: None,
            }
        }

        #[doc = concat!("Create a ", stringify!($variant), " error with source")]
        pub fn $with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
            message: S,
            source: E,
        ) -> Self {
            Self::$variant {
                message: message.into(),
                source: Some(Box::new(source)),
            }
        }
    };
}

impl KreuzbergError {
    error_constructor!(validation, validation_with_source, Validation);
    error_constructor!(stopwords_file, stopwords_file_with_source, StopwordsFile);
}
