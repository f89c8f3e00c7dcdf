//! Token reduction configuration.
//!
//! [`TokenReductionConfig`] can be built in code or loaded from TOML, YAML or
//! JSON. [`TokenReductionConfig::discover`] looks for a `kreuzberg.toml` with a
//! `[token_reduction]` table in the current directory and its parents.

use crate::error::{KreuzbergError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

/// How much of the pipeline runs.
///
/// Serialized as `"off"`, `"light"` or `"moderate"`. Deserialization is lenient
/// and goes through `From<&str>`: unrecognized strings become
/// [`ReductionMode::Unrecognized`]. Use [`str::parse`] for strict parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReductionMode {
    /// Identity transform.
    #[default]
    Off,
    /// Normalization only.
    Light,
    /// Normalization followed by stopword filtering.
    Moderate,
    /// Fallthrough for mode strings that name no known mode. Whitespace-only
    /// text still reduces to `""`; anything else passes through unchanged.
    /// Serialized as `"unrecognized"`, which strict parsing rejects.
    Unrecognized,
}

impl ReductionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReductionMode::Off => "off",
            ReductionMode::Light => "light",
            ReductionMode::Moderate => "moderate",
            ReductionMode::Unrecognized => "unrecognized",
        }
    }
}

impl std::fmt::Display for ReductionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReductionMode {
    type Err = KreuzbergError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "off" => Ok(ReductionMode::Off),
            "light" => Ok(ReductionMode::Light),
            "moderate" => Ok(ReductionMode::Moderate),
            other => Err(KreuzbergError::validation(format!(
                "Invalid token reduction mode '{}'. Valid modes: off, light, moderate",
                other
            ))),
        }
    }
}

impl From<&str> for ReductionMode {
    /// Unrecognized modes map to [`ReductionMode::Unrecognized`].
    fn from(s: &str) -> Self {
        s.parse().unwrap_or_else(|_| {
            tracing::warn!("Unrecognized token reduction mode '{}', passing text through unchanged", s);
            ReductionMode::Unrecognized
        })
    }
}

impl From<String> for ReductionMode {
    fn from(s: String) -> Self {
        ReductionMode::from(s.as_str())
    }
}

impl From<ReductionMode> for String {
    fn from(mode: ReductionMode) -> Self {
        mode.as_str().to_string()
    }
}

/// Token reduction settings, constructed once per call.
///
/// # Example
///
/// ```rust
/// use kreuzberg_token_reduction::{ReductionMode, TokenReductionConfig};
///
/// let config = TokenReductionConfig::new(ReductionMode::Moderate)
///     .with_preserve_markdown(true)
///     .with_language_hint("de");
/// assert_eq!(config.mode, ReductionMode::Moderate);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenReductionConfig {
    /// Reduction mode: "off", "light", "moderate"
    #[serde(default)]
    pub mode: ReductionMode,

    /// Leave markdown headings, tables, lists and fenced code untouched
    #[serde(default)]
    pub preserve_markdown: bool,

    /// Stopword language used when the caller passes none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_hint: Option<String>,

    /// Extra stopwords per language, merged with the manager's set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_stopwords: Option<HashMap<String, Vec<String>>>,
}

impl TokenReductionConfig {
    pub fn new(mode: ReductionMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn with_preserve_markdown(mut self, preserve_markdown: bool) -> Self {
        self.preserve_markdown = preserve_markdown;
        self
    }

    pub fn with_language_hint(mut self, language: impl Into<String>) -> Self {
        self.language_hint = Some(language.into());
        self
    }

    pub fn with_custom_stopwords<I, S>(mut self, language: impl Into<String>, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.custom_stopwords
            .get_or_insert_with(HashMap::new)
            .entry(language.into())
            .or_default()
            .extend(words.into_iter().map(Into::into));
        self
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `KreuzbergError::Validation` if the file can't be read or is invalid TOML.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = read_config_file(path)?;

        toml::from_str(&content)
            .map_err(|e| KreuzbergError::validation(format!("Invalid TOML in {}: {}", path.display(), e)))
    }

    /// Load configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = read_config_file(path)?;

        serde_yaml_ng::from_str(&content)
            .map_err(|e| KreuzbergError::validation(format!("Invalid YAML in {}: {}", path.display(), e)))
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = read_config_file(path)?;

        serde_json::from_str(&content)
            .map_err(|e| KreuzbergError::validation(format!("Invalid JSON in {}: {}", path.display(), e)))
    }

    /// Load configuration, picking the format from the file extension.
    ///
    /// Supports `.toml`, `.yaml`/`.yml` and `.json`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase());

        match extension.as_deref() {
            Some("toml") => Self::from_toml_file(path),
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(KreuzbergError::validation(format!(
                "Unsupported config file format: {}. Supported formats: .toml, .yaml, .yml, .json",
                path.display()
            ))),
        }
    }

    /// Discover configuration in parent directories.
    ///
    /// Searches for `kreuzberg.toml` in the current directory and its parents and
    /// reads the `[token_reduction]` table of the first file found.
    ///
    /// # Returns
    ///
    /// - `Some(config)` if a file with a `[token_reduction]` table was found
    /// - `None` if no file was found, or the nearest file has no such table
    pub fn discover() -> Result<Option<Self>> {
        let mut current = std::env::current_dir().map_err(KreuzbergError::Io)?;

        loop {
            let kreuzberg_toml = current.join("kreuzberg.toml");
            if kreuzberg_toml.exists() {
                tracing::debug!("Found token reduction config at {}", kreuzberg_toml.display());
                return Self::from_kreuzberg_toml(&kreuzberg_toml);
            }

            if let Some(parent) = current.parent() {
                current = parent.to_path_buf();
            } else {
                break;
            }
        }

        Ok(None)
    }

    fn from_kreuzberg_toml(path: &Path) -> Result<Option<Self>> {
        #[derive(Deserialize)]
        struct Sections {
            token_reduction: Option<TokenReductionConfig>,
        }

        let content = read_config_file(path)?;
        let sections: Sections = toml::from_str(&content)
            .map_err(|e| KreuzbergError::validation(format!("Invalid TOML in {}: {}", path.display(), e)))?;

        Ok(sections.token_reduction)
    }
}

fn read_config_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| KreuzbergError::validation(format!("Failed to read config file {}: {}", path.display(), e)))
}
