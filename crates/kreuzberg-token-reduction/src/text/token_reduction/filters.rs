use crate::text::token_reduction::markdown::map_prose_lines;
use ahash::AHashSet;
use once_cell::sync::Lazy;
use regex::Regex;

static HTML_COMMENT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("HTML comment regex pattern is valid and should compile"));
static REPEATED_SENTENCE_PUNCTUATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[!?.]+([!?.])").expect("Repeated sentence punctuation regex pattern is valid and should compile")
});
static REPEATED_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",{2,}").expect("Repeated comma regex pattern is valid and should compile"));
static EXCESSIVE_NEWLINES_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("Excessive newlines regex pattern is valid and should compile"));
static HORIZONTAL_WHITESPACE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t]+").expect("Horizontal whitespace regex pattern is valid and should compile"));
static NON_WORD_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\W").expect("Non-word character regex pattern is valid and should compile"));
static DECIMAL_DIGIT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\p{Nd}").expect("Decimal digit regex pattern is valid and should compile"));

/// Stopwords shorter than this many characters are never removed.
const MIN_REMOVABLE_WORD_CHARS: usize = 3;

/// Collapse runs of three or more newlines to a blank line.
pub(crate) fn normalize_newlines(text: &str) -> String {
    EXCESSIVE_NEWLINES_REGEX.replace_all(text, "\n\n").into_owned()
}

/// Light reduction of a whole text: comments, punctuation runs, whitespace.
///
/// Passes run in a fixed order; whitespace collapsing relies on comment
/// removal having happened first.
pub(crate) fn apply_light_filters(text: &str) -> String {
    let mut result = HTML_COMMENT_REGEX.replace_all(text, "").into_owned();

    // A run of mixed `!?.` collapses to its last character.
    result = REPEATED_SENTENCE_PUNCTUATION.replace_all(&result, "$1").into_owned();
    result = REPEATED_COMMA.replace_all(&result, ",").into_owned();

    result = normalize_newlines(&result);
    result = HORIZONTAL_WHITESPACE_REGEX.replace_all(&result, " ").into_owned();

    result.trim().to_string()
}

/// Light reduction applied line by line to prose, keeping markdown structure verbatim.
pub(crate) fn apply_light_filters_preserving_markdown(text: &str) -> String {
    let result = map_prose_lines(text, apply_light_filters);
    normalize_newlines(&result).trim().to_string()
}

/// Remove stopwords from whitespace-separated tokens and join survivors with single spaces.
pub(crate) fn remove_stopwords(text: &str, stopwords: &AHashSet<String>) -> String {
    text.split_whitespace()
        .filter(|word| !is_removable_stopword(word, stopwords))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Stopword removal applied line by line to prose, keeping markdown structure verbatim.
pub(crate) fn remove_stopwords_preserving_markdown(text: &str, stopwords: &AHashSet<String>) -> String {
    let result = map_prose_lines(text, |line| remove_stopwords(line, stopwords));
    normalize_newlines(&result).trim().to_string()
}

/// A token is dropped only if its comparison key is a stopword of at least
/// three characters and the token is neither all-uppercase nor contains a
/// decimal digit.
fn is_removable_stopword(word: &str, stopwords: &AHashSet<String>) -> bool {
    let lowered = word.to_lowercase();
    let clean_word = NON_WORD_REGEX.replace_all(&lowered, "");

    stopwords.contains(&*clean_word)
        && clean_word.chars().count() >= MIN_REMOVABLE_WORD_CHARS
        && !is_all_uppercase(word)
        && !DECIMAL_DIGIT_REGEX.is_match(word)
}

/// True if the word has at least one cased letter and no lowercase letters.
fn is_all_uppercase(word: &str) -> bool {
    word.chars().any(|c| c.is_uppercase()) && !word.chars().any(|c| c.is_lowercase())
}
