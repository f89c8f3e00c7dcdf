use serde::Serialize;

/// Before/after measurements for one reduction.
///
/// Characters are Unicode scalar values; tokens are whitespace-separated runs.
/// Ratios are `(original - reduced) / original`, negative when the text grew,
/// and `0.0` when the original count is zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReductionStats {
    pub original_characters: usize,
    pub reduced_characters: usize,
    pub original_tokens: usize,
    pub reduced_tokens: usize,
    pub character_reduction_ratio: f64,
    pub token_reduction_ratio: f64,
}

/// Calculates statistics comparing original and reduced text.
///
/// # Arguments
///
/// * `original` - The text before reduction
/// * `reduced` - The text after reduction
///
/// # Examples
///
/// ```rust
/// use kreuzberg_token_reduction::get_reduction_stats;
///
/// let stats = get_reduction_stats("the quick brown fox", "quick brown fox");
/// assert_eq!(stats.original_tokens, 4);
/// assert_eq!(stats.reduced_tokens, 3);
/// assert!((stats.token_reduction_ratio - 0.25).abs() < f64::EPSILON);
/// ```
pub fn get_reduction_stats(original: &str, reduced: &str) -> ReductionStats {
    let original_characters = original.chars().count();
    let reduced_characters = reduced.chars().count();
    let original_tokens = original.split_whitespace().count();
    let reduced_tokens = reduced.split_whitespace().count();

    ReductionStats {
        original_characters,
        reduced_characters,
        original_tokens,
        reduced_tokens,
        character_reduction_ratio: reduction_ratio(original_characters, reduced_characters),
        token_reduction_ratio: reduction_ratio(original_tokens, reduced_tokens),
    }
}

fn reduction_ratio(original: usize, reduced: usize) -> f64 {
    if original == 0 {
        return 0.0;
    }
    (original as f64 - reduced as f64) / original as f64
}
