use once_cell::sync::Lazy;
use regex::Regex;

static MARKDOWN_BULLET_LIST_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[-*+]\s").expect("Markdown bullet list regex pattern is valid and should compile"));
static MARKDOWN_ORDERED_LIST_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\d+\.\s").expect("Markdown ordered list regex pattern is valid and should compile"));

const CODE_FENCE: &str = "```";

/// Classification of a single markdown line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineKind {
    /// Code fence delimiter. Emitted verbatim, toggles code block state.
    Fence,
    /// Heading, table row, list item or code block content. Emitted verbatim.
    Structural,
    /// Empty or whitespace-only line outside a code block. Passed through as-is.
    Blank,
    /// Ordinary text eligible for reduction.
    Prose,
}

impl LineKind {
    pub(crate) fn is_reducible(self) -> bool {
        matches!(self, LineKind::Prose)
    }
}

/// Stateful line classifier tracking fenced code blocks.
///
/// Lines must be fed in document order; the code block state depends on every
/// line seen before.
#[derive(Debug, Default)]
pub(crate) struct MarkdownLineClassifier {
    in_code_block: bool,
}

impl MarkdownLineClassifier {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn classify(&mut self, line: &str) -> LineKind {
        let trimmed = line.trim();

        if trimmed.starts_with(CODE_FENCE) {
            self.in_code_block = !self.in_code_block;
            return LineKind::Fence;
        }

        if self.in_code_block || is_structural_line(line, trimmed) {
            return LineKind::Structural;
        }

        if trimmed.is_empty() {
            LineKind::Blank
        } else {
            LineKind::Prose
        }
    }
}

fn is_structural_line(line: &str, trimmed: &str) -> bool {
    trimmed.starts_with('#')
        || line.contains('|')
        || MARKDOWN_BULLET_LIST_REGEX.is_match(line)
        || MARKDOWN_ORDERED_LIST_REGEX.is_match(line)
}

/// Apply `reduce_line` to every prose line of `text`, leaving markdown structure intact.
///
/// Lines are rejoined with `\n`; the caller is responsible for final newline
/// normalization and trimming.
pub(crate) fn map_prose_lines<F>(text: &str, mut reduce_line: F) -> String
where
    F: FnMut(&str) -> String,
{
    let mut classifier = MarkdownLineClassifier::new();
    let mut processed_lines: Vec<String> = Vec::new();

    for line in text.split('\n') {
        if classifier.classify(line).is_reducible() {
            processed_lines.push(reduce_line(line));
        } else {
            processed_lines.push(line.to_string());
        }
    }

    processed_lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_all(text: &str) -> Vec<LineKind> {
        let mut classifier = MarkdownLineClassifier::new();
        text.split('\n').map(|line| classifier.classify(line)).collect()
    }

    #[test]
    fn test_headings_are_structural() {
        assert_eq!(classify_all("# Title"), vec![LineKind::Structural]);
        assert_eq!(classify_all("   ### Nested"), vec![LineKind::Structural]);
        assert_eq!(classify_all("#hashtag"), vec![LineKind::Structural]);
    }

    #[test]
    fn test_table_rows_are_structural() {
        assert_eq!(classify_all("| a | b |"), vec![LineKind::Structural]);
        assert_eq!(classify_all("left | right"), vec![LineKind::Structural]);
    }

    #[test]
    fn test_list_items_are_structural() {
        for line in ["- item", "* item", "+ item", "  - nested", "1. first", "  10. tenth"] {
            assert_eq!(classify_all(line), vec![LineKind::Structural], "line: {:?}", line);
        }
    }

    #[test]
    fn test_list_markers_need_trailing_whitespace() {
        assert_eq!(classify_all("-dash"), vec![LineKind::Prose]);
        assert_eq!(classify_all("1.5 percent"), vec![LineKind::Prose]);
    }

    #[test]
    fn test_plain_text_is_prose() {
        assert_eq!(classify_all("The quick brown fox."), vec![LineKind::Prose]);
    }

    #[test]
    fn test_blank_lines() {
        assert_eq!(classify_all("\n   "), vec![LineKind::Blank, LineKind::Blank]);
    }

    #[test]
    fn test_code_fence_toggles_state() {
        let kinds = classify_all("before\n```rust\nlet x = 1;\n\n```\nafter");
        assert_eq!(
            kinds,
            vec![
                LineKind::Prose,
                LineKind::Fence,
                LineKind::Structural,
                LineKind::Structural,
                LineKind::Fence,
                LineKind::Prose,
            ]
        );
    }

    #[test]
    fn test_indented_fence_is_recognized() {
        let kinds = classify_all("  ```\ncode\n  ```");
        assert_eq!(kinds, vec![LineKind::Fence, LineKind::Structural, LineKind::Fence]);
    }

    #[test]
    fn test_unclosed_fence_keeps_rest_structural() {
        let kinds = classify_all("```\nthe rest\nof the document");
        assert_eq!(kinds, vec![LineKind::Fence, LineKind::Structural, LineKind::Structural]);
    }

    #[test]
    fn test_map_prose_lines_only_touches_prose() {
        let input = "# Heading\nsome text\n\n- list item\n```\ncode text\n```\nmore text";
        let result = map_prose_lines(input, |line| line.to_uppercase());
        assert_eq!(
            result,
            "# Heading\nSOME TEXT\n\n- list item\n```\ncode text\n```\nMORE TEXT"
        );
    }
}
