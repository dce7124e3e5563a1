//! Recover literal values from raw generator output
//!
//! Completions are free-form text: sometimes a bare literal, sometimes a
//! fenced code block, sometimes a one-line list of literals followed by a
//! comment. Values are delimited by `"` or `` ` ``; whichever delimiter
//! appears first on a line is the one scanned for, and the other character
//! is ordinary content inside the value.

use crate::escape::decode_escapes;
use std::borrow::Cow;

/// Characters that can open and close a value
pub const DELIMITERS: [char; 2] = ['"', '`'];

/// Scans completions for delimited literal values
///
/// # Examples
///
/// ```
/// use seedai_extractor::ValueExtractor;
///
/// let extractor = ValueExtractor::new(true, None);
/// let values = extractor.extract(r#"[]string{"a", `b`} // two values"#);
/// assert_eq!(values, vec!["a", "b"]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValueExtractor {
    multi_value: bool,
    leading_delimiter: Option<char>,
}

impl ValueExtractor {
    /// Create an extractor
    ///
    /// `leading_delimiter` is prepended to completions that do not start with
    /// it, for prompts that end by opening a literal.
    pub fn new(multi_value: bool, leading_delimiter: Option<char>) -> Self {
        Self {
            multi_value,
            leading_delimiter,
        }
    }

    /// Whether more than one value is collected per line
    pub fn multi_value(&self) -> bool {
        self.multi_value
    }

    /// Delimiter assumed to open the completion
    pub fn leading_delimiter(&self) -> Option<char> {
        self.leading_delimiter
    }

    /// Decoded values found in `output`, in order
    ///
    /// Never fails. A non-empty output without any delimited value yields
    /// the decoded output itself as the only value.
    pub fn extract(&self, output: &str) -> Vec<String> {
        if output.is_empty() {
            return Vec::new();
        }

        let text: Cow<'_, str> = match self.leading_delimiter {
            Some(d) if !output.starts_with(d) => Cow::Owned(format!("{}{}", d, output)),
            _ => Cow::Borrowed(output),
        };

        let values: Vec<String> = text
            .lines()
            .filter(|line| !is_fence_line(line))
            .flat_map(|line| values_in_line(line, self.multi_value))
            .map(decode_escapes)
            .filter(|value| !value.is_empty())
            .collect();

        if values.is_empty() {
            return vec![decode_escapes(output)];
        }

        values
    }
}

/// Free-function form of [`ValueExtractor::extract`]
pub fn extract_values(output: &str, multi_value: bool, leading_delimiter: Option<char>) -> Vec<String> {
    ValueExtractor::new(multi_value, leading_delimiter).extract(output)
}

/// Raw (still escaped) delimited values on one line
///
/// In single-value mode only the first delimited pair counts. An opening
/// delimiter without a matching close ends the scan of the line.
pub fn values_in_line(line: &str, multi_value: bool) -> Vec<&str> {
    let mut values = Vec::new();
    let mut rest = line;

    while let Some((open, delimiter)) = first_opening(rest) {
        let start = open + delimiter.len_utf8();
        let Some(len) = find_unescaped(&rest[start..], delimiter) else {
            break;
        };

        let value = &rest[start..start + len];
        rest = &rest[start + len + delimiter.len_utf8()..];

        if !value.is_empty() {
            values.push(value);
        }
        if !multi_value {
            break;
        }
    }

    values
}

/// Earliest unescaped delimiter of either kind
fn first_opening(text: &str) -> Option<(usize, char)> {
    DELIMITERS
        .iter()
        .filter_map(|&d| find_unescaped(text, d).map(|index| (index, d)))
        .min_by_key(|&(index, _)| index)
}

/// Byte index of the first `delimiter` not directly preceded by a backslash
fn find_unescaped(text: &str, delimiter: char) -> Option<usize> {
    let mut previous = None;
    for (index, c) in text.char_indices() {
        if c == delimiter && previous != Some('\\') {
            return Some(index);
        }
        previous = Some(c);
    }
    None
}

/// Markdown fence markers such as ```` ``` ```` or ```` ```go ````
fn is_fence_line(line: &str) -> bool {
    line.trim()
        .strip_prefix("```")
        .is_some_and(|tag| !tag.contains(DELIMITERS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escaped_quotes_do_not_close() {
        let line = r#""a\"bc\"def" // asdasdas"#;
        assert_eq!(values_in_line(line, false), vec![r#"a\"bc\"def"#]);
    }

    #[test]
    fn test_first_unescaped_quote_closes() {
        let line = r#""a"bc\"def" // asdasdas"#;
        assert_eq!(values_in_line(line, false), vec!["a"]);
    }

    #[test]
    fn test_unclosed_value_yields_nothing() {
        let line = r#""a\"bc\"def\" // asdasdas"#;
        assert!(values_in_line(line, false).is_empty());
    }

    #[test]
    fn test_no_delimiters() {
        assert!(values_in_line("plain text", true).is_empty());
        assert!(values_in_line("", true).is_empty());
    }

    #[test]
    fn test_multi_value_mixed_delimiters() {
        let line = r#"[]string{"a\"bc\"def", `value2`, "3"} // asdasdas"#;
        assert_eq!(
            values_in_line(line, true),
            vec![r#"a\"bc\"def"#, "value2", "3"]
        );
    }

    #[test]
    fn test_single_value_takes_first_pair_only() {
        let line = r#"[]string{"a\"bc\"def", `value2`, "3"}"#;
        assert_eq!(values_in_line(line, false), vec![r#"a\"bc\"def"#]);
    }

    #[test]
    fn test_empty_values_filtered() {
        let line = r#"[]string{"", ``, "a""#;
        assert_eq!(values_in_line(line, true), vec!["a"]);
    }

    #[test]
    fn test_empty_first_pair_in_single_mode() {
        assert!(values_in_line(r#""" "x""#, false).is_empty());
    }

    #[test]
    fn test_other_delimiter_is_content() {
        assert_eq!(values_in_line(r#"`"`"#, false), vec!["\""]);
        assert_eq!(values_in_line(r#""`""#, false), vec!["`"]);
    }

    #[test]
    fn test_multi_value_keeps_earlier_values_on_unclosed_tail() {
        let line = r#""a", "b", "unterminated"#;
        assert_eq!(values_in_line(line, true), vec!["a", "b"]);
    }

    #[test]
    fn test_multibyte_content() {
        assert_eq!(values_in_line("\"héllo\" `wörld`", true), vec!["héllo", "wörld"]);
    }

    #[test]
    fn test_extract_decodes_values() {
        let values = extract_values(r#"[]string{"a\"bc\"def", `value2`, "3"} // asdasdas"#, true, None);
        assert_eq!(values, vec![r#"a"bc"def"#, "value2", "3"]);
    }

    #[test]
    fn test_extract_prepends_leading_delimiter() {
        let values = extract_values(r#"a\"bc\"def" // asdasdas"#, false, Some('"'));
        assert_eq!(values, vec![r#"a"bc"def"#]);

        let values = extract_values(r#"a"bc\"def" // asdasdas"#, false, Some('"'));
        assert_eq!(values, vec!["a"]);
    }

    #[test]
    fn test_extract_does_not_double_leading_delimiter() {
        let values = extract_values(r#""abc""#, false, Some('"'));
        assert_eq!(values, vec!["abc"]);
    }

    #[test]
    fn test_extract_fallback_is_decoded_output() {
        // No closing quote anywhere: the whole completion is the value
        let output = r#"a\"bc\"def\" // asdasdas"#;
        let values = extract_values(output, false, Some('"'));
        assert_eq!(values, vec![r#"a"bc"def" // asdasdas"#]);

        assert_eq!(extract_values("just text", true, None), vec!["just text"]);
    }

    #[test]
    fn test_extract_empty_output() {
        assert!(extract_values("", true, None).is_empty());
        assert!(extract_values("", false, Some('"')).is_empty());
    }

    #[test]
    fn test_extract_across_lines_in_order() {
        let output = "\"first\"\nnoise\n`second` \"third\"\n";
        assert_eq!(extract_values(output, true, None), vec!["first", "second", "third"]);
        assert_eq!(extract_values(output, false, None), vec!["first", "second"]);
    }

    #[test]
    fn test_extract_skips_markdown_fences() {
        let output = "```go\n[]string{\"x\", \"y\"}\n```";
        assert_eq!(extract_values(output, true, None), vec!["x", "y"]);
    }

    #[test]
    fn test_extract_only_fences_falls_back() {
        let output = "```\n```";
        assert_eq!(extract_values(output, true, None), vec![output]);
    }

    #[test]
    fn test_quote_after_escaped_backslash_does_not_close() {
        // Only the immediately preceding character is checked
        let output = r#""\\""#;
        assert!(values_in_line(output, false).is_empty());
        assert_eq!(extract_values(output, false, None), vec![output]);
    }

    #[test]
    fn test_backtick_value_with_quote_inside() {
        assert_eq!(extract_values("`\"`", false, None), vec!["\""]);
        assert_eq!(extract_values("\"`\"", false, None), vec!["`"]);
    }

    #[test]
    fn test_is_fence_line() {
        assert!(is_fence_line("```"));
        assert!(is_fence_line("  ```go  "));
        assert!(!is_fence_line("```\"x\"```"));
        assert!(!is_fence_line("`x`"));
    }
}
