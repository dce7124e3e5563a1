//! Lenient backslash-escape decoding for extracted literals
//!
//! The raw value is read as the body of a double-quoted string literal.
//! Anything that would make that literal invalid (a bare `"`, a line break,
//! a dangling backslash, a bad `\x`/`\u`/`\U` sequence) makes the whole
//! decode fail, and the raw value is returned unchanged.

use std::str::Chars;
use thiserror::Error;

/// Why a raw value could not be read as a string literal
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EscapeError {
    /// An unescaped `"` would end the literal early
    #[error("unescaped quote at char {0}")]
    BareQuote(usize),

    /// Literal spans a line break
    #[error("line break inside literal")]
    LineBreak,

    /// Backslash at the very end escapes the closing quote
    #[error("dangling backslash")]
    DanglingBackslash,

    /// `\x`, `\u` or `\U` without enough hex digits
    #[error("truncated \\{0} escape")]
    TruncatedEscape(char),

    /// Escape names a value that is not a Unicode scalar
    #[error("invalid code point {0:#x}")]
    InvalidCodePoint(u32),

    /// `\N{...}` named escapes are not resolved
    #[error("named escapes are not supported")]
    NamedEscape,
}

/// Decode escapes in `raw`, falling back to `raw` itself on failure
///
/// # Examples
///
/// ```
/// use seedai_extractor::decode_escapes;
///
/// assert_eq!(decode_escapes(r#"a\"b\n"#), "a\"b\n");
/// assert_eq!(decode_escapes(r"\x"), r"\x");
/// ```
pub fn decode_escapes(raw: &str) -> String {
    try_decode_escapes(raw).unwrap_or_else(|_| raw.to_string())
}

/// Strictly decode escapes in `raw`
pub fn try_decode_escapes(raw: &str) -> Result<String, EscapeError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    let mut position = 0;

    while let Some(c) = chars.next() {
        match c {
            '"' => return Err(EscapeError::BareQuote(position)),
            '\n' | '\r' => return Err(EscapeError::LineBreak),
            '\\' => {
                let escaped = chars.next().ok_or(EscapeError::DanglingBackslash)?;
                position += 1;
                match escaped {
                    // Line continuation
                    '\n' => {}
                    '\\' => out.push('\\'),
                    '\'' => out.push('\''),
                    '"' => out.push('"'),
                    'a' => out.push('\u{07}'),
                    'b' => out.push('\u{08}'),
                    'f' => out.push('\u{0c}'),
                    'n' => out.push('\n'),
                    'r' => out.push('\r'),
                    't' => out.push('\t'),
                    'v' => out.push('\u{0b}'),
                    '0'..='7' => {
                        let (value, used) = read_octal(escaped, &mut chars);
                        position += used;
                        out.push(code_point(value)?);
                    }
                    'x' => {
                        out.push(code_point(read_hex(&mut chars, 2, 'x')?)?);
                        position += 2;
                    }
                    'u' => {
                        out.push(code_point(read_hex(&mut chars, 4, 'u')?)?);
                        position += 4;
                    }
                    'U' => {
                        out.push(code_point(read_hex(&mut chars, 8, 'U')?)?);
                        position += 8;
                    }
                    'N' => return Err(EscapeError::NamedEscape),
                    // Unknown escapes keep their backslash
                    other => {
                        out.push('\\');
                        out.push(other);
                    }
                }
            }
            other => out.push(other),
        }
        position += 1;
    }

    Ok(out)
}

/// Up to three octal digits, the first already consumed
fn read_octal(first: char, chars: &mut Chars<'_>) -> (u32, usize) {
    let mut value = first.to_digit(8).unwrap_or(0);
    let mut used = 0;
    while used < 2 {
        match chars.clone().next().and_then(|c| c.to_digit(8)) {
            Some(digit) => {
                value = value * 8 + digit;
                chars.next();
                used += 1;
            }
            None => break,
        }
    }
    (value, used)
}

/// Exactly `count` hex digits
fn read_hex(chars: &mut Chars<'_>, count: usize, kind: char) -> Result<u32, EscapeError> {
    let mut value: u32 = 0;
    for _ in 0..count {
        let digit = chars
            .next()
            .and_then(|c| c.to_digit(16))
            .ok_or(EscapeError::TruncatedEscape(kind))?;
        value = value
            .checked_mul(16)
            .and_then(|v| v.checked_add(digit))
            .ok_or(EscapeError::InvalidCodePoint(value))?;
    }
    Ok(value)
}

fn code_point(value: u32) -> Result<char, EscapeError> {
    char::from_u32(value).ok_or(EscapeError::InvalidCodePoint(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_escapes() {
        assert_eq!(decode_escapes(r"a\nb\tc"), "a\nb\tc");
        assert_eq!(decode_escapes(r#"\\ \" \'"#), "\\ \" '");
        assert_eq!(decode_escapes(r"\a\b\f\v\r"), "\u{07}\u{08}\u{0c}\u{0b}\r");
    }

    #[test]
    fn test_escaped_quotes() {
        assert_eq!(decode_escapes(r#"a\"bc\"def"#), r#"a"bc"def"#);
    }

    #[test]
    fn test_hex_and_unicode_escapes() {
        assert_eq!(decode_escapes(r"\xff\x00"), "\u{ff}\u{0}");
        assert_eq!(decode_escapes(r"\u00e9"), "\u{e9}");
        assert_eq!(decode_escapes(r"\U0001F600"), "\u{1F600}");
    }

    #[test]
    fn test_octal_escapes() {
        assert_eq!(decode_escapes(r"\0"), "\0");
        assert_eq!(decode_escapes(r"\101\1012"), "AA2");
        assert_eq!(decode_escapes(r"\7z"), "\u{07}z");
    }

    #[test]
    fn test_unknown_escape_kept() {
        assert_eq!(decode_escapes(r"\d+\w"), r"\d+\w");
    }

    #[test]
    fn test_bare_quote_falls_back() {
        assert_eq!(try_decode_escapes(r#"a"b"#), Err(EscapeError::BareQuote(1)));
        assert_eq!(decode_escapes("\""), "\"");
        assert_eq!(decode_escapes("`"), "`");
    }

    #[test]
    fn test_malformed_escapes_fall_back() {
        assert_eq!(try_decode_escapes(r"\x4"), Err(EscapeError::TruncatedEscape('x')));
        assert_eq!(decode_escapes(r"\x4"), r"\x4");
        assert_eq!(decode_escapes(r"\u12"), r"\u12");
        assert_eq!(decode_escapes(r"abc\"), r"abc\");
        assert_eq!(decode_escapes(r"\N{DASH}"), r"\N{DASH}");
    }

    #[test]
    fn test_invalid_code_points_fall_back() {
        assert_eq!(
            try_decode_escapes(r"\ud800"),
            Err(EscapeError::InvalidCodePoint(0xd800))
        );
        assert_eq!(decode_escapes(r"\U00110000"), r"\U00110000");
    }

    #[test]
    fn test_line_break_falls_back() {
        assert_eq!(decode_escapes("a\\n\nb"), "a\\n\nb");
    }

    #[test]
    fn test_line_continuation() {
        assert_eq!(decode_escapes("ab\\\ncd"), "abcd");
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(decode_escapes("hello world"), "hello world");
        assert_eq!(decode_escapes(""), "");
    }
}
