//! Line-oriented `key=value` rendering of a property store

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

static KEY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.]+$").expect("key pattern is a valid regex"));

/// Whether `key` is allowed in the persisted format.
pub fn is_valid_key(key: &str) -> bool {
    KEY_PATTERN.is_match(key)
}

/// Escape a value so that it fits on a single line.
pub fn escape_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Reverse of [`escape_value`]. `line` is only used for error reporting.
pub fn unescape_value(raw: &str, line: usize) -> Result<String> {
    let mut value = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            value.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => value.push('\\'),
            Some('n') => value.push('\n'),
            Some('r') => value.push('\r'),
            Some(other) => {
                return Err(Error::Format {
                    line,
                    reason: format!("unknown escape sequence '\\{other}'"),
                });
            }
            None => {
                return Err(Error::Format {
                    line,
                    reason: "dangling escape at end of line".to_string(),
                });
            }
        }
    }
    Ok(value)
}

/// Render entries as newline-delimited `key=value` text, in the given order.
pub fn render<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut out = String::new();
    for (key, value) in entries {
        out.push_str(key);
        out.push('=');
        out.push_str(&escape_value(value));
        out.push('\n');
    }
    out
}

/// Parse text produced by [`render`] into ordered entries.
///
/// Blank lines and lines starting with `#` are skipped. Duplicate keys and
/// lines without a valid `key=` prefix are format errors.
pub fn parse(text: &str) -> Result<Vec<(String, String)>> {
    let mut entries: Vec<(String, String)> = Vec::new();
    let mut seen = std::collections::HashSet::new();

    for (index, raw_line) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, raw_value)) = line.split_once('=') else {
            return Err(Error::Format {
                line: line_no,
                reason: format!("expected 'key=value', got '{line}'"),
            });
        };

        if !is_valid_key(key) {
            return Err(Error::Format {
                line: line_no,
                reason: format!("invalid key '{key}'"),
            });
        }

        if !seen.insert(key.to_string()) {
            return Err(Error::Format {
                line: line_no,
                reason: format!("duplicate key '{key}'"),
            });
        }

        entries.push((key.to_string(), unescape_value(raw_value, line_no)?));
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_pattern() {
        assert!(is_valid_key("provider.reporter.reportsDirectory"));
        assert!(is_valid_key("tests.0"));
        assert!(is_valid_key("snake_case_key"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("has space"));
        assert!(!is_valid_key("a=b"));
        assert!(!is_valid_key("dash-key"));
    }

    #[test]
    fn test_escape_round_trip() {
        let value = "line one\nline two\r\\end";
        let escaped = escape_value(value);
        assert!(!escaped.contains('\n'));
        assert_eq!(escaped, "line one\\nline two\\r\\\\end");
        assert_eq!(unescape_value(&escaped, 1).unwrap(), value);
    }

    #[test]
    fn test_value_may_contain_equals() {
        let entries = parse("filter=a=b=c\n").unwrap();
        assert_eq!(entries, vec![("filter".to_string(), "a=b=c".to_string())]);
    }

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let text = "# header\n\nfirst=1\r\nsecond=\n";
        let entries = parse(text).unwrap();
        assert_eq!(
            entries,
            vec![
                ("first".to_string(), "1".to_string()),
                ("second".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_parse_rejects_duplicates() {
        let err = parse("a=1\nb=2\na=3\n").unwrap_err();
        match err {
            Error::Format { line, reason } => {
                assert_eq!(line, 3);
                assert!(reason.contains("duplicate key 'a'"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse("ok=1\nnot a property\n"),
            Err(Error::Format { line: 2, .. })
        ));
        assert!(matches!(
            parse("bad key=1\n"),
            Err(Error::Format { line: 1, .. })
        ));
        assert!(matches!(
            parse("k=trailing\\\n"),
            Err(Error::Format { line: 1, .. })
        ));
    }

    #[test]
    fn test_render_keeps_order() {
        let text = render([("z", "1"), ("a", "two\nlines")]);
        insta::assert_snapshot!(text.trim_end(), @r"
        z=1
        a=two\nlines
        ");
    }
}
