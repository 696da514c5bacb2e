//! Java properties format
//!
//! Supports `=`, `:` and whitespace separators, `#`/`!` comment lines,
//! backslash line continuations and the `\t \n \r \f \uXXXX` escapes.

use crate::entry::Properties;
use crate::error::{OneConfigError, Result};

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\u{000C}')
}

/// Parse properties text into an ordered map. Later keys overwrite earlier ones.
pub fn parse(input: &str) -> Result<Properties> {
    let mut props = Properties::new();

    for (number, line) in logical_lines(input) {
        let line = line.trim_start_matches(is_blank);
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let (raw_key, raw_value) = split_key_value(line);
        let key = unescape(raw_key).map_err(|e| line_error(number, e))?;
        let value = unescape(raw_value).map_err(|e| line_error(number, e))?;
        props.insert(key, value);
    }

    Ok(props)
}

/// Render a map as properties text, one `key=value` per line
pub fn to_string(props: &Properties) -> String {
    let mut out = String::new();
    for (key, value) in props {
        out.push_str(&escape(key, true));
        out.push('=');
        out.push_str(&escape(value, false));
        out.push('\n');
    }
    out
}

fn line_error(number: usize, details: String) -> OneConfigError {
    OneConfigError::parse("properties", format!("line {number}: {details}"))
}

/// Join continued lines. Yields the 1-based number of the first natural line.
fn logical_lines(input: &str) -> Vec<(usize, String)> {
    let mut lines = Vec::new();
    let mut current: Option<(usize, String)> = None;

    for (index, natural) in input.lines().enumerate() {
        let natural = natural.strip_suffix('\r').unwrap_or(natural);
        let (number, mut buffer) = match current.take() {
            Some((number, buffer)) => (number, buffer),
            None => (index + 1, String::new()),
        };

        let piece = if buffer.is_empty() {
            natural
        } else {
            natural.trim_start_matches(is_blank)
        };

        let is_comment = buffer.is_empty() && {
            let head = piece.trim_start_matches(is_blank);
            head.starts_with('#') || head.starts_with('!')
        };

        let trailing = piece.chars().rev().take_while(|c| *c == '\\').count();
        if !is_comment && trailing % 2 == 1 {
            buffer.push_str(&piece[..piece.len() - 1]);
            current = Some((number, buffer));
        } else {
            buffer.push_str(piece);
            lines.push((number, buffer));
        }
    }

    if let Some(pending) = current {
        lines.push(pending);
    }

    lines
}

/// Split at the first unescaped separator. Returns raw (still escaped) parts.
fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    for (idx, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = idx;
                break;
            }
            c if is_blank(c) => {
                key_end = idx;
                break;
            }
            _ => {}
        }
    }

    let key = &line[..key_end];
    let mut rest = line[key_end..].trim_start_matches(is_blank);
    if let Some(stripped) = rest.strip_prefix(['=', ':']) {
        rest = stripped.trim_start_matches(is_blank);
    }
    (key, rest)
}

fn unescape(raw: &str) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{000C}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                if hex.len() != 4 {
                    return Err(format!("truncated unicode escape '\\u{hex}'"));
                }
                let code = u32::from_str_radix(&hex, 16)
                    .map_err(|_| format!("invalid unicode escape '\\u{hex}'"))?;
                let decoded = char::from_u32(code)
                    .ok_or_else(|| format!("invalid code point '\\u{hex}'"))?;
                out.push(decoded);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }

    Ok(out)
}

fn escape(text: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for (idx, c) in text.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{000C}' => out.push_str("\\f"),
            ' ' if is_key || idx == 0 => out.push_str("\\ "),
            '=' | ':' | '#' | '!' if is_key => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separators() {
        let props = parse("a=1\nb: 2\nc 3\nd\t=\t4\ne\n").unwrap();
        assert_eq!(props.get("a").map(String::as_str), Some("1"));
        assert_eq!(props.get("b").map(String::as_str), Some("2"));
        assert_eq!(props.get("c").map(String::as_str), Some("3"));
        assert_eq!(props.get("d").map(String::as_str), Some("4"));
        assert_eq!(props.get("e").map(String::as_str), Some(""));
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let props = parse("# comment\n  ! also comment\n\n   \nkey=value\n").unwrap();
        assert_eq!(props.len(), 1);
        assert_eq!(props.get("key").map(String::as_str), Some("value"));
    }

    #[test]
    fn test_value_keeps_separators_after_first() {
        let props = parse("url=jdbc:postgres://db:5432/app?a=b\n").unwrap();
        assert_eq!(
            props.get("url").map(String::as_str),
            Some("jdbc:postgres://db:5432/app?a=b")
        );
    }

    #[test]
    fn test_line_continuation() {
        let props = parse("list = one, \\\n        two, \\\n        three\nnext=x\n").unwrap();
        assert_eq!(props.get("list").map(String::as_str), Some("one, two, three"));
        assert_eq!(props.get("next").map(String::as_str), Some("x"));
    }

    #[test]
    fn test_escaped_backslash_does_not_continue() {
        let props = parse("path=C:\\\\temp\\\\\nnext=x\n").unwrap();
        assert_eq!(props.get("path").map(String::as_str), Some("C:\\temp\\"));
        assert_eq!(props.get("next").map(String::as_str), Some("x"));
    }

    #[test]
    fn test_escapes() {
        let props = parse("my\\ key=tab\\there\\u00e9\nco\\:lon=1\n").unwrap();
        assert_eq!(props.get("my key").map(String::as_str), Some("tab\there\u{e9}"));
        assert_eq!(props.get("co:lon").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_bad_unicode_escape() {
        let err = parse("ok=1\nbad=\\u12\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_later_keys_win() {
        let props = parse("a=1\na=2\n").unwrap();
        assert_eq!(props.get("a").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_render_escapes_keys_and_values() {
        let mut props = Properties::new();
        props.insert("a key".to_string(), " lead\nline".to_string());
        props.insert("x=y".to_string(), "plain".to_string());
        let text = to_string(&props);
        assert_eq!(text, "a\\ key=\\ lead\\nline\nx\\=y=plain\n");
        assert_eq!(parse(&text).unwrap(), props);
    }
}
