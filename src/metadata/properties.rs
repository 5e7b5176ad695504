//! Line-oriented `key=value` parsing in the Java properties format.
//!
//! `release.properties` is written by the release plugin with the JDK's
//! properties writer, so keys such as `project.rel.org.example\:demo` arrive
//! with escaped separators and non-ASCII text may arrive as `\uXXXX`.

use std::collections::HashMap;

/// Parse properties text into a key/value map. Later duplicates win.
///
/// Malformed `\u` escapes are kept literally (without the backslash) instead
/// of failing the whole file.
pub fn parse(input: &str) -> HashMap<String, String> {
    let mut entries = HashMap::new();
    let mut lines = input.lines();

    while let Some(line) = lines.next() {
        let trimmed = line.trim_start_matches(is_whitespace);
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }

        let mut logical = String::from(trimmed);
        while ends_with_continuation(&logical) {
            logical.pop();
            match lines.next() {
                Some(next) => logical.push_str(next.trim_start_matches(is_whitespace)),
                None => break,
            }
        }

        let (key, value) = split_entry(&logical);
        entries.insert(unescape(key), unescape(value));
    }

    entries
}

/// Decode bytes the way the JDK does when no charset is given (ISO-8859-1),
/// but accept UTF-8 first since most modern writers emit it.
pub fn decode(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes)
        .unwrap_or_else(|err| err.into_bytes().into_iter().map(char::from).collect())
}

fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\x0c')
}

fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&ch| ch == '\\').count() % 2 == 1
}

fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    let mut hard_separator = None;

    for (idx, ch) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = idx;
                hard_separator = Some(true);
                break;
            }
            c if is_whitespace(c) => {
                key_end = idx;
                hard_separator = Some(false);
                break;
            }
            _ => {}
        }
    }

    let key = &line[..key_end];
    let rest = match hard_separator {
        None => return (key, ""),
        Some(true) => &line[key_end + 1..],
        Some(false) => {
            let rest = line[key_end..].trim_start_matches(is_whitespace);
            rest.strip_prefix(['=', ':']).unwrap_or(rest)
        }
    };

    (key, rest.trim_start_matches(is_whitespace))
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => match hex_unit(chars.as_str()) {
                Some(unit) => {
                    chars.nth(3);
                    let rest = chars.as_str();
                    let low = rest
                        .strip_prefix("\\u")
                        .and_then(hex_unit)
                        .filter(|low| (0xDC00..=0xDFFF).contains(low));
                    let units = match low {
                        Some(low) if (0xD800..=0xDBFF).contains(&unit) => {
                            chars.nth(5);
                            vec![unit, low]
                        }
                        _ => vec![unit],
                    };
                    // A lone surrogate has no char; it becomes U+FFFD.
                    out.extend(
                        char::decode_utf16(units)
                            .map(|decoded| decoded.unwrap_or(char::REPLACEMENT_CHARACTER)),
                    );
                }
                None => out.push('u'),
            },
            Some(other) => out.push(other),
            None => {}
        }
    }

    out
}

/// UTF-16 code unit spelled by the four hex digits at the start of `text`
fn hex_unit(text: &str) -> Option<u16> {
    let hex = text.get(..4)?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(hex, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_release_plugin_output() {
        let text = "#release configuration\n\
                    #Tue Oct 01 10:00:00 UTC 2013\n\
                    scm.tag=release-1.0\n\
                    project.rel.org.example\\:demo=1.0\n\
                    project.dev.org.example\\:demo=1.1-SNAPSHOT\n\
                    completedPhase=end-release\n";
        let props = parse(text);
        assert_eq!(props.get("scm.tag").map(String::as_str), Some("release-1.0"));
        assert_eq!(
            props.get("project.rel.org.example:demo").map(String::as_str),
            Some("1.0")
        );
        assert_eq!(props.len(), 4);
    }

    #[test]
    fn test_parse_separators() {
        let props = parse("a=1\nb:2\nc 3\nd   =   4\ne\t:\t5\nf\n");
        assert_eq!(props["a"], "1");
        assert_eq!(props["b"], "2");
        assert_eq!(props["c"], "3");
        assert_eq!(props["d"], "4");
        assert_eq!(props["e"], "5");
        assert_eq!(props["f"], "");
    }

    #[test]
    fn test_parse_comments_and_blank_lines() {
        let props = parse("# comment\n! bang comment\n\n   \n  key = value\n");
        assert_eq!(props.len(), 1);
        assert_eq!(props["key"], "value");
    }

    #[test]
    fn test_parse_continuation_lines() {
        let props = parse("fruits = apple, \\\n         banana, \\\n         pear\nnext=1\n");
        assert_eq!(props["fruits"], "apple, banana, pear");
        assert_eq!(props["next"], "1");
    }

    #[test]
    fn test_escaped_backslash_is_not_continuation() {
        let props = parse("path=c:\\\\dir\\\\\nnext=1\n");
        assert_eq!(props["path"], "c:\\dir\\");
        assert_eq!(props["next"], "1");
    }

    #[test]
    fn test_escapes_in_keys_and_values() {
        let props = parse("key\\ with\\ spaces=tab\\there\nunicode=caf\\u00e9\n");
        assert_eq!(props["key with spaces"], "tab\there");
        assert_eq!(props["unicode"], "café");
    }

    #[test]
    fn test_malformed_unicode_escape_is_kept() {
        let props = parse("bad=\\uZZ\n");
        assert_eq!(props["bad"], "uZZ");
    }

    #[test]
    fn test_escaped_surrogate_pair_is_one_char() {
        let props = parse("scm.tag=rel-\\ud83d\\ude00\nupper=\\uD83D\\uDE00!\n");
        assert_eq!(props["scm.tag"], "rel-\u{1F600}");
        assert_eq!(props["upper"], "\u{1F600}!");
    }

    #[test]
    fn test_lone_surrogate_escape_is_replaced() {
        let props = parse("high=a\\ud83db\nlow=\\ude00\n");
        assert_eq!(props["high"], "a\u{FFFD}b");
        assert_eq!(props["low"], "\u{FFFD}");
    }

    #[test]
    fn test_later_duplicate_wins() {
        let props = parse("scm.tag=first\nscm.tag=second\n");
        assert_eq!(props["scm.tag"], "second");
    }

    #[test]
    fn test_crlf_line_endings() {
        let props = parse("scm.tag=release-2.0\r\nother=x\r\n");
        assert_eq!(props["scm.tag"], "release-2.0");
        assert_eq!(props["other"], "x");
    }

    #[test]
    fn test_decode_latin1_fallback() {
        assert_eq!(decode(vec![b'c', b'a', b'f', 0xe9]), "café");
        assert_eq!(decode("café".as_bytes().to_vec()), "café");
    }
}
