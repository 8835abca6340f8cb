/*
 * rules.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of Intestazioni, an HTTP client library.
 *
 * Intestazioni is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Intestazioni is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Intestazioni.  If not, see <http://www.gnu.org/licenses/>.
 */

//! HTTP grammar primitives (RFC 7230 token, quoted-string, comment, OWS; RFC 2616 host).
//!
//! Every scanner takes `(input, start)` and returns how many bytes of a valid production begin
//! exactly at `start`, or 0 when the production is absent. Scanners never panic on short input
//! and never consume past their own production.

pub const CR: u8 = b'\r';
pub const LF: u8 = b'\n';
pub const MAX_INT32_DIGITS: usize = 10;
pub const MAX_INT64_DIGITS: usize = 19;

/// Nesting limit for comments; deeper input is rejected as malformed.
const MAX_NESTED_COUNT: usize = 5;

/// Tri-state result of quoted-string and comment scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseResult {
    /// Production found; carries its length including delimiters.
    Parsed(usize),
    /// Input does not start with the opening delimiter.
    NotParsed,
    /// Opening delimiter present but the production is malformed.
    InvalidFormat,
}

/// Checks if a byte is an RFC 7230 `tchar`.
#[inline]
pub fn is_token_char(c: u8) -> bool {
    matches!(c,
        b'0'..=b'9' | b'A'..=b'Z' | b'a'..=b'z' |
        b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' |
        b'^' | b'_' | b'`' | b'|' | b'~'
    )
}

/// Length of the token starting at `start`.
pub fn token_length(input: &str, start: usize) -> usize {
    let bytes = input.as_bytes();
    if start >= bytes.len() {
        return 0;
    }
    bytes[start..].iter().take_while(|&&c| is_token_char(c)).count()
}

/// Checks if the whole string is a non-empty token.
pub fn is_token(s: &str) -> bool {
    !s.is_empty() && token_length(s, 0) == s.len()
}

/// Length of optional whitespace: SP and HT, plus obs-fold (CRLF followed by SP or HT).
pub fn whitespace_length(input: &str, start: usize) -> usize {
    let bytes = input.as_bytes();
    let len = bytes.len();
    if start >= len {
        return 0;
    }
    let mut i = start;
    while i < len {
        match bytes[i] {
            b' ' | b'\t' => i += 1,
            CR if i + 2 < len && bytes[i + 1] == LF && matches!(bytes[i + 2], b' ' | b'\t') => i += 3,
            _ => return i - start,
        }
    }
    len - start
}

/// True if the value holds a CRLF that is not a valid fold (not followed by SP/HT, or at the end).
pub fn contains_invalid_newline(value: &str, start: usize) -> bool {
    let bytes = value.as_bytes();
    let len = bytes.len();
    let mut i = start;
    while i < len {
        if bytes[i] == CR && i + 1 < len && bytes[i + 1] == LF {
            i += 2;
            if i == len || !matches!(bytes[i], b' ' | b'\t') {
                return true;
            }
        } else {
            i += 1;
        }
    }
    false
}

/// Length of a run of ASCII digits; with `allow_decimal`, one `.` may appear after the first digit.
pub fn number_length(input: &str, start: usize, allow_decimal: bool) -> usize {
    let bytes = input.as_bytes();
    let len = bytes.len();
    if start >= len || bytes[start] == b'.' {
        return 0;
    }
    let mut have_dot = !allow_decimal;
    let mut i = start;
    while i < len {
        let c = bytes[i];
        if c.is_ascii_digit() {
            i += 1;
        } else if !have_dot && c == b'.' {
            have_dot = true;
            i += 1;
        } else {
            break;
        }
    }
    i - start
}

/// Scans a host (`Via` received-by, `Warning` agent, `Host` header).
///
/// The host ends at SP, HT, CR or `,`; a `/` anywhere makes it invalid. When `allow_token` is
/// set, a plain token is accepted as-is (pseudonyms); otherwise the text must be a hostname,
/// IPv4 or bracketed IPv6 literal with an optional port. Returns length and host text.
pub fn host_length(input: &str, start: usize, allow_token: bool) -> Option<(usize, &str)> {
    let bytes = input.as_bytes();
    let len = bytes.len();
    if start >= len {
        return None;
    }
    let mut i = start;
    let mut is_token = true;
    while i < len {
        let c = bytes[i];
        if c == b'/' {
            return None;
        }
        if matches!(c, b' ' | b'\t' | CR | b',') {
            break;
        }
        is_token = is_token && is_token_char(c);
        i += 1;
    }
    if i == start {
        return None;
    }
    let host = &input[start..i];
    if (!allow_token || !is_token) && !is_valid_host_name(host) {
        return None;
    }
    Some((i - start, host))
}

/// Hostname, IPv4 or `[IPv6]`, optionally followed by `:port`.
pub fn is_valid_host_name(host: &str) -> bool {
    let (name, port) = if let Some(rest) = host.strip_prefix('[') {
        let Some(close) = rest.find(']') else {
            return false;
        };
        let literal = &rest[..close];
        if literal.is_empty()
            || !literal.contains(':')
            || !literal.bytes().all(|c| c.is_ascii_hexdigit() || c == b':' || c == b'.')
        {
            return false;
        }
        let after = &rest[close + 1..];
        match after.strip_prefix(':') {
            Some(p) => (None, Some(p)),
            None if after.is_empty() => (None, None),
            None => return false,
        }
    } else {
        match host.rfind(':') {
            Some(colon) => (Some(&host[..colon]), Some(&host[colon + 1..])),
            None => (Some(host), None),
        }
    };
    if let Some(port) = port {
        if port.is_empty() || port.len() > 5 || !port.bytes().all(|c| c.is_ascii_digit()) {
            return false;
        }
        if port.parse::<u32>().map_or(true, |p| p > 65535) {
            return false;
        }
    }
    match name {
        None => true,
        Some(name) => {
            !name.is_empty()
                && !name.starts_with('.')
                && !name.contains("..")
                && name.chars().all(|c| c.is_alphanumeric() || matches!(c, '-' | '.' | '_' | '~'))
        }
    }
}

/// Scans a quoted-string; `""` is a valid, empty quoted string.
pub fn quoted_string_length(input: &str, start: usize) -> ParseResult {
    let mut nested = 0;
    expression_length(input, start, b'"', b'"', false, &mut nested)
}

/// Scans an RFC 2616 comment, allowing nested comments.
pub fn comment_length(input: &str, start: usize) -> ParseResult {
    let mut nested = 0;
    expression_length(input, start, b'(', b')', true, &mut nested)
}

/// `\` followed by any US-ASCII byte.
pub fn quoted_pair_length(input: &str, start: usize) -> ParseResult {
    let bytes = input.as_bytes();
    if start >= bytes.len() || bytes[start] != b'\\' {
        return ParseResult::NotParsed;
    }
    if start + 2 > bytes.len() || bytes[start + 1] > 127 {
        return ParseResult::InvalidFormat;
    }
    ParseResult::Parsed(2)
}

fn expression_length(
    input: &str,
    start: usize,
    open: u8,
    close: u8,
    supports_nesting: bool,
    nested_count: &mut usize,
) -> ParseResult {
    let bytes = input.as_bytes();
    let len = bytes.len();
    if start >= len || bytes[start] != open {
        return ParseResult::NotParsed;
    }
    let mut current = start + 1;
    while current < len {
        // A backslash directly before the last byte is taken literally.
        if current + 2 < len {
            if let ParseResult::Parsed(n) = quoted_pair_length(input, current) {
                current += n;
                continue;
            }
        }
        if supports_nesting && bytes[current] == open {
            *nested_count += 1;
            if *nested_count > MAX_NESTED_COUNT {
                return ParseResult::InvalidFormat;
            }
            let nested = expression_length(input, current, open, close, supports_nesting, nested_count);
            *nested_count -= 1;
            match nested {
                ParseResult::Parsed(n) => {
                    current += n;
                    continue;
                }
                _ => return ParseResult::InvalidFormat,
            }
        }
        if bytes[current] == close {
            return ParseResult::Parsed(current - start + 1);
        }
        current += 1;
    }
    ParseResult::InvalidFormat
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_stops_at_separator() {
        assert_eq!(token_length("gzip;q=1", 0), 4);
        assert_eq!(token_length("a{b}", 0), 1);
        assert_eq!(token_length("abc", 3), 0);
        assert!(is_token("X-Custom-Header"));
        assert!(!is_token(""));
        assert!(!is_token("a b"));
    }

    #[test]
    fn whitespace_accepts_folding() {
        assert_eq!(whitespace_length("  \tx", 0), 3);
        assert_eq!(whitespace_length("\r\n x", 0), 3);
        assert_eq!(whitespace_length("\r\nx", 0), 0);
        assert_eq!(whitespace_length("\r x", 0), 0);
        assert_eq!(whitespace_length("   ", 1), 2);
    }

    #[test]
    fn invalid_newlines() {
        assert!(!contains_invalid_newline("a\r\n b", 0));
        assert!(contains_invalid_newline("a\r\nb", 0));
        assert!(contains_invalid_newline("a\r\n", 0));
        assert!(!contains_invalid_newline("a\rb", 0));
    }

    #[test]
    fn numbers() {
        assert_eq!(number_length("123abc", 0, false), 3);
        assert_eq!(number_length("0.5;", 0, true), 3);
        assert_eq!(number_length("0.5", 0, false), 1);
        assert_eq!(number_length("1.2.3", 0, true), 3);
        assert_eq!(number_length(".5", 0, true), 0);
    }

    #[test]
    fn quoted_strings() {
        assert_eq!(quoted_string_length("\"abc\" x", 0), ParseResult::Parsed(5));
        assert_eq!(quoted_string_length("\"\"", 0), ParseResult::Parsed(2));
        assert_eq!(quoted_string_length("\"a\\\"b\"", 0), ParseResult::Parsed(6));
        assert_eq!(quoted_string_length("abc", 0), ParseResult::NotParsed);
        assert_eq!(quoted_string_length("\"abc", 0), ParseResult::InvalidFormat);
    }

    #[test]
    fn comments_nest() {
        assert_eq!(comment_length("(a (b) c) rest", 0), ParseResult::Parsed(9));
        assert_eq!(comment_length("(((((((x)))))))", 0), ParseResult::InvalidFormat);
        assert_eq!(comment_length("(unterminated", 0), ParseResult::InvalidFormat);
        assert_eq!(comment_length("((a)(b))", 0), ParseResult::Parsed(8));
    }

    #[test]
    fn hosts() {
        assert_eq!(host_length("example.com:8080, x", 0, false), Some((16, "example.com:8080")));
        assert_eq!(host_length("[::1]:80", 0, false), Some((8, "[::1]:80")));
        assert_eq!(host_length("a/b", 0, true), None);
        assert_eq!(host_length("pseudonym", 0, true), Some((9, "pseudonym")));
        assert_eq!(host_length("bad host", 0, false), Some((3, "bad")));
        assert_eq!(host_length("exa$mple", 0, false), None);
        assert_eq!(host_length("exa$mple", 0, true), Some((8, "exa$mple")));
        assert!(!is_valid_host_name("host:99999"));
        assert!(is_valid_host_name("192.168.0.1:443"));
    }
}
