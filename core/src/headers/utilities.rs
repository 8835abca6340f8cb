/*
 * utilities.rs
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

//! Helpers shared by header values and parsers: argument checks, quality parameters,
//! list skipping, mailbox validation and collection comparison.

use tracing::debug;

use crate::error::HeaderError;
use crate::headers::rules::{comment_length, quoted_string_length, token_length, whitespace_length, ParseResult};
use crate::headers::values::NameValue;

const QUALITY_NAME: &str = "q";

/// Reject an empty value with `Argument`, a non-token with `Format`.
pub fn check_valid_token(value: &str, param: &str) -> Result<(), HeaderError> {
    if value.is_empty() {
        return Err(HeaderError::empty(param));
    }
    if token_length(value, 0) != value.len() {
        return Err(HeaderError::invalid_value(value));
    }
    Ok(())
}

pub fn check_valid_comment(value: &str, param: &str) -> Result<(), HeaderError> {
    if value.is_empty() {
        return Err(HeaderError::empty(param));
    }
    match comment_length(value, 0) {
        ParseResult::Parsed(n) if n == value.len() => Ok(()),
        _ => Err(HeaderError::invalid_value(value)),
    }
}

pub fn check_valid_quoted_string(value: &str, param: &str) -> Result<(), HeaderError> {
    if value.is_empty() {
        return Err(HeaderError::empty(param));
    }
    match quoted_string_length(value, 0) {
        ParseResult::Parsed(n) if n == value.len() => Ok(()),
        _ => Err(HeaderError::invalid_value(value)),
    }
}

/// Format a quality value with the `0.0##` pattern: at least one and at most three decimals.
pub fn format_quality(value: f64) -> String {
    // -0.0 would render with a sign the grammar rejects.
    let mut s = format!("{:.3}", value + 0.0);
    while s.ends_with('0') && !s.ends_with(".0") {
        s.pop();
    }
    s
}

/// Digits with an optional decimal point; no sign or exponent.
pub fn parse_quality(value: &str) -> Option<f64> {
    if value.is_empty()
        || value.bytes().filter(|&c| c == b'.').count() > 1
        || !value.bytes().all(|c| c.is_ascii_digit() || c == b'.')
    {
        return None;
    }
    value.parse::<f64>().ok()
}

/// Value of the `q` parameter, or None when absent or unparseable.
pub fn get_quality(parameters: &[NameValue]) -> Option<f64> {
    let q = NameValue::find(parameters, QUALITY_NAME)?;
    let value = q.value().unwrap_or("");
    let quality = parse_quality(value);
    if quality.is_none() {
        debug!(value, "ignoring invalid quality parameter");
    }
    quality
}

/// Set, replace or (with None) remove the `q` parameter. Values outside [0, 1] are rejected.
pub fn set_quality(parameters: &mut Vec<NameValue>, value: Option<f64>) -> Result<(), HeaderError> {
    let existing = NameValue::find_index(parameters, QUALITY_NAME);
    match value {
        Some(q) => {
            let q = q + 0.0;
            if !(0.0..=1.0).contains(&q) {
                return Err(HeaderError::out_of_range("value"));
            }
            let formatted = format_quality(q);
            match existing {
                Some(i) => parameters[i].set_value(Some(formatted))?,
                None => parameters.push(NameValue::new_unchecked(QUALITY_NAME, Some(&formatted))),
            }
        }
        None => {
            if let Some(i) = existing {
                parameters.remove(i);
            }
        }
    }
    Ok(())
}

/// Skip whitespace and, if present, one `,` (and with `skip_empty` any further empty elements).
/// Returns the next index and whether a separator was consumed.
pub fn next_non_empty_or_whitespace_index(input: &str, start: usize, skip_empty: bool) -> (usize, bool) {
    let bytes = input.as_bytes();
    let mut current = start + whitespace_length(input, start);
    if current == bytes.len() || bytes[current] != b',' {
        return (current, false);
    }
    current += 1;
    current += whitespace_length(input, current);
    if skip_empty {
        while current < bytes.len() && bytes[current] == b',' {
            current += 1;
            current += whitespace_length(input, current);
        }
    }
    (current, true)
}

/// Multiset equality: every element of `x` is matched by a distinct element of `y`.
pub fn are_equal_collections<T>(x: &[T], y: &[T], eq: impl Fn(&T, &T) -> bool) -> bool {
    if x.len() != y.len() {
        return false;
    }
    let mut used = vec![false; y.len()];
    x.iter().all(|a| {
        match y.iter().enumerate().position(|(i, b)| !used[i] && eq(a, b)) {
            Some(i) => {
                used[i] = true;
                true
            }
            None => false,
        }
    })
}

/// A single RFC 5322 mailbox: `local@domain`, optionally as `["Display Name"] <local@domain>`.
/// Surrounding whitespace is tolerated; lists and trailing text are not.
pub fn is_valid_mail_address(value: &str) -> bool {
    let bytes = value.as_bytes();
    let len = bytes.len();
    let mut pos = 0;
    skip_mail_ws(bytes, &mut pos);
    if pos == len {
        return false;
    }
    if bytes[pos] == b'"' {
        pos += 1;
        loop {
            if pos >= len {
                return false;
            }
            if bytes[pos] == b'\\' && pos + 1 < len {
                pos += 2;
                continue;
            }
            pos += 1;
            if bytes[pos - 1] == b'"' {
                break;
            }
        }
        skip_mail_ws(bytes, &mut pos);
        if pos == len || bytes[pos] != b'<' {
            return false;
        }
    }
    let addr = if bytes[pos] == b'<' {
        let Some(close) = value[pos..].find('>') else {
            return false;
        };
        let inner = &value[pos + 1..pos + close];
        pos += close + 1;
        inner
    } else {
        let start = pos;
        while pos < len && !matches!(bytes[pos], b' ' | b'\t' | b',' | b'<' | b'>') {
            pos += 1;
        }
        &value[start..pos]
    };
    skip_mail_ws(bytes, &mut pos);
    pos == len && is_addr_spec(addr)
}

fn skip_mail_ws(bytes: &[u8], pos: &mut usize) {
    while *pos < bytes.len() && matches!(bytes[*pos], b' ' | b'\t') {
        *pos += 1;
    }
}

fn is_addr_spec(addr: &str) -> bool {
    let Some(at) = addr.rfind('@') else {
        return false;
    };
    let (local, domain) = (&addr[..at], &addr[at + 1..]);
    let atext = |c: char| c.is_alphanumeric() || "!#$%&'*+-/=?^_`{|}~.".contains(c);
    !local.is_empty()
        && !domain.is_empty()
        && !local.starts_with('.')
        && !local.ends_with('.')
        && !local.contains("..")
        && local.chars().all(atext)
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
        && domain.chars().all(|c| c.is_alphanumeric() || matches!(c, '-' | '.' | '[' | ']' | ':'))
}
