/*
 * authentication.rs
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

//! Credentials and challenges (`Authorization`, `WWW-Authenticate`, ...).

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::HeaderError;
use crate::headers::rules::{quoted_string_length, token_length, whitespace_length, ParseResult};
use crate::headers::utilities::{check_valid_token, next_non_empty_or_whitespace_index};

use super::name_value::value_length;
use super::{parse_single, try_parse_single};

/// `scheme [ RWS parameter ]`. The parameter is kept as opaque text: a token68 blob, an
/// auth-param list, or both.
#[derive(Debug, Clone)]
pub struct Authentication {
    scheme: String,
    parameter: Option<String>,
}

impl Authentication {
    pub fn new(scheme: impl Into<String>) -> Result<Self, HeaderError> {
        let scheme = scheme.into();
        check_valid_token(&scheme, "scheme")?;
        Ok(Self { scheme, parameter: None })
    }

    /// The parameter is not validated.
    pub fn with_parameter(scheme: impl Into<String>, parameter: impl Into<String>) -> Result<Self, HeaderError> {
        let mut auth = Self::new(scheme)?;
        let parameter = parameter.into();
        auth.parameter = (!parameter.is_empty()).then_some(parameter);
        Ok(auth)
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn parameter(&self) -> Option<&str> {
        self.parameter.as_deref()
    }

    pub fn parse(input: &str) -> Result<Self, HeaderError> {
        parse_single(input, Self::authentication_length)
    }

    pub fn try_parse(input: &str) -> Option<Self> {
        try_parse_single(input, Self::authentication_length)
    }

    /// In a challenge list, a following `, scheme` is left for the caller; `, name=value` pairs
    /// are folded into this element's parameter.
    pub(crate) fn authentication_length(input: &str, start: usize) -> Option<(usize, Self)> {
        let bytes = input.as_bytes();
        if start >= bytes.len() {
            return None;
        }
        let scheme_len = token_length(input, start);
        if scheme_len == 0 {
            return None;
        }
        let scheme = input[start..start + scheme_len].to_string();
        let mut current = start + scheme_len;
        let ws = whitespace_length(input, current);
        current += ws;
        if current == bytes.len() || bytes[current] == b',' {
            return Some((current - start, Self { scheme, parameter: None }));
        }
        if ws == 0 {
            return None;
        }
        let parameter_start = current;
        let mut parameter_end = current;
        skip_first_blob(input, &mut current, &mut parameter_end)?;
        if current < bytes.len() {
            parameters_end(input, &mut current, &mut parameter_end)?;
        }
        let parameter = input[parameter_start..=parameter_end].to_string();
        Some((current - start, Self { scheme, parameter: Some(parameter) }))
    }
}

/// Everything up to the first `,` outside a quoted string. `parameter_end` tracks the last
/// non-whitespace byte.
fn skip_first_blob(input: &str, current: &mut usize, parameter_end: &mut usize) -> Option<()> {
    let bytes = input.as_bytes();
    while *current < bytes.len() && bytes[*current] != b',' {
        if bytes[*current] == b'"' {
            let ParseResult::Parsed(len) = quoted_string_length(input, *current) else {
                return None;
            };
            *current += len;
            *parameter_end = *current - 1;
        } else {
            let ws = whitespace_length(input, *current);
            if ws == 0 {
                *parameter_end = *current;
                *current += 1;
            } else {
                *current += ws;
            }
        }
    }
    Some(())
}

/// Consumes `, name=value` continuations. Stops before a `,` that starts the next challenge.
fn parameters_end(input: &str, parse_end: &mut usize, parameter_end: &mut usize) -> Option<()> {
    let bytes = input.as_bytes();
    let mut current = *parse_end;
    loop {
        current += 1;
        let (next, _) = next_non_empty_or_whitespace_index(input, current, true);
        current = next;
        if current == bytes.len() {
            return Some(());
        }
        let name_len = token_length(input, current);
        if name_len == 0 {
            return None;
        }
        current += name_len;
        current += whitespace_length(input, current);
        if current == bytes.len() || bytes[current] != b'=' {
            return Some(());
        }
        current += 1;
        current += whitespace_length(input, current);
        let value_len = value_length(input, current);
        if value_len == 0 {
            return None;
        }
        current += value_len;
        *parameter_end = current - 1;
        current += whitespace_length(input, current);
        *parse_end = current;
        if current >= bytes.len() || bytes[current] != b',' {
            return Some(());
        }
    }
}

impl PartialEq for Authentication {
    fn eq(&self, other: &Self) -> bool {
        self.scheme.eq_ignore_ascii_case(&other.scheme) && self.parameter == other.parameter
    }
}

impl Eq for Authentication {}

impl Hash for Authentication {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.scheme.to_ascii_lowercase().hash(state);
        self.parameter.hash(state);
    }
}

impl fmt::Display for Authentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.parameter {
            Some(p) => write!(f, "{} {}", self.scheme, p),
            None => f.write_str(&self.scheme),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token68_credentials() {
        let a = Authentication::parse("Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ==").unwrap();
        assert_eq!(a.scheme(), "Basic");
        assert_eq!(a.parameter(), Some("QWxhZGRpbjpvcGVuIHNlc2FtZQ=="));
    }

    #[test]
    fn auth_param_list_stays_in_parameter() {
        let a = Authentication::parse("Digest realm=\"x, y\", nonce=abc , qop=auth").unwrap();
        assert_eq!(a.parameter(), Some("realm=\"x, y\", nonce=abc , qop=auth"));
    }

    #[test]
    fn stops_before_next_challenge() {
        let input = "Basic realm=\"a\", Bearer";
        let (len, a) = Authentication::authentication_length(input, 0).unwrap();
        assert_eq!(a.parameter(), Some("realm=\"a\""));
        assert_eq!(&input[len..], ", Bearer");
    }

    #[test]
    fn scheme_only() {
        let a = Authentication::parse("Negotiate").unwrap();
        assert_eq!(a.parameter(), None);
        assert_eq!(a, Authentication::with_parameter("NEGOTIATE", "").unwrap());
        assert!(Authentication::try_parse("Basic\"x\"").is_none());
    }
}
