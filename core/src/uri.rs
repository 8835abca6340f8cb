/*
 * uri.rs
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

//! Minimal URI value for request targets, `Location`/`Referer`/`Content-Location` headers and
//! base-address resolution. Absolute and relative references are both representable; absolute
//! http(s) URIs must carry a host. Non-ASCII and spaces are kept as given and percent-encoded on
//! display.

use std::fmt;
use std::hash::{Hash, Hasher};

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS, NON_ALPHANUMERIC};

use crate::error::HeaderError;

/// Characters escaped when a URI is rendered.
const DISPLAY: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'<').add(b'>').add(b'`').add(b'{').add(b'}');

/// `application/x-www-form-urlencoded`: everything but unreserved characters.
const FORM: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

#[derive(Debug, Clone)]
pub struct Uri {
    original: String,
    scheme: Option<String>,
    authority: Option<String>,
    path: String,
    query: Option<String>,
    fragment: Option<String>,
}

impl Uri {
    /// Parses an absolute or relative reference.
    pub fn parse(value: &str) -> Result<Self, HeaderError> {
        Self::try_parse(value).ok_or_else(|| HeaderError::Format(format!("Invalid URI: '{}'.", value)))
    }

    pub fn try_parse(value: &str) -> Option<Self> {
        if value.is_empty() || value.chars().any(|c| c.is_control()) {
            return None;
        }
        let (scheme, rest) = match split_scheme(value) {
            Some((scheme, rest)) => (Some(scheme.to_string()), rest),
            None => (None, value),
        };
        let (rest, fragment) = match rest.split_once('#') {
            Some((r, f)) => (r, Some(f.to_string())),
            None => (rest, None),
        };
        let (rest, query) = match rest.split_once('?') {
            Some((r, q)) => (r, Some(q.to_string())),
            None => (rest, None),
        };
        let (authority, path) = match rest.strip_prefix("//") {
            Some(after) => {
                let end = after.find('/').unwrap_or(after.len());
                (Some(after[..end].to_string()), after[end..].to_string())
            }
            None => (None, rest.to_string()),
        };
        let uri = Self { original: value.to_string(), scheme, authority, path, query, fragment };
        if uri.is_http() && uri.host().map_or(true, str::is_empty) {
            return None;
        }
        Some(uri)
    }

    /// Parses and requires a scheme.
    pub fn parse_absolute(value: &str) -> Result<Self, HeaderError> {
        let uri = Self::parse(value)?;
        if !uri.is_absolute() {
            return Err(HeaderError::Format(format!("Invalid URI: '{}' is not absolute.", value)));
        }
        Ok(uri)
    }

    pub fn is_absolute(&self) -> bool {
        self.scheme.is_some()
    }

    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    pub fn is_http(&self) -> bool {
        self.scheme
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("http") || s.eq_ignore_ascii_case("https"))
    }

    pub fn authority(&self) -> Option<&str> {
        self.authority.as_deref()
    }

    /// Authority without userinfo and port.
    pub fn host(&self) -> Option<&str> {
        let authority = self.authority.as_deref()?;
        let host_port = authority.rsplit_once('@').map_or(authority, |(_, h)| h);
        if host_port.starts_with('[') {
            return host_port.find(']').map(|i| &host_port[..=i]);
        }
        Some(host_port.split_once(':').map_or(host_port, |(h, _)| h))
    }

    pub fn port(&self) -> Option<u16> {
        let authority = self.authority.as_deref()?;
        let host_port = authority.rsplit_once('@').map_or(authority, |(_, h)| h);
        let after_host = match host_port.find(']') {
            Some(i) => &host_port[i + 1..],
            None => host_port,
        };
        after_host.rsplit_once(':').and_then(|(_, p)| p.parse().ok())
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// The text this URI was parsed from.
    pub fn as_str(&self) -> &str {
        &self.original
    }

    /// Resolves `reference` against this (absolute) base as in RFC 3986 section 5.2.
    pub fn join(&self, reference: &Uri) -> Result<Uri, HeaderError> {
        if !self.is_absolute() {
            return Err(HeaderError::InvalidOperation(format!(
                "Cannot resolve against relative base '{}'.",
                self.original
            )));
        }
        if reference.is_absolute() {
            return Ok(reference.clone());
        }
        let (authority, path, query) = if reference.authority.is_some() {
            (reference.authority.clone(), remove_dot_segments(&reference.path), reference.query.clone())
        } else if reference.path.is_empty() {
            (self.authority.clone(), self.path.clone(), reference.query.clone().or_else(|| self.query.clone()))
        } else if reference.path.starts_with('/') {
            (self.authority.clone(), remove_dot_segments(&reference.path), reference.query.clone())
        } else {
            (self.authority.clone(), remove_dot_segments(&self.merge(&reference.path)), reference.query.clone())
        };
        let mut text = String::new();
        if let Some(scheme) = &self.scheme {
            text.push_str(scheme);
            text.push(':');
        }
        if let Some(authority) = &authority {
            text.push_str("//");
            text.push_str(authority);
        }
        text.push_str(&path);
        if let Some(query) = &query {
            text.push('?');
            text.push_str(query);
        }
        if let Some(fragment) = &reference.fragment {
            text.push('#');
            text.push_str(fragment);
        }
        Ok(Uri {
            original: text,
            scheme: self.scheme.clone(),
            authority,
            path,
            query,
            fragment: reference.fragment.clone(),
        })
    }

    fn merge(&self, reference_path: &str) -> String {
        if self.authority.is_some() && self.path.is_empty() {
            return format!("/{}", reference_path);
        }
        match self.path.rfind('/') {
            Some(i) => format!("{}{}", &self.path[..=i], reference_path),
            None => reference_path.to_string(),
        }
    }
}

fn split_scheme(value: &str) -> Option<(&str, &str)> {
    let colon = value.find(':')?;
    let scheme = &value[..colon];
    let mut chars = scheme.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() || !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        return None;
    }
    Some((scheme, &value[colon + 1..]))
}

fn remove_dot_segments(path: &str) -> String {
    let mut output: Vec<&str> = Vec::new();
    let absolute = path.starts_with('/');
    let segments: Vec<&str> = path.split('/').collect();
    let last = segments.len().saturating_sub(1);
    for (i, segment) in segments.iter().enumerate() {
        match *segment {
            "." => {
                if i == last {
                    output.push("");
                }
            }
            ".." => {
                if output.len() > usize::from(absolute) {
                    output.pop();
                }
                if i == last {
                    output.push("");
                }
            }
            s => output.push(s),
        }
    }
    let joined = output.join("/");
    if absolute && !joined.starts_with('/') {
        format!("/{}", joined)
    } else {
        joined
    }
}

/// Reinterprets text whose characters are all at most U+00FF as Latin-1 bytes and decodes them
/// as UTF-8. Text that is pure ASCII, contains wider characters or is not valid UTF-8 is
/// returned unchanged.
pub fn decode_utf8_from_string(input: &str) -> String {
    if input.is_ascii() || input.chars().any(|c| c as u32 > 0xFF) {
        return input.to_string();
    }
    let bytes: Vec<u8> = input.chars().map(|c| c as u32 as u8).collect();
    match String::from_utf8(bytes) {
        Ok(decoded) => decoded,
        Err(_) => input.to_string(),
    }
}

/// Escapes a name or value for `application/x-www-form-urlencoded`; spaces become `+`.
pub fn form_encode(value: &str) -> String {
    utf8_percent_encode(value, FORM).to_string().replace("%20", "+")
}

impl PartialEq for Uri {
    fn eq(&self, other: &Self) -> bool {
        let eq_ci = |a: &Option<String>, b: &Option<String>| match (a, b) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            (None, None) => true,
            _ => false,
        };
        eq_ci(&self.scheme, &other.scheme)
            && eq_ci(&self.authority, &other.authority)
            && self.path == other.path
            && self.query == other.query
            && self.fragment == other.fragment
    }
}

impl Eq for Uri {}

impl Hash for Uri {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.scheme.as_ref().map(|s| s.to_ascii_lowercase()).hash(state);
        self.authority.as_ref().map(|a| a.to_ascii_lowercase()).hash(state);
        self.path.hash(state);
        self.query.hash(state);
        self.fragment.hash(state);
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", utf8_percent_encode(&self.original, DISPLAY))
    }
}

impl std::str::FromStr for Uri {
    type Err = HeaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_components() {
        let u = Uri::parse("https://user@example.com:8443/a/b?x=1#top").unwrap();
        assert!(u.is_absolute());
        assert!(u.is_http());
        assert_eq!(u.host(), Some("example.com"));
        assert_eq!(u.port(), Some(8443));
        assert_eq!(u.path(), "/a/b");
        assert_eq!(u.query(), Some("x=1"));
        assert_eq!(u.fragment(), Some("top"));
    }

    #[test]
    fn relative_references() {
        let u = Uri::parse("/docs/index.html").unwrap();
        assert!(!u.is_absolute());
        assert!(Uri::parse("http://").is_err());
        assert!(Uri::parse("a\nb").is_err());
        assert!(Uri::parse_absolute("relative").is_err());
    }

    #[test]
    fn resolves_against_base() {
        let base = Uri::parse("http://a/b/c/d;p?q").unwrap();
        let cases = [
            ("g", "http://a/b/c/g"),
            ("./g", "http://a/b/c/g"),
            ("g/", "http://a/b/c/g/"),
            ("/g", "http://a/g"),
            ("//g", "http://g"),
            ("?y", "http://a/b/c/d;p?y"),
            ("#s", "http://a/b/c/d;p?q#s"),
            ("..", "http://a/b/"),
            ("../g", "http://a/b/g"),
            ("../../../g", "http://a/g"),
            ("https://other/x", "https://other/x"),
        ];
        for (reference, expected) in cases {
            let joined = base.join(&Uri::parse(reference).unwrap()).unwrap();
            assert_eq!(joined.as_str(), expected, "resolving {}", reference);
        }
    }

    #[test]
    fn display_escapes() {
        let u = Uri::parse("http://example.com/a b/é").unwrap();
        assert_eq!(u.to_string(), "http://example.com/a%20b/%C3%A9");
        assert_eq!(u.as_str(), "http://example.com/a b/é");
    }

    #[test]
    fn latin1_mojibake_is_redecoded() {
        assert_eq!(decode_utf8_from_string("/caf\u{00C3}\u{00A9}"), "/café");
        assert_eq!(decode_utf8_from_string("/plain"), "/plain");
        assert_eq!(decode_utf8_from_string("/\u{00E9}"), "/\u{00E9}");
        assert_eq!(decode_utf8_from_string("/\u{20AC}"), "/\u{20AC}");
    }

    #[test]
    fn form_encoding() {
        assert_eq!(form_encode("a b&c=d~"), "a+b%26c%3Dd~");
    }
}
