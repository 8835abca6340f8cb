/*
 * via.rs
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

//! `Via` header elements.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::HeaderError;
use crate::headers::rules::{comment_length, host_length, token_length, whitespace_length, ParseResult};
use crate::headers::utilities::{check_valid_comment, check_valid_token};

use super::{parse_single, try_parse_single};

/// `[ protocol-name "/" ] protocol-version RWS received-by [ RWS comment ]`
#[derive(Debug, Clone)]
pub struct Via {
    protocol_name: Option<String>,
    protocol_version: String,
    received_by: String,
    comment: Option<String>,
}

impl Via {
    pub fn new(protocol_version: impl Into<String>, received_by: impl Into<String>) -> Result<Self, HeaderError> {
        let protocol_version = protocol_version.into();
        let received_by = received_by.into();
        check_valid_token(&protocol_version, "protocol_version")?;
        check_received_by(&received_by)?;
        Ok(Self { protocol_name: None, protocol_version, received_by, comment: None })
    }

    /// Empty strings leave the optional parts unset.
    pub fn with_details(
        protocol_version: impl Into<String>,
        received_by: impl Into<String>,
        protocol_name: Option<&str>,
        comment: Option<&str>,
    ) -> Result<Self, HeaderError> {
        let mut via = Self::new(protocol_version, received_by)?;
        if let Some(name) = protocol_name.filter(|n| !n.is_empty()) {
            check_valid_token(name, "protocol_name")?;
            via.protocol_name = Some(name.to_string());
        }
        if let Some(comment) = comment.filter(|c| !c.is_empty()) {
            check_valid_comment(comment, "comment")?;
            via.comment = Some(comment.to_string());
        }
        Ok(via)
    }

    pub fn protocol_name(&self) -> Option<&str> {
        self.protocol_name.as_deref()
    }

    pub fn protocol_version(&self) -> &str {
        &self.protocol_version
    }

    pub fn received_by(&self) -> &str {
        &self.received_by
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn parse(input: &str) -> Result<Self, HeaderError> {
        parse_single(input, Self::via_length)
    }

    pub fn try_parse(input: &str) -> Option<Self> {
        try_parse_single(input, Self::via_length)
    }

    pub(crate) fn via_length(input: &str, start: usize) -> Option<(usize, Self)> {
        let bytes = input.as_bytes();
        if start >= bytes.len() {
            return None;
        }
        let (mut current, protocol_name, protocol_version) = protocol_end(input, start)?;
        if current == bytes.len() {
            return None;
        }
        let (host_len, received_by) = host_length(input, current, true)?;
        let received_by = received_by.to_string();
        current += host_len;
        current += whitespace_length(input, current);
        let mut comment = None;
        if current < bytes.len() && bytes[current] == b'(' {
            let ParseResult::Parsed(len) = comment_length(input, current) else {
                return None;
            };
            comment = Some(input[current..current + len].to_string());
            current += len;
            current += whitespace_length(input, current);
        }
        Some((current - start, Self { protocol_name, protocol_version, received_by, comment }))
    }
}

/// Reads `[name "/"] version RWS`; the index returned points at received-by.
fn protocol_end(input: &str, start: usize) -> Option<(usize, Option<String>, String)> {
    let bytes = input.as_bytes();
    let first_len = token_length(input, start);
    if first_len == 0 {
        return None;
    }
    let mut current = start + first_len;
    let mut ws = whitespace_length(input, current);
    current += ws;
    if current == bytes.len() {
        return None;
    }
    let (name, version) = if bytes[current] == b'/' {
        let name = input[start..start + first_len].to_string();
        current += 1;
        current += whitespace_length(input, current);
        let version_len = token_length(input, current);
        if version_len == 0 {
            return None;
        }
        let version = input[current..current + version_len].to_string();
        current += version_len;
        ws = whitespace_length(input, current);
        current += ws;
        (Some(name), version)
    } else {
        (None, input[start..start + first_len].to_string())
    };
    if ws == 0 {
        return None;
    }
    Some((current, name, version))
}

fn check_received_by(received_by: &str) -> Result<(), HeaderError> {
    if received_by.is_empty() {
        return Err(HeaderError::empty("received_by"));
    }
    match host_length(received_by, 0, true) {
        Some((len, _)) if len == received_by.len() => Ok(()),
        _ => Err(HeaderError::invalid_value(received_by)),
    }
}

fn eq_opt_ignore_case(a: &Option<String>, b: &Option<String>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        (None, None) => true,
        _ => false,
    }
}

impl PartialEq for Via {
    fn eq(&self, other: &Self) -> bool {
        self.protocol_version.eq_ignore_ascii_case(&other.protocol_version)
            && self.received_by.eq_ignore_ascii_case(&other.received_by)
            && eq_opt_ignore_case(&self.protocol_name, &other.protocol_name)
            && self.comment == other.comment
    }
}

impl Eq for Via {}

impl Hash for Via {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.protocol_version.to_ascii_lowercase().hash(state);
        self.received_by.to_ascii_lowercase().hash(state);
        self.protocol_name.as_ref().map(|n| n.to_ascii_lowercase()).hash(state);
        self.comment.hash(state);
    }
}

impl fmt::Display for Via {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.protocol_name {
            write!(f, "{}/", name)?;
        }
        write!(f, "{} {}", self.protocol_version, self.received_by)?;
        if let Some(comment) = &self.comment {
            write!(f, " {}", comment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_form() {
        let v = Via::parse("HTTP/1.1 proxy.example.com:8080 (Squid/3.1)").unwrap();
        assert_eq!(v.protocol_name(), Some("HTTP"));
        assert_eq!(v.protocol_version(), "1.1");
        assert_eq!(v.received_by(), "proxy.example.com:8080");
        assert_eq!(v.comment(), Some("(Squid/3.1)"));
        assert_eq!(v.to_string(), "HTTP/1.1 proxy.example.com:8080 (Squid/3.1)");
    }

    #[test]
    fn pseudonym_receiver() {
        let v = Via::parse("1.0 fred").unwrap();
        assert_eq!(v.protocol_name(), None);
        assert_eq!(v.received_by(), "fred");
    }

    #[test]
    fn requires_whitespace_after_version() {
        assert!(Via::try_parse("1.1").is_none());
        assert!(Via::try_parse("HTTP/1.1").is_none());
        assert!(Via::try_parse("1.1 a/b").is_none());
    }

    #[test]
    fn constructor_validates() {
        assert!(matches!(Via::new("1.1", ""), Err(HeaderError::Argument(_))));
        assert!(matches!(Via::new("1.1", "a b"), Err(HeaderError::Format(_))));
        let v = Via::with_details("1.1", "gw", Some("HTTP"), Some("(c)")).unwrap();
        assert_eq!(Via::parse(&v.to_string()).unwrap(), v);
    }
}
