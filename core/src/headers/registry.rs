/*
 * registry.rs
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

//! Which parser handles which header name, and which names a header group refuses.
//!
//! Registries are plain values. The three standard ones are built on first use and shared
//! through [`HeaderRegistries::shared`]; stores receive them as `Arc`s.

use std::fmt;
use std::sync::{Arc, OnceLock};

use super::names;
use super::parser::{
    HeaderParser, AUTHENTICATION_LIST, BYTE_ARRAY, CACHE_CONTROL, DATE, ENTITY_TAG_LIST, HOST, INT32, INT64,
    MAIL_ADDRESS, MEDIA_TYPE_WITH_QUALITY_LIST, NAME_VALUE_LIST, NAME_VALUE_WITH_PARAMETERS_LIST, PRODUCT_INFO,
    PRODUCT_LIST, SINGLE_AUTHENTICATION, SINGLE_CONTENT_DISPOSITION, SINGLE_CONTENT_RANGE, SINGLE_ENTITY_TAG,
    SINGLE_MEDIA_TYPE, SINGLE_RANGE, SINGLE_RANGE_CONDITION, SINGLE_RETRY_CONDITION, STRING_WITH_QUALITY_LIST,
    TIME_SPAN, TOKEN_LIST, TRANSFER_CODING_LIST, TRANSFER_CODING_WITH_QUALITY_LIST, URI, VIA_LIST, WARNING_LIST,
};

/// Name to parser map plus the names forbidden in one header group. Lookups ignore case.
#[derive(Default)]
pub struct ParserRegistry {
    parsers: Vec<(&'static str, &'static dyn HeaderParser)>,
    invalid: Vec<&'static str>,
}

impl ParserRegistry {
    /// No parsers and no forbidden names: every value is kept as text.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the parser for `name`.
    pub fn with_parser(mut self, name: &'static str, parser: &'static dyn HeaderParser) -> Self {
        self.parsers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self.parsers.push((name, parser));
        self
    }

    pub fn with_invalid(mut self, name: &'static str) -> Self {
        if !self.is_invalid(name) {
            self.invalid.push(name);
        }
        self
    }

    pub fn parser(&self, name: &str) -> Option<&'static dyn HeaderParser> {
        self.parsers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, p)| *p)
    }

    pub fn is_invalid(&self, name: &str) -> bool {
        self.invalid.iter().any(|n| n.eq_ignore_ascii_case(name))
    }

    /// Canonical spelling of a registered or forbidden name.
    pub fn known_name(&self, name: &str) -> Option<&'static str> {
        self.parsers
            .iter()
            .map(|(n, _)| *n)
            .chain(self.invalid.iter().copied())
            .find(|n| n.eq_ignore_ascii_case(name))
    }

    fn with_all(self, entries: &[(&'static str, &'static dyn HeaderParser)]) -> Self {
        entries.iter().fold(self, |r, (name, parser)| r.with_parser(*name, *parser))
    }

    fn with_all_invalid(self, names: &[&'static str]) -> Self {
        names.iter().fold(self, |r, name| r.with_invalid(*name))
    }

    /// General and request headers; content headers are refused.
    pub fn for_request() -> Self {
        Self::empty()
            .with_all(&general_parsers())
            .with_all(&request_parsers())
            .with_all_invalid(&names::CONTENT)
    }

    /// General and response headers; content headers are refused.
    pub fn for_response() -> Self {
        Self::empty()
            .with_all(&general_parsers())
            .with_all(&response_parsers())
            .with_all_invalid(&names::CONTENT)
    }

    /// Content headers only; everything belonging to the message is refused.
    pub fn for_content() -> Self {
        Self::empty()
            .with_all(&content_parsers())
            .with_all_invalid(&names::GENERAL)
            .with_all_invalid(&names::REQUEST)
            .with_all_invalid(&names::RESPONSE)
    }
}

impl fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserRegistry")
            .field("parsers", &self.parsers.iter().map(|(n, _)| *n).collect::<Vec<_>>())
            .field("invalid", &self.invalid)
            .finish()
    }
}

fn general_parsers() -> [(&'static str, &'static dyn HeaderParser); 9] {
    [
        (names::CACHE_CONTROL, &CACHE_CONTROL),
        (names::CONNECTION, &TOKEN_LIST),
        (names::DATE, &DATE),
        (names::PRAGMA, &NAME_VALUE_LIST),
        (names::TRAILER, &TOKEN_LIST),
        (names::TRANSFER_ENCODING, &TRANSFER_CODING_LIST),
        (names::UPGRADE, &PRODUCT_LIST),
        (names::VIA, &VIA_LIST),
        (names::WARNING, &WARNING_LIST),
    ]
}

fn request_parsers() -> [(&'static str, &'static dyn HeaderParser); 19] {
    [
        (names::ACCEPT, &MEDIA_TYPE_WITH_QUALITY_LIST),
        (names::ACCEPT_CHARSET, &STRING_WITH_QUALITY_LIST),
        (names::ACCEPT_ENCODING, &STRING_WITH_QUALITY_LIST),
        (names::ACCEPT_LANGUAGE, &STRING_WITH_QUALITY_LIST),
        (names::AUTHORIZATION, &SINGLE_AUTHENTICATION),
        (names::EXPECT, &NAME_VALUE_WITH_PARAMETERS_LIST),
        (names::FROM, &MAIL_ADDRESS),
        (names::HOST, &HOST),
        (names::IF_MATCH, &ENTITY_TAG_LIST),
        (names::IF_MODIFIED_SINCE, &DATE),
        (names::IF_NONE_MATCH, &ENTITY_TAG_LIST),
        (names::IF_RANGE, &SINGLE_RANGE_CONDITION),
        (names::IF_UNMODIFIED_SINCE, &DATE),
        (names::MAX_FORWARDS, &INT32),
        (names::PROXY_AUTHORIZATION, &SINGLE_AUTHENTICATION),
        (names::RANGE, &SINGLE_RANGE),
        (names::REFERER, &URI),
        (names::TE, &TRANSFER_CODING_WITH_QUALITY_LIST),
        (names::USER_AGENT, &PRODUCT_INFO),
    ]
}

fn response_parsers() -> [(&'static str, &'static dyn HeaderParser); 9] {
    [
        (names::ACCEPT_RANGES, &TOKEN_LIST),
        (names::AGE, &TIME_SPAN),
        (names::ETAG, &SINGLE_ENTITY_TAG),
        (names::LOCATION, &URI),
        (names::PROXY_AUTHENTICATE, &AUTHENTICATION_LIST),
        (names::RETRY_AFTER, &SINGLE_RETRY_CONDITION),
        (names::SERVER, &PRODUCT_INFO),
        (names::VARY, &TOKEN_LIST),
        (names::WWW_AUTHENTICATE, &AUTHENTICATION_LIST),
    ]
}

fn content_parsers() -> [(&'static str, &'static dyn HeaderParser); 11] {
    [
        (names::ALLOW, &TOKEN_LIST),
        (names::CONTENT_DISPOSITION, &SINGLE_CONTENT_DISPOSITION),
        (names::CONTENT_ENCODING, &TOKEN_LIST),
        (names::CONTENT_LANGUAGE, &TOKEN_LIST),
        (names::CONTENT_LENGTH, &INT64),
        (names::CONTENT_LOCATION, &URI),
        (names::CONTENT_MD5, &BYTE_ARRAY),
        (names::CONTENT_RANGE, &SINGLE_CONTENT_RANGE),
        (names::CONTENT_TYPE, &SINGLE_MEDIA_TYPE),
        (names::EXPIRES, &DATE),
        (names::LAST_MODIFIED, &DATE),
    ]
}

/// The three standard registries, built once per process.
#[derive(Debug, Clone)]
pub struct HeaderRegistries {
    pub request: Arc<ParserRegistry>,
    pub response: Arc<ParserRegistry>,
    pub content: Arc<ParserRegistry>,
}

impl HeaderRegistries {
    pub fn new() -> Self {
        Self {
            request: Arc::new(ParserRegistry::for_request()),
            response: Arc::new(ParserRegistry::for_response()),
            content: Arc::new(ParserRegistry::for_content()),
        }
    }

    pub fn shared() -> &'static HeaderRegistries {
        static SHARED: OnceLock<HeaderRegistries> = OnceLock::new();
        SHARED.get_or_init(HeaderRegistries::new)
    }
}

impl Default for HeaderRegistries {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_ignore_case() {
        let registry = ParserRegistry::for_request();
        assert!(registry.parser("user-agent").is_some());
        assert!(registry.parser("CACHE-CONTROL").is_some());
        assert!(registry.parser("X-Custom").is_none());
        assert_eq!(registry.known_name("www-authenticate"), None);
        assert_eq!(registry.known_name("if-none-match"), Some("If-None-Match"));
    }

    #[test]
    fn groups_refuse_each_others_headers() {
        let request = ParserRegistry::for_request();
        assert!(request.is_invalid("content-type"));
        assert!(!request.is_invalid("accept"));
        let response = ParserRegistry::for_response();
        assert!(response.is_invalid("Content-Length"));
        assert!(response.parser("Vary").is_some());
        let content = ParserRegistry::for_content();
        assert!(content.is_invalid("Cache-Control"));
        assert!(content.is_invalid("Host"));
        assert!(content.is_invalid("Server"));
        assert!(!content.is_invalid("Expires"));
    }

    #[test]
    fn parser_shapes() {
        let request = ParserRegistry::for_request();
        assert!(request.parser("Accept").map_or(false, |p| p.supports_multiple_values()));
        assert!(request.parser("Host").map_or(false, |p| !p.supports_multiple_values()));
        assert_eq!(request.parser("User-Agent").map(|p| p.separator()), Some(" "));
    }

    #[test]
    fn custom_parser_replaces_existing() {
        let registry = ParserRegistry::empty().with_parser("X-Count", &INT32).with_parser("x-count", &INT64);
        assert_eq!(format!("{:?}", registry), "ParserRegistry { parsers: [\"x-count\"], invalid: [] }");
    }

    #[test]
    fn shared_registries_are_built_once() {
        let a = HeaderRegistries::shared();
        let b = HeaderRegistries::shared();
        assert!(Arc::ptr_eq(&a.request, &b.request));
    }
}
