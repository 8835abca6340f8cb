/*
 * cache_control.rs
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

//! `Cache-Control` directives.
//!
//! The header is a comma separated list of directives. Twelve are known and map to fields;
//! anything else is kept verbatim as an extension. Repeated `Cache-Control` lines are merged
//! into one value.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use crate::error::HeaderError;
use crate::headers::rules::token_length;
use crate::headers::utilities::{are_equal_collections, check_valid_token, next_non_empty_or_whitespace_index};

use super::NameValue;

const NO_CACHE: &str = "no-cache";
const NO_STORE: &str = "no-store";
const MAX_AGE: &str = "max-age";
const MAX_STALE: &str = "max-stale";
const MIN_FRESH: &str = "min-fresh";
const NO_TRANSFORM: &str = "no-transform";
const ONLY_IF_CACHED: &str = "only-if-cached";
const PUBLIC: &str = "public";
const PRIVATE: &str = "private";
const MUST_REVALIDATE: &str = "must-revalidate";
const PROXY_REVALIDATE: &str = "proxy-revalidate";
const SHARED_MAX_AGE: &str = "s-maxage";

#[derive(Debug, Clone, Default)]
pub struct CacheControl {
    no_cache: bool,
    no_cache_headers: Vec<String>,
    no_store: bool,
    max_age: Option<Duration>,
    shared_max_age: Option<Duration>,
    max_stale: bool,
    max_stale_limit: Option<Duration>,
    min_fresh: Option<Duration>,
    no_transform: bool,
    only_if_cached: bool,
    public: bool,
    private: bool,
    private_headers: Vec<String>,
    must_revalidate: bool,
    proxy_revalidate: bool,
    extensions: Vec<NameValue>,
}

impl CacheControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn no_cache(&self) -> bool {
        self.no_cache
    }

    pub fn set_no_cache(&mut self, value: bool) {
        self.no_cache = value;
        if !value {
            self.no_cache_headers.clear();
        }
    }

    pub fn no_cache_headers(&self) -> &[String] {
        &self.no_cache_headers
    }

    /// Implies `no-cache`.
    pub fn add_no_cache_header(&mut self, header: impl Into<String>) -> Result<(), HeaderError> {
        let header = header.into();
        check_valid_token(&header, "item")?;
        self.no_cache = true;
        self.no_cache_headers.push(header);
        Ok(())
    }

    pub fn no_store(&self) -> bool {
        self.no_store
    }

    pub fn set_no_store(&mut self, value: bool) {
        self.no_store = value;
    }

    pub fn max_age(&self) -> Option<Duration> {
        self.max_age
    }

    pub fn set_max_age(&mut self, value: Option<Duration>) {
        self.max_age = value.map(whole_secs);
    }

    pub fn shared_max_age(&self) -> Option<Duration> {
        self.shared_max_age
    }

    pub fn set_shared_max_age(&mut self, value: Option<Duration>) {
        self.shared_max_age = value.map(whole_secs);
    }

    pub fn max_stale(&self) -> bool {
        self.max_stale
    }

    pub fn set_max_stale(&mut self, value: bool) {
        self.max_stale = value;
        if !value {
            self.max_stale_limit = None;
        }
    }

    pub fn max_stale_limit(&self) -> Option<Duration> {
        self.max_stale_limit
    }

    /// A limit implies `max-stale`.
    pub fn set_max_stale_limit(&mut self, value: Option<Duration>) {
        if value.is_some() {
            self.max_stale = true;
        }
        self.max_stale_limit = value.map(whole_secs);
    }

    pub fn min_fresh(&self) -> Option<Duration> {
        self.min_fresh
    }

    pub fn set_min_fresh(&mut self, value: Option<Duration>) {
        self.min_fresh = value.map(whole_secs);
    }

    pub fn no_transform(&self) -> bool {
        self.no_transform
    }

    pub fn set_no_transform(&mut self, value: bool) {
        self.no_transform = value;
    }

    pub fn only_if_cached(&self) -> bool {
        self.only_if_cached
    }

    pub fn set_only_if_cached(&mut self, value: bool) {
        self.only_if_cached = value;
    }

    pub fn public(&self) -> bool {
        self.public
    }

    pub fn set_public(&mut self, value: bool) {
        self.public = value;
    }

    pub fn private(&self) -> bool {
        self.private
    }

    pub fn set_private(&mut self, value: bool) {
        self.private = value;
        if !value {
            self.private_headers.clear();
        }
    }

    pub fn private_headers(&self) -> &[String] {
        &self.private_headers
    }

    /// Implies `private`.
    pub fn add_private_header(&mut self, header: impl Into<String>) -> Result<(), HeaderError> {
        let header = header.into();
        check_valid_token(&header, "item")?;
        self.private = true;
        self.private_headers.push(header);
        Ok(())
    }

    pub fn must_revalidate(&self) -> bool {
        self.must_revalidate
    }

    pub fn set_must_revalidate(&mut self, value: bool) {
        self.must_revalidate = value;
    }

    pub fn proxy_revalidate(&self) -> bool {
        self.proxy_revalidate
    }

    pub fn set_proxy_revalidate(&mut self, value: bool) {
        self.proxy_revalidate = value;
    }

    pub fn extensions(&self) -> &[NameValue] {
        &self.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut Vec<NameValue> {
        &mut self.extensions
    }

    pub fn parse(input: &str) -> Result<Self, HeaderError> {
        Self::try_parse(input).ok_or_else(|| HeaderError::invalid_value(input))
    }

    /// An input holding no directives at all is not a value.
    pub fn try_parse(input: &str) -> Option<Self> {
        let (start, _) = next_non_empty_or_whitespace_index(input, 0, true);
        if start == input.len() {
            return None;
        }
        Self::cache_control_length(input, start, None).map(|(_, cc)| cc)
    }

    /// Parses directives from `start` to the end of `input`, applying them on top of `store`
    /// (a previous line of the same header) when given. Either every directive applies or
    /// None is returned.
    pub(crate) fn cache_control_length(input: &str, start: usize, store: Option<&CacheControl>) -> Option<(usize, Self)> {
        if start >= input.len() {
            return None;
        }
        let mut directives = Vec::new();
        let mut current = start;
        while current < input.len() {
            let item = super::parse_list_item(input, &mut current, true, NameValue::name_value_length)?;
            directives.extend(item);
        }
        let mut cc = store.cloned().unwrap_or_default();
        cc.apply_directives(directives)?;
        Some((input.len() - start, cc))
    }

    fn apply_directives(&mut self, directives: Vec<NameValue>) -> Option<()> {
        for directive in directives {
            let ok = match directive.name().to_ascii_lowercase().as_str() {
                NO_CACHE => set_optional_token_list(&directive, &mut self.no_cache, &mut self.no_cache_headers),
                NO_STORE => set_token_only(&directive, &mut self.no_store),
                MAX_AGE => set_seconds(&directive, &mut self.max_age),
                MAX_STALE => {
                    let ok = directive.value().is_none() || set_seconds(&directive, &mut self.max_stale_limit);
                    if ok {
                        self.max_stale = true;
                    }
                    ok
                }
                MIN_FRESH => set_seconds(&directive, &mut self.min_fresh),
                NO_TRANSFORM => set_token_only(&directive, &mut self.no_transform),
                ONLY_IF_CACHED => set_token_only(&directive, &mut self.only_if_cached),
                PUBLIC => set_token_only(&directive, &mut self.public),
                PRIVATE => set_optional_token_list(&directive, &mut self.private, &mut self.private_headers),
                MUST_REVALIDATE => set_token_only(&directive, &mut self.must_revalidate),
                PROXY_REVALIDATE => set_token_only(&directive, &mut self.proxy_revalidate),
                SHARED_MAX_AGE => set_seconds(&directive, &mut self.shared_max_age),
                _ => {
                    self.extensions.push(directive);
                    true
                }
            };
            if !ok {
                return None;
            }
        }
        Some(())
    }
}

fn set_token_only(directive: &NameValue, field: &mut bool) -> bool {
    if directive.value().is_some() {
        return false;
    }
    *field = true;
    true
}

/// Bare directive, or a quoted list of header names that must contain at least one token.
fn set_optional_token_list(directive: &NameValue, field: &mut bool, destination: &mut Vec<String>) -> bool {
    let Some(value) = directive.value() else {
        *field = true;
        return true;
    };
    let bytes = value.as_bytes();
    if bytes.len() < 3 || bytes[0] != b'"' || bytes[bytes.len() - 1] != b'"' {
        return false;
    }
    let end = bytes.len() - 1;
    let before = destination.len();
    let mut current = 1;
    while current < end {
        let (next, _) = next_non_empty_or_whitespace_index(value, current, true);
        current = next;
        if current == end {
            break;
        }
        let len = token_length(value, current);
        if len == 0 {
            return false;
        }
        destination.push(value[current..current + len].to_string());
        current += len;
    }
    if destination.len() > before {
        *field = true;
        return true;
    }
    false
}

fn set_seconds(directive: &NameValue, field: &mut Option<Duration>) -> bool {
    let Some(value) = directive.value() else {
        return false;
    };
    if value.is_empty() || !value.bytes().all(|c| c.is_ascii_digit()) {
        return false;
    }
    match value.parse::<i32>() {
        Ok(seconds) => {
            *field = Some(Duration::from_secs(seconds as u64));
            true
        }
        Err(_) => false,
    }
}

fn whole_secs(value: Duration) -> Duration {
    Duration::from_secs(value.as_secs())
}

fn push_directive(out: &mut String, directive: &str) {
    if !out.is_empty() {
        out.push_str(", ");
    }
    out.push_str(directive);
}

fn push_header_list(out: &mut String, headers: &[String]) {
    if !headers.is_empty() {
        out.push_str("=\"");
        out.push_str(&headers.join(", "));
        out.push('"');
    }
}

fn push_seconds(out: &mut String, directive: &str, value: Option<Duration>) {
    if let Some(value) = value {
        push_directive(out, directive);
        out.push('=');
        out.push_str(&value.as_secs().to_string());
    }
}

impl fmt::Display for CacheControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        for (set, name) in [
            (self.no_store, NO_STORE),
            (self.no_transform, NO_TRANSFORM),
            (self.only_if_cached, ONLY_IF_CACHED),
            (self.public, PUBLIC),
            (self.must_revalidate, MUST_REVALIDATE),
            (self.proxy_revalidate, PROXY_REVALIDATE),
        ] {
            if set {
                push_directive(&mut out, name);
            }
        }
        if self.no_cache {
            push_directive(&mut out, NO_CACHE);
            push_header_list(&mut out, &self.no_cache_headers);
        }
        push_seconds(&mut out, MAX_AGE, self.max_age);
        push_seconds(&mut out, SHARED_MAX_AGE, self.shared_max_age);
        if self.max_stale {
            push_directive(&mut out, MAX_STALE);
            if let Some(limit) = self.max_stale_limit {
                out.push('=');
                out.push_str(&limit.as_secs().to_string());
            }
        }
        push_seconds(&mut out, MIN_FRESH, self.min_fresh);
        if self.private {
            push_directive(&mut out, PRIVATE);
            push_header_list(&mut out, &self.private_headers);
        }
        NameValue::write_list(&self.extensions, ',', false, &mut out);
        f.write_str(&out)
    }
}

fn eq_header_lists(a: &[String], b: &[String]) -> bool {
    are_equal_collections(a, b, |x, y| x.eq_ignore_ascii_case(y))
}

impl PartialEq for CacheControl {
    fn eq(&self, other: &Self) -> bool {
        self.no_cache == other.no_cache
            && self.no_store == other.no_store
            && self.max_age == other.max_age
            && self.shared_max_age == other.shared_max_age
            && self.max_stale == other.max_stale
            && self.max_stale_limit == other.max_stale_limit
            && self.min_fresh == other.min_fresh
            && self.no_transform == other.no_transform
            && self.only_if_cached == other.only_if_cached
            && self.public == other.public
            && self.private == other.private
            && self.must_revalidate == other.must_revalidate
            && self.proxy_revalidate == other.proxy_revalidate
            && eq_header_lists(&self.no_cache_headers, &other.no_cache_headers)
            && eq_header_lists(&self.private_headers, &other.private_headers)
            && are_equal_collections(&self.extensions, &other.extensions, |a, b| a == b)
    }
}

impl Eq for CacheControl {}

impl Hash for CacheControl {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (
            self.no_cache,
            self.no_store,
            self.no_transform,
            self.only_if_cached,
            self.public,
            self.private,
            self.must_revalidate,
            self.proxy_revalidate,
            self.max_stale,
        )
            .hash(state);
        self.max_age.hash(state);
        self.shared_max_age.hash(state);
        self.max_stale_limit.hash(state);
        self.min_fresh.hash(state);
        for list in [&self.no_cache_headers, &self.private_headers] {
            let mut lowered: Vec<String> = list.iter().map(|h| h.to_ascii_lowercase()).collect();
            lowered.sort_unstable();
            lowered.hash(state);
        }
        NameValue::hash_list(&self.extensions, state);
    }
}
