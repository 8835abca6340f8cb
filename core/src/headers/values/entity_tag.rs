/*
 * entity_tag.rs
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

//! Entity tags (`ETag`, `If-Match`, `If-None-Match`, `If-Range`).

use std::fmt;

use crate::error::HeaderError;
use crate::headers::rules::{quoted_string_length, whitespace_length, ParseResult};

/// `[ "W/" ] quoted-string`, or the wildcard `*`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityTag {
    tag: String,
    is_weak: bool,
}

const ANY_TAG: &str = "*";

impl EntityTag {
    /// `tag` is the quoted-string including quotes, e.g. `"\"v1\""`.
    pub fn new(tag: impl Into<String>) -> Result<Self, HeaderError> {
        Self::with_weakness(tag, false)
    }

    pub fn with_weakness(tag: impl Into<String>, is_weak: bool) -> Result<Self, HeaderError> {
        let tag = tag.into();
        if tag.is_empty() {
            return Err(HeaderError::empty("tag"));
        }
        match quoted_string_length(&tag, 0) {
            ParseResult::Parsed(n) if n == tag.len() => Ok(Self { tag, is_weak }),
            _ => Err(HeaderError::Format(format!("The entity tag '{}' is not a quoted string.", tag))),
        }
    }

    /// The `*` wildcard.
    pub fn any() -> Self {
        Self { tag: ANY_TAG.to_string(), is_weak: false }
    }

    pub fn is_any(&self) -> bool {
        self.tag == ANY_TAG
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn is_weak(&self) -> bool {
        self.is_weak
    }

    /// Parses a single entity tag. The `*` wildcard is rejected here; use [`EntityTag::any`].
    pub fn parse(input: &str) -> Result<Self, HeaderError> {
        Self::try_parse(input).ok_or_else(|| HeaderError::invalid_value(input))
    }

    pub fn try_parse(input: &str) -> Option<Self> {
        super::try_parse_single(input, Self::entity_tag_length).filter(|tag| !tag.is_any())
    }

    pub(crate) fn entity_tag_length(input: &str, start: usize) -> Option<(usize, Self)> {
        let bytes = input.as_bytes();
        if start >= bytes.len() {
            return None;
        }
        let mut current = start;
        let value = if bytes[start] == b'*' {
            current += 1;
            Self::any()
        } else {
            let mut is_weak = false;
            if matches!(bytes[start], b'W' | b'w') {
                current += 1;
                if current + 2 >= bytes.len() || bytes[current] != b'/' {
                    return None;
                }
                is_weak = true;
                current += 1;
                current += whitespace_length(input, current);
            }
            let ParseResult::Parsed(len) = quoted_string_length(input, current) else {
                return None;
            };
            let tag = input[current..current + len].to_string();
            current += len;
            Self { tag, is_weak }
        };
        current += whitespace_length(input, current);
        Some((current - start, value))
    }
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_weak {
            f.write_str("W/")?;
        }
        f.write_str(&self.tag)
    }
}
