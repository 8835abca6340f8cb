/*
 * content.rs
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

//! Typed content headers.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::general;
use super::names;
use super::registry::{HeaderRegistries, ParserRegistry};
use super::store::HttpHeaders;
use super::value_collection::{token_item, HeaderValueCollection};
use super::values::{ContentDisposition, ContentRange, HeaderValue, MediaType};
use crate::error::HeaderError;
use crate::uri::Uri;

/// Headers describing a message body.
#[derive(Debug, Clone)]
pub struct ContentHeaders {
    headers: HttpHeaders,
    content_length_set: bool,
}

impl ContentHeaders {
    pub fn new() -> Self {
        Self::with_registry(Arc::clone(&HeaderRegistries::shared().content))
    }

    pub fn with_registry(registry: Arc<ParserRegistry>) -> Self {
        Self { headers: HttpHeaders::with_registry(registry), content_length_set: false }
    }

    pub fn allow(&mut self) -> HeaderValueCollection<'_, String> {
        HeaderValueCollection::new(&mut self.headers, names::ALLOW).with_validator(token_item)
    }

    pub fn content_disposition(&self) -> Option<ContentDisposition> {
        self.headers.typed_value(names::CONTENT_DISPOSITION)
    }

    pub fn set_content_disposition(&mut self, value: Option<ContentDisposition>) {
        self.headers
            .set_or_remove_parsed_value(names::CONTENT_DISPOSITION, value.map(HeaderValue::ContentDisposition));
    }

    pub fn content_encoding(&mut self) -> HeaderValueCollection<'_, String> {
        HeaderValueCollection::new(&mut self.headers, names::CONTENT_ENCODING).with_validator(token_item)
    }

    pub fn content_language(&mut self) -> HeaderValueCollection<'_, String> {
        HeaderValueCollection::new(&mut self.headers, names::CONTENT_LANGUAGE).with_validator(token_item)
    }

    /// The stored `Content-Length`. Never computes one; see [`ContentHeaders::materialize_length`].
    pub fn content_length(&self) -> Option<i64> {
        general::int64_value(&self.headers, names::CONTENT_LENGTH)
    }

    /// Sets or removes `Content-Length`. Once set explicitly, even to `None`, the length is no
    /// longer computed from the body.
    pub fn set_content_length(&mut self, value: Option<i64>) -> Result<(), HeaderError> {
        if value.map_or(false, |v| v < 0) {
            return Err(HeaderError::out_of_range("value"));
        }
        self.headers
            .set_or_remove_parsed_value(names::CONTENT_LENGTH, value.map(HeaderValue::Int64));
        self.content_length_set = true;
        Ok(())
    }

    /// Returns the stored length, or computes it with `compute` and stores the result when no
    /// length was stored or set explicitly.
    pub fn materialize_length<F>(&mut self, compute: F) -> Option<i64>
    where
        F: FnOnce() -> Option<i64>,
    {
        if let Some(len) = self.content_length() {
            return Some(len);
        }
        if self.content_length_set {
            return None;
        }
        let len = compute()?;
        self.headers.set_parsed_value(names::CONTENT_LENGTH, HeaderValue::Int64(len));
        Some(len)
    }

    pub fn content_location(&self) -> Option<Uri> {
        general::uri_value(&self.headers, names::CONTENT_LOCATION)
    }

    pub fn set_content_location(&mut self, value: Option<Uri>) {
        self.headers
            .set_or_remove_parsed_value(names::CONTENT_LOCATION, value.map(HeaderValue::Uri));
    }

    pub fn content_md5(&self) -> Option<Vec<u8>> {
        general::bytes_value(&self.headers, names::CONTENT_MD5)
    }

    pub fn set_content_md5(&mut self, value: Option<Vec<u8>>) {
        self.headers.set_or_remove_parsed_value(names::CONTENT_MD5, value.map(HeaderValue::Bytes));
    }

    pub fn content_range(&self) -> Option<ContentRange> {
        self.headers.typed_value(names::CONTENT_RANGE)
    }

    pub fn set_content_range(&mut self, value: Option<ContentRange>) {
        self.headers
            .set_or_remove_parsed_value(names::CONTENT_RANGE, value.map(HeaderValue::ContentRange));
    }

    pub fn content_type(&self) -> Option<MediaType> {
        self.headers.typed_value(names::CONTENT_TYPE)
    }

    pub fn set_content_type(&mut self, value: Option<MediaType>) {
        self.headers
            .set_or_remove_parsed_value(names::CONTENT_TYPE, value.map(HeaderValue::MediaType));
    }

    pub fn expires(&self) -> Option<DateTime<Utc>> {
        general::date_value(&self.headers, names::EXPIRES)
    }

    pub fn set_expires(&mut self, value: Option<DateTime<Utc>>) {
        general::set_date_value(&mut self.headers, names::EXPIRES, value);
    }

    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        general::date_value(&self.headers, names::LAST_MODIFIED)
    }

    pub fn set_last_modified(&mut self, value: Option<DateTime<Utc>>) {
        general::set_date_value(&mut self.headers, names::LAST_MODIFIED, value);
    }

    pub fn add_headers(&mut self, source: &ContentHeaders) {
        self.headers.add_headers(&source.headers);
        self.content_length_set |= source.content_length_set;
    }
}

impl Default for ContentHeaders {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for ContentHeaders {
    type Target = HttpHeaders;

    fn deref(&self) -> &HttpHeaders {
        &self.headers
    }
}

impl DerefMut for ContentHeaders {
    fn deref_mut(&mut self) -> &mut HttpHeaders {
        &mut self.headers
    }
}

impl fmt::Display for ContentHeaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.headers.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_length_is_not_computed_on_read() {
        let mut h = ContentHeaders::new();
        assert_eq!(h.content_length(), None);
        assert!(!h.contains("Content-Length"));
        assert_eq!(h.materialize_length(|| Some(42)), Some(42));
        assert_eq!(h.content_length(), Some(42));
        assert_eq!(h.materialize_length(|| Some(7)), Some(42));
    }

    #[test]
    fn explicit_length_wins() {
        let mut h = ContentHeaders::new();
        h.set_content_length(None).unwrap();
        assert_eq!(h.materialize_length(|| Some(42)), None);
        assert!(matches!(h.set_content_length(Some(-1)), Err(HeaderError::ArgumentOutOfRange(_))));
        h.set_content_length(Some(0)).unwrap();
        assert_eq!(h.get_values("Content-Length").unwrap(), vec!["0"]);
    }

    #[test]
    fn typed_content_values() {
        let mut h = ContentHeaders::new();
        h.add("Content-Type", "text/plain; charset=utf-8").unwrap();
        assert_eq!(h.content_type().and_then(|m| m.charset().map(str::to_string)).as_deref(), Some("utf-8"));
        h.add("Content-Range", "bytes 10-19/*").unwrap();
        let range = h.content_range().unwrap();
        assert_eq!((range.from(), range.to(), range.length()), (Some(10), Some(19), None));
        h.add("Content-MD5", "AQID").unwrap();
        assert_eq!(h.content_md5(), Some(vec![1, 2, 3]));
        h.content_encoding().parse_add("gzip, br").unwrap();
        assert_eq!(h.content_encoding().count(), 2);
        h.allow().add("GET".to_string()).unwrap();
        assert_eq!(h.header_string("Allow").as_deref(), Some("GET"));
    }

    #[test]
    fn message_headers_are_refused() {
        let mut h = ContentHeaders::new();
        assert!(h.add("Host", "example.com").is_err());
        assert!(!h.try_add_without_validation("Cache-Control", "no-cache"));
        assert!(h.add("X-Custom", "ok").is_ok());
    }
}
