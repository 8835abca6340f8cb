/*
 * response.rs
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

//! Typed response headers.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::time::Duration;

use super::general::{self, GeneralHeaders, SpecialFlags};
use super::names;
use super::registry::{HeaderRegistries, ParserRegistry};
use super::store::HttpHeaders;
use super::value_collection::{token_item, HeaderValueCollection};
use super::values::{Authentication, EntityTag, HeaderValue, ProductInfo, RetryCondition};
use crate::uri::Uri;

/// General and response headers of one response message.
#[derive(Debug, Clone)]
pub struct ResponseHeaders {
    headers: HttpHeaders,
    flags: SpecialFlags,
}

impl ResponseHeaders {
    pub fn new() -> Self {
        Self::with_registry(Arc::clone(&HeaderRegistries::shared().response))
    }

    pub fn with_registry(registry: Arc<ParserRegistry>) -> Self {
        Self { headers: HttpHeaders::with_registry(registry), flags: SpecialFlags::default() }
    }

    pub fn accept_ranges(&mut self) -> HeaderValueCollection<'_, String> {
        HeaderValueCollection::new(&mut self.headers, names::ACCEPT_RANGES).with_validator(token_item)
    }

    pub fn age(&self) -> Option<Duration> {
        general::time_span_value(&self.headers, names::AGE)
    }

    pub fn set_age(&mut self, value: Option<Duration>) {
        self.headers.set_or_remove_parsed_value(names::AGE, value.map(HeaderValue::TimeSpan));
    }

    pub fn etag(&self) -> Option<EntityTag> {
        self.headers.typed_value(names::ETAG)
    }

    pub fn set_etag(&mut self, value: Option<EntityTag>) {
        self.headers.set_or_remove_parsed_value(names::ETAG, value.map(HeaderValue::EntityTag));
    }

    pub fn location(&self) -> Option<Uri> {
        general::uri_value(&self.headers, names::LOCATION)
    }

    pub fn set_location(&mut self, value: Option<Uri>) {
        self.headers.set_or_remove_parsed_value(names::LOCATION, value.map(HeaderValue::Uri));
    }

    pub fn proxy_authenticate(&mut self) -> HeaderValueCollection<'_, Authentication> {
        HeaderValueCollection::new(&mut self.headers, names::PROXY_AUTHENTICATE)
    }

    pub fn retry_after(&self) -> Option<RetryCondition> {
        self.headers.typed_value(names::RETRY_AFTER)
    }

    pub fn set_retry_after(&mut self, value: Option<RetryCondition>) {
        self.headers
            .set_or_remove_parsed_value(names::RETRY_AFTER, value.map(HeaderValue::RetryCondition));
    }

    pub fn server(&mut self) -> HeaderValueCollection<'_, ProductInfo> {
        HeaderValueCollection::new(&mut self.headers, names::SERVER)
    }

    pub fn vary(&mut self) -> HeaderValueCollection<'_, String> {
        HeaderValueCollection::new(&mut self.headers, names::VARY).with_validator(token_item)
    }

    pub fn www_authenticate(&mut self) -> HeaderValueCollection<'_, Authentication> {
        HeaderValueCollection::new(&mut self.headers, names::WWW_AUTHENTICATE)
    }

    pub fn add_headers(&mut self, source: &ResponseHeaders) {
        self.headers.add_headers(&source.headers);
        self.flags.merge(&source.flags);
    }
}

impl Default for ResponseHeaders {
    fn default() -> Self {
        Self::new()
    }
}

impl GeneralHeaders for ResponseHeaders {
    fn store(&self) -> &HttpHeaders {
        &self.headers
    }

    fn store_mut(&mut self) -> &mut HttpHeaders {
        &mut self.headers
    }

    fn special_flags(&self) -> &SpecialFlags {
        &self.flags
    }

    fn special_flags_mut(&mut self) -> &mut SpecialFlags {
        &mut self.flags
    }
}

impl Deref for ResponseHeaders {
    type Target = HttpHeaders;

    fn deref(&self) -> &HttpHeaders {
        &self.headers
    }
}

impl DerefMut for ResponseHeaders {
    fn deref_mut(&mut self) -> &mut HttpHeaders {
        &mut self.headers
    }
}

impl fmt::Display for ResponseHeaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.headers.fmt(f)
    }
}
