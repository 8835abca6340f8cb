/*
 * general.rs
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

//! Accessors shared by request and response headers.

use std::time::Duration;

use chrono::{DateTime, Utc};

use super::names;
use super::store::HttpHeaders;
use super::value_collection::{token_item, HeaderValueCollection};
use super::values::{CacheControl, HeaderValue, NameValue, Product, TransferCoding, Via, Warning};
use crate::uri::Uri;

/// Whether a tri-state header flag was explicitly set to `false`.
///
/// `Some(false)` cannot be read back from the header text alone: it means the caller asked for
/// the special value to be absent, as opposed to never touching it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpecialFlags {
    connection_close_set: bool,
    transfer_encoding_chunked_set: bool,
}

impl SpecialFlags {
    pub(crate) fn merge(&mut self, other: &SpecialFlags) {
        self.connection_close_set |= other.connection_close_set;
        self.transfer_encoding_chunked_set |= other.transfer_encoding_chunked_set;
    }
}

/// Reads a tri-state special: present wins, then an explicit `false`, else unset.
pub(crate) fn tri_state(present: bool, explicitly_set: bool) -> Option<bool> {
    if present {
        Some(true)
    } else if explicitly_set {
        Some(false)
    } else {
        None
    }
}

pub(crate) fn date_value(store: &HttpHeaders, name: &str) -> Option<DateTime<Utc>> {
    match store.parsed_value(name)? {
        HeaderValue::Date(d) => Some(d),
        _ => None,
    }
}

pub(crate) fn set_date_value(store: &mut HttpHeaders, name: &str, value: Option<DateTime<Utc>>) {
    store.set_or_remove_parsed_value(name, value.map(HeaderValue::Date));
}

pub(crate) fn int32_value(store: &HttpHeaders, name: &str) -> Option<i32> {
    match store.parsed_value(name)? {
        HeaderValue::Int32(v) => Some(v),
        _ => None,
    }
}

pub(crate) fn int64_value(store: &HttpHeaders, name: &str) -> Option<i64> {
    match store.parsed_value(name)? {
        HeaderValue::Int64(v) => Some(v),
        _ => None,
    }
}

pub(crate) fn time_span_value(store: &HttpHeaders, name: &str) -> Option<Duration> {
    match store.parsed_value(name)? {
        HeaderValue::TimeSpan(v) => Some(v),
        _ => None,
    }
}

pub(crate) fn bytes_value(store: &HttpHeaders, name: &str) -> Option<Vec<u8>> {
    match store.parsed_value(name)? {
        HeaderValue::Bytes(v) => Some(v),
        _ => None,
    }
}

pub(crate) fn uri_value(store: &HttpHeaders, name: &str) -> Option<Uri> {
    store.typed_value(name)
}

/// Headers valid on both requests and responses.
///
/// Implementors hand out their store and their special flags; every accessor is provided.
pub trait GeneralHeaders {
    fn store(&self) -> &HttpHeaders;
    fn store_mut(&mut self) -> &mut HttpHeaders;
    fn special_flags(&self) -> &SpecialFlags;
    fn special_flags_mut(&mut self) -> &mut SpecialFlags;

    fn cache_control(&self) -> Option<CacheControl> {
        self.store().typed_value(names::CACHE_CONTROL)
    }

    fn set_cache_control(&mut self, value: Option<CacheControl>) {
        self.store_mut()
            .set_or_remove_parsed_value(names::CACHE_CONTROL, value.map(HeaderValue::CacheControl));
    }

    fn connection(&mut self) -> HeaderValueCollection<'_, String> {
        HeaderValueCollection::new(self.store_mut(), names::CONNECTION)
            .with_special("close".to_string())
            .with_validator(token_item)
    }

    /// `Some(true)` when `Connection: close` is present.
    fn connection_close(&self) -> Option<bool> {
        let present = self
            .store()
            .contains_parsed_value(names::CONNECTION, &HeaderValue::Text("close".to_string()));
        tri_state(present, self.special_flags().connection_close_set)
    }

    fn set_connection_close(&mut self, value: Option<bool>) {
        self.special_flags_mut().connection_close_set = value.is_some();
        if value == Some(true) {
            self.connection().set_special_value();
        } else {
            self.connection().remove_special_value();
        }
    }

    fn date(&self) -> Option<DateTime<Utc>> {
        date_value(self.store(), names::DATE)
    }

    fn set_date(&mut self, value: Option<DateTime<Utc>>) {
        set_date_value(self.store_mut(), names::DATE, value);
    }

    fn pragma(&mut self) -> HeaderValueCollection<'_, NameValue> {
        HeaderValueCollection::new(self.store_mut(), names::PRAGMA)
    }

    fn trailer(&mut self) -> HeaderValueCollection<'_, String> {
        HeaderValueCollection::new(self.store_mut(), names::TRAILER).with_validator(token_item)
    }

    fn transfer_encoding(&mut self) -> HeaderValueCollection<'_, TransferCoding> {
        HeaderValueCollection::new(self.store_mut(), names::TRANSFER_ENCODING).with_special(TransferCoding::chunked())
    }

    fn transfer_encoding_chunked(&self) -> Option<bool> {
        let present = self
            .store()
            .contains_parsed_value(names::TRANSFER_ENCODING, &HeaderValue::TransferCoding(TransferCoding::chunked()));
        tri_state(present, self.special_flags().transfer_encoding_chunked_set)
    }

    fn set_transfer_encoding_chunked(&mut self, value: Option<bool>) {
        self.special_flags_mut().transfer_encoding_chunked_set = value.is_some();
        if value == Some(true) {
            self.transfer_encoding().set_special_value();
        } else {
            self.transfer_encoding().remove_special_value();
        }
    }

    fn upgrade(&mut self) -> HeaderValueCollection<'_, Product> {
        HeaderValueCollection::new(self.store_mut(), names::UPGRADE)
    }

    fn via(&mut self) -> HeaderValueCollection<'_, Via> {
        HeaderValueCollection::new(self.store_mut(), names::VIA)
    }

    fn warning(&mut self) -> HeaderValueCollection<'_, Warning> {
        HeaderValueCollection::new(self.store_mut(), names::WARNING)
    }
}
