/*
 * mod.rs
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

//! Typed header values.
//!
//! Every value type offers a validating constructor, `parse`/`try_parse`, `Display` in wire
//! form and equality with the case rules of its grammar. Parsers store values in the closed
//! [`HeaderValue`] enum; [`TypedValue`] maps between the enum and the concrete types.

use std::fmt;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};

use crate::error::HeaderError;
use crate::headers::date::format_http_date;
use crate::headers::utilities::next_non_empty_or_whitespace_index;
use crate::uri::Uri;

mod authentication;
mod cache_control;
mod content_disposition;
mod content_range;
mod entity_tag;
mod media_type;
pub(crate) mod name_value;
mod product;
mod range;
mod range_condition;
mod string_with_quality;
mod transfer_coding;
mod via;
mod warning;

pub use authentication::Authentication;
pub use cache_control::CacheControl;
pub use content_disposition::ContentDisposition;
pub use content_range::ContentRange;
pub use entity_tag::EntityTag;
pub use media_type::{MediaType, MediaTypeWithQuality};
pub use name_value::{NameValue, NameValueWithParameters};
pub use product::{Product, ProductInfo};
pub use range::{Range, RangeItem};
pub use range_condition::{RangeCondition, RetryCondition};
pub use string_with_quality::StringWithQuality;
pub use transfer_coding::{TransferCoding, TransferCodingWithQuality};
pub use via::Via;
pub use warning::Warning;

/// A parsed header value. The variant is chosen by the parser registered for the header name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HeaderValue {
    /// Tokens, hosts, mail addresses and values of headers without a parser.
    Text(String),
    Int32(i32),
    Int64(i64),
    /// Delta seconds.
    TimeSpan(Duration),
    Date(DateTime<Utc>),
    /// Base64 on the wire.
    Bytes(Vec<u8>),
    Uri(Uri),
    MediaType(MediaType),
    MediaTypeWithQuality(MediaTypeWithQuality),
    StringWithQuality(StringWithQuality),
    NameValue(NameValue),
    NameValueWithParameters(NameValueWithParameters),
    TransferCoding(TransferCoding),
    TransferCodingWithQuality(TransferCodingWithQuality),
    Product(Product),
    ProductInfo(ProductInfo),
    Via(Via),
    Warning(Warning),
    EntityTag(EntityTag),
    Range(Range),
    RangeCondition(RangeCondition),
    RetryCondition(RetryCondition),
    ContentRange(ContentRange),
    Authentication(Authentication),
    CacheControl(CacheControl),
    ContentDisposition(ContentDisposition),
}

impl HeaderValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            HeaderValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderValue::Text(v) => f.write_str(v),
            HeaderValue::Int32(v) => write!(f, "{}", v),
            HeaderValue::Int64(v) => write!(f, "{}", v),
            HeaderValue::TimeSpan(v) => write!(f, "{}", v.as_secs()),
            HeaderValue::Date(v) => f.write_str(&format_http_date(v)),
            HeaderValue::Bytes(v) => f.write_str(&STANDARD.encode(v)),
            HeaderValue::Uri(v) => v.fmt(f),
            HeaderValue::MediaType(v) => v.fmt(f),
            HeaderValue::MediaTypeWithQuality(v) => v.fmt(f),
            HeaderValue::StringWithQuality(v) => v.fmt(f),
            HeaderValue::NameValue(v) => v.fmt(f),
            HeaderValue::NameValueWithParameters(v) => v.fmt(f),
            HeaderValue::TransferCoding(v) => v.fmt(f),
            HeaderValue::TransferCodingWithQuality(v) => v.fmt(f),
            HeaderValue::Product(v) => v.fmt(f),
            HeaderValue::ProductInfo(v) => v.fmt(f),
            HeaderValue::Via(v) => v.fmt(f),
            HeaderValue::Warning(v) => v.fmt(f),
            HeaderValue::EntityTag(v) => v.fmt(f),
            HeaderValue::Range(v) => v.fmt(f),
            HeaderValue::RangeCondition(v) => v.fmt(f),
            HeaderValue::RetryCondition(v) => v.fmt(f),
            HeaderValue::ContentRange(v) => v.fmt(f),
            HeaderValue::Authentication(v) => v.fmt(f),
            HeaderValue::CacheControl(v) => v.fmt(f),
            HeaderValue::ContentDisposition(v) => v.fmt(f),
        }
    }
}

/// A concrete type stored in one [`HeaderValue`] variant.
pub trait TypedValue: Clone + PartialEq + fmt::Display {
    fn into_header_value(self) -> HeaderValue;
    fn from_header_value(value: &HeaderValue) -> Option<&Self>;
}

macro_rules! typed_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl TypedValue for $ty {
                fn into_header_value(self) -> HeaderValue {
                    HeaderValue::$variant(self)
                }

                fn from_header_value(value: &HeaderValue) -> Option<&Self> {
                    match value {
                        HeaderValue::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }

            impl From<$ty> for HeaderValue {
                fn from(value: $ty) -> Self {
                    HeaderValue::$variant(value)
                }
            }
        )*
    };
}

typed_value! {
    String => Text,
    Uri => Uri,
    MediaType => MediaType,
    MediaTypeWithQuality => MediaTypeWithQuality,
    StringWithQuality => StringWithQuality,
    NameValue => NameValue,
    NameValueWithParameters => NameValueWithParameters,
    TransferCoding => TransferCoding,
    TransferCodingWithQuality => TransferCodingWithQuality,
    Product => Product,
    ProductInfo => ProductInfo,
    Via => Via,
    Warning => Warning,
    EntityTag => EntityTag,
    Range => Range,
    RangeCondition => RangeCondition,
    RetryCondition => RetryCondition,
    ContentRange => ContentRange,
    Authentication => Authentication,
    CacheControl => CacheControl,
    ContentDisposition => ContentDisposition,
}

/// One step of the list grammar shared by every generic parser.
///
/// Skips leading whitespace (and with `multiple`, empty list elements), reads one item with
/// `item` and then skips to the start of the next element. Returns `Some(None)` when a
/// multi-value input has no further elements, and None on any grammar violation, including a
/// `,` after a single value. `index` only moves on success.
pub(crate) fn parse_list_item<T, F>(value: &str, index: &mut usize, multiple: bool, item: F) -> Option<Option<T>>
where
    F: FnOnce(&str, usize) -> Option<(usize, T)>,
{
    if value.is_empty() || *index >= value.len() {
        return multiple.then_some(None);
    }
    let (current, separator) = next_non_empty_or_whitespace_index(value, *index, multiple);
    if separator && !multiple {
        return None;
    }
    if current == value.len() {
        if multiple {
            *index = current;
        }
        return multiple.then_some(None);
    }
    let (len, parsed) = item(value, current)?;
    if len == 0 {
        return None;
    }
    let (next, separator) = next_non_empty_or_whitespace_index(value, current + len, multiple);
    if (separator && !multiple) || (!separator && next < value.len()) {
        return None;
    }
    *index = next;
    Some(Some(parsed))
}

/// Exactly one value, optionally surrounded by whitespace.
pub(crate) fn try_parse_single<T, F>(input: &str, item: F) -> Option<T>
where
    F: FnOnce(&str, usize) -> Option<(usize, T)>,
{
    let mut index = 0;
    parse_list_item(input, &mut index, false, item).flatten()
}

pub(crate) fn parse_single<T, F>(input: &str, item: F) -> Result<T, HeaderError>
where
    F: FnOnce(&str, usize) -> Option<(usize, T)>,
{
    try_parse_single(input, item).ok_or_else(|| HeaderError::invalid_value(input))
}
