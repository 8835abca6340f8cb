/*
 * parser.rs
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

//! Header parsers: one strategy object per header name, turning wire text into [`HeaderValue`]s.
//!
//! Parsers are stateless statics. A store hands each parser the whole line plus a cursor;
//! the parser reads one value (or, for multi-value headers, one list element) and advances
//! the cursor. Most headers share the list grammar in [`ListParser`]; dates, URIs, base64,
//! `User-Agent`/`Server` and `Cache-Control` need their own framing.

use std::fmt;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::debug;

use crate::error::HeaderError;
use crate::headers::date::parse_http_date;
use crate::headers::rules::{
    contains_invalid_newline, host_length, number_length, token_length, whitespace_length, MAX_INT32_DIGITS,
    MAX_INT64_DIGITS,
};
use crate::headers::utilities::is_valid_mail_address;
use crate::headers::values::{
    parse_list_item, Authentication, CacheControl, ContentDisposition, ContentRange, EntityTag, HeaderValue,
    MediaType, MediaTypeWithQuality, NameValue, NameValueWithParameters, Product, ProductInfo, Range,
    RangeCondition, RetryCondition, StringWithQuality, TransferCoding, TransferCodingWithQuality, Via, Warning,
};
use crate::uri::{decode_utf8_from_string, Uri};

const DEFAULT_SEPARATOR: &str = ", ";

/// Outcome of one successful parser step.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    /// A new value to append.
    Value(HeaderValue),
    /// The existing store value with this line applied; replaces it.
    Merged(HeaderValue),
    /// Only empty list elements were consumed.
    Nothing,
}

/// Parses the values of one header name.
pub trait HeaderParser: Send + Sync + fmt::Debug {
    fn supports_multiple_values(&self) -> bool;

    /// Joins values when the header is rendered as one line.
    fn separator(&self) -> &'static str {
        DEFAULT_SEPARATOR
    }

    /// Value equality for membership tests and removal.
    fn equals(&self, a: &HeaderValue, b: &HeaderValue) -> bool {
        a == b
    }

    /// Reads from `*index`, advancing it past the value on success. On failure `index` is
    /// left unchanged.
    fn try_parse_value(&self, value: &str, store_value: Option<&HeaderValue>, index: &mut usize) -> Option<Parsed>;

    fn parse_value(
        &self,
        value: &str,
        store_value: Option<&HeaderValue>,
        index: &mut usize,
    ) -> Result<Parsed, HeaderError> {
        let start = *index;
        self.try_parse_value(value, store_value, index)
            .ok_or_else(|| HeaderError::invalid_value(value.get(start..).unwrap_or(value)))
    }
}

fn into_parsed(item: Option<Option<HeaderValue>>) -> Option<Parsed> {
    item.map(|v| v.map_or(Parsed::Nothing, Parsed::Value))
}

type LengthFn = fn(&str, usize) -> Option<(usize, HeaderValue)>;

/// The comma-separated list grammar over a per-item length function.
pub struct ListParser {
    name: &'static str,
    multiple: bool,
    ignore_case: bool,
    length: LengthFn,
}

impl fmt::Debug for ListParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListParser")
            .field("name", &self.name)
            .field("multiple", &self.multiple)
            .field("ignore_case", &self.ignore_case)
            .finish()
    }
}

impl HeaderParser for ListParser {
    fn supports_multiple_values(&self) -> bool {
        self.multiple
    }

    fn equals(&self, a: &HeaderValue, b: &HeaderValue) -> bool {
        match (a, b) {
            (HeaderValue::Text(x), HeaderValue::Text(y)) if self.ignore_case => x.eq_ignore_ascii_case(y),
            _ => a == b,
        }
    }

    fn try_parse_value(&self, value: &str, _store_value: Option<&HeaderValue>, index: &mut usize) -> Option<Parsed> {
        into_parsed(parse_list_item(value, index, self.multiple, self.length))
    }
}

macro_rules! length_into {
    ($($name:ident => $f:path, $variant:ident;)*) => {
        $(
            fn $name(input: &str, start: usize) -> Option<(usize, HeaderValue)> {
                $f(input, start).map(|(len, v)| (len, HeaderValue::$variant(v)))
            }
        )*
    };
}

length_into! {
    media_type => MediaType::media_type_length, MediaType;
    media_type_with_quality => MediaTypeWithQuality::media_type_with_quality_length, MediaTypeWithQuality;
    string_with_quality => StringWithQuality::string_with_quality_length, StringWithQuality;
    name_value => NameValue::name_value_length, NameValue;
    name_value_with_parameters => NameValueWithParameters::name_value_with_parameters_length, NameValueWithParameters;
    transfer_coding => TransferCoding::transfer_coding_length, TransferCoding;
    transfer_coding_with_quality => TransferCodingWithQuality::transfer_coding_with_quality_length, TransferCodingWithQuality;
    product => Product::product_length, Product;
    via => Via::via_length, Via;
    warning => Warning::warning_length, Warning;
    entity_tag => EntityTag::entity_tag_length, EntityTag;
    range => Range::range_length, Range;
    range_condition => RangeCondition::range_condition_length, RangeCondition;
    retry_condition => RetryCondition::retry_condition_length, RetryCondition;
    content_range => ContentRange::content_range_length, ContentRange;
    authentication => Authentication::authentication_length, Authentication;
    content_disposition => ContentDisposition::disposition_type_length, ContentDisposition;
}

/// `ETag` names one entity; the `*` wildcard is only meaningful in conditional requests.
fn single_entity_tag(input: &str, start: usize) -> Option<(usize, HeaderValue)> {
    EntityTag::entity_tag_length(input, start)
        .filter(|(_, tag)| !tag.is_any())
        .map(|(len, tag)| (len, HeaderValue::EntityTag(tag)))
}

fn token(input: &str, start: usize) -> Option<(usize, HeaderValue)> {
    let len = token_length(input, start);
    (len > 0).then(|| (len, HeaderValue::Text(input[start..start + len].to_string())))
}

fn host(input: &str, start: usize) -> Option<(usize, HeaderValue)> {
    host_length(input, start, false).map(|(len, host)| (len, HeaderValue::Text(host.to_string())))
}

/// The rest of the line must be one mailbox.
fn mail_address(input: &str, start: usize) -> Option<(usize, HeaderValue)> {
    if contains_invalid_newline(input, start) {
        return None;
    }
    let rest = &input[start..];
    is_valid_mail_address(rest).then(|| (rest.len(), HeaderValue::Text(rest.trim_end().to_string())))
}

fn digits<'a>(input: &'a str, start: usize, max: usize) -> Option<(usize, &'a str)> {
    let len = number_length(input, start, false);
    (len > 0 && len <= max).then(|| (len, &input[start..start + len]))
}

fn int32(input: &str, start: usize) -> Option<(usize, HeaderValue)> {
    let (len, text) = digits(input, start, MAX_INT32_DIGITS)?;
    text.parse::<i32>().ok().map(|n| (len, HeaderValue::Int32(n)))
}

fn int64(input: &str, start: usize) -> Option<(usize, HeaderValue)> {
    let (len, text) = digits(input, start, MAX_INT64_DIGITS)?;
    text.parse::<i64>().ok().map(|n| (len, HeaderValue::Int64(n)))
}

/// Delta seconds, bounded like a 32-bit count.
fn time_span(input: &str, start: usize) -> Option<(usize, HeaderValue)> {
    let (len, text) = digits(input, start, MAX_INT32_DIGITS)?;
    let seconds = text.parse::<i32>().ok()?;
    Some((len, HeaderValue::TimeSpan(Duration::from_secs(seconds as u64))))
}

const fn list(name: &'static str, multiple: bool, length: LengthFn) -> ListParser {
    ListParser { name, multiple, ignore_case: false, length }
}

const fn list_ignore_case(name: &'static str, multiple: bool, length: LengthFn) -> ListParser {
    ListParser { name, multiple, ignore_case: true, length }
}

pub(crate) static TOKEN_LIST: ListParser = list_ignore_case("token-list", true, token);
pub(crate) static HOST: ListParser = list_ignore_case("host", false, host);
pub(crate) static MAIL_ADDRESS: ListParser = list("mail-address", false, mail_address);
pub(crate) static INT32: ListParser = list("int32", false, int32);
pub(crate) static INT64: ListParser = list("int64", false, int64);
pub(crate) static TIME_SPAN: ListParser = list("time-span", false, time_span);
pub(crate) static SINGLE_MEDIA_TYPE: ListParser = list("media-type", false, media_type);
pub(crate) static MEDIA_TYPE_WITH_QUALITY_LIST: ListParser =
    list("media-type-with-quality", true, media_type_with_quality);
pub(crate) static STRING_WITH_QUALITY_LIST: ListParser = list("string-with-quality", true, string_with_quality);
pub(crate) static NAME_VALUE_LIST: ListParser = list("name-value", true, name_value);
pub(crate) static NAME_VALUE_WITH_PARAMETERS_LIST: ListParser =
    list("name-value-with-parameters", true, name_value_with_parameters);
pub(crate) static TRANSFER_CODING_LIST: ListParser = list("transfer-coding", true, transfer_coding);
pub(crate) static TRANSFER_CODING_WITH_QUALITY_LIST: ListParser =
    list("transfer-coding-with-quality", true, transfer_coding_with_quality);
pub(crate) static PRODUCT_LIST: ListParser = list("product", true, product);
pub(crate) static VIA_LIST: ListParser = list("via", true, via);
pub(crate) static WARNING_LIST: ListParser = list("warning", true, warning);
pub(crate) static ENTITY_TAG_LIST: ListParser = list("entity-tag", true, entity_tag);
pub(crate) static SINGLE_ENTITY_TAG: ListParser = list("single-entity-tag", false, single_entity_tag);
pub(crate) static SINGLE_RANGE: ListParser = list("range", false, range);
pub(crate) static SINGLE_RANGE_CONDITION: ListParser = list("range-condition", false, range_condition);
pub(crate) static SINGLE_RETRY_CONDITION: ListParser = list("retry-condition", false, retry_condition);
pub(crate) static SINGLE_CONTENT_RANGE: ListParser = list("content-range", false, content_range);
pub(crate) static SINGLE_AUTHENTICATION: ListParser = list("authentication", false, authentication);
pub(crate) static AUTHENTICATION_LIST: ListParser = list("authentication-list", true, authentication);
pub(crate) static SINGLE_CONTENT_DISPOSITION: ListParser = list("content-disposition", false, content_disposition);

/// `User-Agent`/`Server`: whitespace-separated products and comments.
#[derive(Debug)]
pub struct ProductInfoParser;

impl HeaderParser for ProductInfoParser {
    fn supports_multiple_values(&self) -> bool {
        true
    }

    fn separator(&self) -> &'static str {
        " "
    }

    fn try_parse_value(&self, value: &str, _store_value: Option<&HeaderValue>, index: &mut usize) -> Option<Parsed> {
        if value.is_empty() || *index >= value.len() {
            return None;
        }
        let mut current = *index + whitespace_length(value, *index);
        if current == value.len() {
            return None;
        }
        let (len, info) = ProductInfo::product_info_length(value, current)?;
        current += len;
        // Adjacent elements must be separated by whitespace.
        if current < value.len() && !matches!(value.as_bytes()[current - 1], b' ' | b'\t') {
            return None;
        }
        *index = current;
        Some(Parsed::Value(HeaderValue::ProductInfo(info)))
    }
}

pub(crate) static PRODUCT_INFO: ProductInfoParser = ProductInfoParser;

/// The remainder of the line from the cursor, or None at the end.
fn rest_of_line(value: &str, index: usize) -> Option<&str> {
    if value.is_empty() || index >= value.len() {
        return None;
    }
    Some(&value[index..])
}

/// HTTP-dates take the whole remainder of the line.
#[derive(Debug)]
pub struct DateParser;

impl HeaderParser for DateParser {
    fn supports_multiple_values(&self) -> bool {
        false
    }

    fn try_parse_value(&self, value: &str, _store_value: Option<&HeaderValue>, index: &mut usize) -> Option<Parsed> {
        let date = parse_http_date(rest_of_line(value, *index)?)?;
        *index = value.len();
        Some(Parsed::Value(HeaderValue::Date(date)))
    }
}

pub(crate) static DATE: DateParser = DateParser;

/// Base64 (`Content-MD5`).
#[derive(Debug)]
pub struct ByteArrayParser;

impl HeaderParser for ByteArrayParser {
    fn supports_multiple_values(&self) -> bool {
        false
    }

    fn try_parse_value(&self, value: &str, _store_value: Option<&HeaderValue>, index: &mut usize) -> Option<Parsed> {
        let text = rest_of_line(value, *index)?;
        let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        match STANDARD.decode(compact.as_bytes()) {
            Ok(bytes) => {
                *index = value.len();
                Some(Parsed::Value(HeaderValue::Bytes(bytes)))
            }
            Err(e) => {
                debug!(value = text, error = %e, "invalid base64 header value");
                None
            }
        }
    }
}

pub(crate) static BYTE_ARRAY: ByteArrayParser = ByteArrayParser;

/// Absolute or relative references. Servers sometimes send raw UTF-8 that arrives as
/// Latin-1 characters; such text is re-decoded once before giving up.
#[derive(Debug)]
pub struct UriParser;

impl HeaderParser for UriParser {
    fn supports_multiple_values(&self) -> bool {
        false
    }

    fn try_parse_value(&self, value: &str, _store_value: Option<&HeaderValue>, index: &mut usize) -> Option<Parsed> {
        let text = rest_of_line(value, *index)?.trim();
        let uri = Uri::try_parse(text).or_else(|| Uri::try_parse(&decode_utf8_from_string(text)))?;
        *index = value.len();
        Some(Parsed::Value(HeaderValue::Uri(uri)))
    }
}

pub(crate) static URI: UriParser = UriParser;

/// `Cache-Control`: every line folds into the single stored value.
#[derive(Debug)]
pub struct CacheControlParser;

impl HeaderParser for CacheControlParser {
    fn supports_multiple_values(&self) -> bool {
        true
    }

    fn try_parse_value(&self, value: &str, store_value: Option<&HeaderValue>, index: &mut usize) -> Option<Parsed> {
        let store = match store_value {
            Some(HeaderValue::CacheControl(cc)) => Some(cc),
            _ => None,
        };
        let item = parse_list_item(value, index, true, |input, start| {
            CacheControl::cache_control_length(input, start, store)
        })?;
        Some(match item {
            None => Parsed::Nothing,
            Some(cc) if store.is_some() => Parsed::Merged(HeaderValue::CacheControl(cc)),
            Some(cc) => Parsed::Value(HeaderValue::CacheControl(cc)),
        })
    }
}

pub(crate) static CACHE_CONTROL: CacheControlParser = CacheControlParser;

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_all(parser: &dyn HeaderParser, value: &str) -> Option<Vec<HeaderValue>> {
        let mut index = 0;
        let mut out = Vec::new();
        loop {
            match parser.try_parse_value(value, None, &mut index)? {
                Parsed::Value(v) | Parsed::Merged(v) => out.push(v),
                Parsed::Nothing => {}
            }
            if index >= value.len() {
                return Some(out);
            }
        }
    }

    fn texts(values: &[HeaderValue]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn token_list() {
        let values = parse_all(&TOKEN_LIST, "keep-alive, , Upgrade").unwrap();
        assert_eq!(texts(&values), vec!["keep-alive", "Upgrade"]);
        assert!(parse_all(&TOKEN_LIST, "a b").is_none());
        assert!(TOKEN_LIST.equals(&HeaderValue::Text("Close".into()), &HeaderValue::Text("close".into())));
        assert!(!INT32.equals(&HeaderValue::Int32(1), &HeaderValue::Int32(2)));
    }

    #[test]
    fn single_value_rejects_list() {
        let mut index = 0;
        assert!(SINGLE_MEDIA_TYPE.try_parse_value("text/plain, text/html", None, &mut index).is_none());
        assert_eq!(index, 0);
        let err = SINGLE_MEDIA_TYPE.parse_value("text/plain, text/html", None, &mut index).unwrap_err();
        assert!(matches!(err, HeaderError::Format(_)));
    }

    #[test]
    fn numbers() {
        let mut index = 0;
        assert_eq!(INT32.try_parse_value(" 10 ", None, &mut index), Some(Parsed::Value(HeaderValue::Int32(10))));
        assert_eq!(index, 4);
        assert!(INT32.try_parse_value("2147483648", None, &mut 0).is_none());
        assert!(INT32.try_parse_value("12345678901", None, &mut 0).is_none());
        assert!(INT64.try_parse_value("-1", None, &mut 0).is_none());
        assert_eq!(
            INT64.try_parse_value("9223372036854775807", None, &mut 0),
            Some(Parsed::Value(HeaderValue::Int64(i64::MAX)))
        );
        assert_eq!(
            TIME_SPAN.try_parse_value("120", None, &mut 0),
            Some(Parsed::Value(HeaderValue::TimeSpan(Duration::from_secs(120))))
        );
        assert!(TIME_SPAN.try_parse_value("1.5", None, &mut 0).is_none());
    }

    #[test]
    fn host_is_exact() {
        let mut index = 0;
        let parsed = HOST.try_parse_value("example.com:8080", None, &mut index).unwrap();
        assert_eq!(parsed, Parsed::Value(HeaderValue::Text("example.com:8080".into())));
        assert!(HOST.try_parse_value("example.com/path", None, &mut 0).is_none());
        assert!(HOST.try_parse_value("a b", None, &mut 0).is_none());
    }

    #[test]
    fn mail_address_takes_rest() {
        let value = "\"Jo\" <jo@example.org>";
        let mut index = 0;
        assert!(MAIL_ADDRESS.try_parse_value(value, None, &mut index).is_some());
        assert_eq!(index, value.len());
        assert!(MAIL_ADDRESS.try_parse_value("jo@example.org\r\nx", None, &mut 0).is_none());
        assert!(MAIL_ADDRESS.try_parse_value("nobody", None, &mut 0).is_none());
    }

    #[test]
    fn product_info_needs_whitespace_between_elements() {
        let values = parse_all(&PRODUCT_INFO, "Mozilla/5.0 (X11; Linux) Gecko/2010 ").unwrap();
        assert_eq!(texts(&values), vec!["Mozilla/5.0", "(X11; Linux)", "Gecko/2010"]);
        assert!(parse_all(&PRODUCT_INFO, "a/1(comment)").is_none());
        assert!(PRODUCT_INFO.try_parse_value("   ", None, &mut 0).is_none());
        assert_eq!(PRODUCT_INFO.separator(), " ");
    }

    #[test]
    fn date_uses_remainder() {
        let value = "Sun, 06 Nov 1994 08:49:37 GMT";
        let mut index = 0;
        let parsed = DATE.try_parse_value(value, None, &mut index).unwrap();
        assert_eq!(index, value.len());
        match parsed {
            Parsed::Value(v) => assert_eq!(v.to_string(), value),
            other => panic!("unexpected {:?}", other),
        }
        assert!(DATE.try_parse_value("", None, &mut 0).is_none());
        assert!(DATE.try_parse_value("tomorrow", None, &mut 0).is_none());
    }

    #[test]
    fn byte_array() {
        let mut index = 0;
        assert_eq!(
            BYTE_ARRAY.try_parse_value("AQID", None, &mut index),
            Some(Parsed::Value(HeaderValue::Bytes(vec![1, 2, 3])))
        );
        assert!(BYTE_ARRAY.try_parse_value("not base64!", None, &mut 0).is_none());
    }

    #[test]
    fn uri_falls_back_to_utf8_decoding() {
        let mut index = 0;
        let parsed = URI.try_parse_value("/docs/index.html", None, &mut index).unwrap();
        assert_eq!(parsed, Parsed::Value(HeaderValue::Uri(Uri::parse("/docs/index.html").unwrap())));
        let mojibake: String = "/price-\u{20ac}".bytes().map(|b| b as char).collect();
        match URI.try_parse_value(&mojibake, None, &mut 0).unwrap() {
            Parsed::Value(HeaderValue::Uri(uri)) => assert_eq!(uri.path(), "/price-\u{20ac}"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn cache_control_merges_into_store_value() {
        let mut index = 0;
        let first = match CACHE_CONTROL.try_parse_value("no-cache", None, &mut index).unwrap() {
            Parsed::Value(v) => v,
            other => panic!("unexpected {:?}", other),
        };
        let mut index = 0;
        let merged = CACHE_CONTROL.try_parse_value("max-age=60", Some(&first), &mut index).unwrap();
        match merged {
            Parsed::Merged(HeaderValue::CacheControl(cc)) => {
                assert!(cc.no_cache());
                assert_eq!(cc.max_age(), Some(Duration::from_secs(60)));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(CACHE_CONTROL.try_parse_value(" , ", None, &mut 0), Some(Parsed::Nothing));
        assert!(CACHE_CONTROL.try_parse_value("max-age=x", Some(&first), &mut 0).is_none());
    }

    #[test]
    fn etag_rejects_wildcard_but_if_match_accepts_it() {
        assert!(SINGLE_ENTITY_TAG.try_parse_value("*", None, &mut 0).is_none());
        let values = parse_all(&ENTITY_TAG_LIST, "*, W/\"a\"").unwrap();
        assert_eq!(texts(&values), vec!["*", "W/\"a\""]);
    }

    #[test]
    fn challenges_split_on_scheme() {
        let values = parse_all(&AUTHENTICATION_LIST, "Basic realm=\"x\", Bearer").unwrap();
        assert_eq!(values.len(), 2);
    }
}
