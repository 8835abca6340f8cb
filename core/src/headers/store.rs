/*
 * store.rs
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

//! The header store shared by request, response and content header groups.
//!
//! Each header name owns three slots. `raw` holds text added without validation and is
//! parsed on first read; `parsed` holds values accepted by the header's parser (or plain text
//! when no parser is registered); `invalid` holds text the parser rejected, so that malformed
//! wire headers survive a round trip. Reads report raw, parsed, then invalid values.
//!
//! Reads take `&self` and parse lazily under a per-entry lock, so shared readers never
//! contend across names. Mutation needs `&mut self`: one writer, many readers.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::warn;

use crate::error::HeaderError;
use crate::headers::parser::{HeaderParser, Parsed};
use crate::headers::registry::ParserRegistry;
use crate::headers::rules::{contains_invalid_newline, is_token};
use crate::headers::values::{HeaderValue, TypedValue};

const DEFAULT_SEPARATOR: &str = ", ";

#[derive(Debug, Clone, Default)]
struct Slots {
    raw: Vec<String>,
    parsed: Vec<HeaderValue>,
    invalid: Vec<String>,
}

impl Slots {
    fn can_add(&self, parser: &dyn HeaderParser) -> bool {
        parser.supports_multiple_values() || (self.invalid.is_empty() && self.parsed.is_empty())
    }

    fn is_empty(&self) -> bool {
        self.raw.is_empty() && self.parsed.is_empty() && self.invalid.is_empty()
    }

    /// The value a merging parser folds new lines into: the sole parsed value, if any.
    fn store_value(&self) -> Option<&HeaderValue> {
        match self.parsed.as_slice() {
            [single] => Some(single),
            _ => None,
        }
    }

    fn commit(&mut self, line: LineValues) {
        if let Some(merged) = line.merged {
            match self.parsed.as_mut_slice() {
                [single] => *single = merged,
                _ => self.parsed.push(merged),
            }
        }
        self.parsed.extend(line.added);
    }

    fn values_as_strings(&self, exclude: Option<(&HeaderValue, &dyn HeaderParser)>) -> Vec<String> {
        let parsed = self
            .parsed
            .iter()
            .filter(|v| exclude.map_or(true, |(x, parser)| !parser.equals(x, v)))
            .map(ToString::to_string);
        self.raw.iter().cloned().chain(parsed).chain(self.invalid.iter().cloned()).collect()
    }
}

/// Values read from one header line, committed together once the whole line parsed.
#[derive(Default)]
struct LineValues {
    added: Vec<HeaderValue>,
    merged: Option<HeaderValue>,
}

fn parse_line(
    parser: &dyn HeaderParser,
    value: &str,
    store_value: Option<&HeaderValue>,
) -> Result<LineValues, HeaderError> {
    let mut line = LineValues::default();
    let mut index = 0;
    loop {
        let store = line.merged.as_ref().or(store_value);
        match parser.parse_value(value, store, &mut index)? {
            Parsed::Value(v) => line.added.push(v),
            Parsed::Merged(v) => line.merged = Some(v),
            Parsed::Nothing => {}
        }
        if index >= value.len() {
            return Ok(line);
        }
    }
}

fn has_invalid_newline(name: &str, value: &str) -> bool {
    let invalid = contains_invalid_newline(value, 0);
    if invalid {
        warn!(header = name, value, "dropping header value with a bare new line");
    }
    invalid
}

/// Strict path: any failure is returned and nothing from `value` is stored.
fn parse_and_add_value(
    name: &str,
    parser: Option<&dyn HeaderParser>,
    slots: &mut Slots,
    value: &str,
) -> Result<(), HeaderError> {
    let Some(parser) = parser else {
        if contains_invalid_newline(value, 0) {
            return Err(HeaderError::Format(
                "New-line characters in header values must be followed by a white-space character.".to_string(),
            ));
        }
        slots.parsed.push(HeaderValue::Text(value.to_string()));
        return Ok(());
    };
    if !slots.can_add(parser) {
        return Err(HeaderError::InvalidOperation(format!(
            "Cannot add value because header '{}' does not support multiple values.",
            name
        )));
    }
    let line = parse_line(parser, value, slots.store_value())?;
    slots.commit(line);
    Ok(())
}

/// Lenient path: a rejected value lands in the invalid slot (unless it carries a bare new
/// line, which is dropped) and false is returned.
fn try_parse_and_add_value(name: &str, parser: &dyn HeaderParser, slots: &mut Slots, value: &str) -> bool {
    if !slots.can_add(parser) {
        slots.invalid.push(value.to_string());
        return false;
    }
    match parse_line(parser, value, slots.store_value()) {
        Ok(line) => {
            slots.commit(line);
            true
        }
        Err(_) => {
            if !has_invalid_newline(name, value) {
                slots.invalid.push(value.to_string());
            }
            false
        }
    }
}

fn parse_raw_values(name: &str, parser: Option<&dyn HeaderParser>, slots: &mut Slots) {
    if slots.raw.is_empty() {
        return;
    }
    for value in std::mem::take(&mut slots.raw) {
        match parser {
            None => {
                if !has_invalid_newline(name, &value) {
                    slots.parsed.push(HeaderValue::Text(value));
                }
            }
            Some(parser) => {
                if !try_parse_and_add_value(name, parser, slots, &value) {
                    warn!(header = name, value = %value, "invalid header value");
                }
            }
        }
    }
}

fn lock(slots: &Mutex<Slots>) -> MutexGuard<'_, Slots> {
    slots.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug)]
struct HeaderEntry {
    name: String,
    parser: Option<&'static dyn HeaderParser>,
    slots: Mutex<Slots>,
}

impl HeaderEntry {
    fn new(name: &str, parser: Option<&'static dyn HeaderParser>) -> Self {
        Self { name: name.to_string(), parser, slots: Mutex::new(Slots::default()) }
    }

    /// Locks the entry with its raw values parsed.
    fn parsed_slots(&self) -> MutexGuard<'_, Slots> {
        let mut slots = lock(&self.slots);
        parse_raw_values(&self.name, self.parser, &mut slots);
        slots
    }

    fn parsed_slots_mut(&mut self) -> &mut Slots {
        let slots = self.slots.get_mut().unwrap_or_else(PoisonError::into_inner);
        parse_raw_values(&self.name, self.parser, slots);
        slots
    }

    fn slots_mut(&mut self) -> &mut Slots {
        self.slots.get_mut().unwrap_or_else(PoisonError::into_inner)
    }

    fn header_string(&self, slots: &Slots, exclude: Option<&HeaderValue>) -> String {
        let exclude = exclude.zip(self.parser);
        let values = slots.values_as_strings(exclude);
        if values.len() == 1 {
            return values.into_iter().next().unwrap_or_default();
        }
        let separator = match self.parser {
            Some(p) if p.supports_multiple_values() => p.separator(),
            _ => DEFAULT_SEPARATOR,
        };
        values.join(separator)
    }
}

impl Clone for HeaderEntry {
    fn clone(&self) -> Self {
        Self { name: self.name.clone(), parser: self.parser, slots: Mutex::new(lock(&self.slots).clone()) }
    }
}

/// An ordered, case-insensitive multimap from header name to values.
#[derive(Debug, Clone)]
pub struct HttpHeaders {
    registry: Arc<ParserRegistry>,
    entries: Vec<HeaderEntry>,
}

impl Default for HttpHeaders {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpHeaders {
    /// A store with no registered parsers: every value is kept as text.
    pub fn new() -> Self {
        Self::with_registry(Arc::new(ParserRegistry::empty()))
    }

    pub fn with_registry(registry: Arc<ParserRegistry>) -> Self {
        Self { registry, entries: Vec::new() }
    }

    pub fn registry(&self) -> &Arc<ParserRegistry> {
        &self.registry
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name.eq_ignore_ascii_case(name))
    }

    fn entry(&self, name: &str) -> Option<&HeaderEntry> {
        self.entries.iter().find(|e| e.name.eq_ignore_ascii_case(name))
    }

    fn check_header_name(&self, name: &str) -> Result<(), HeaderError> {
        if name.is_empty() {
            return Err(HeaderError::empty("name"));
        }
        if !is_token(name) {
            return Err(HeaderError::Format("The header name format is invalid.".to_string()));
        }
        if self.registry.is_invalid(name) {
            return Err(HeaderError::InvalidOperation(format!(
                "Misused header name '{}'. Request headers belong on requests, response headers on \
                 responses and content headers on content.",
                name
            )));
        }
        Ok(())
    }

    fn is_valid_header_name(&self, name: &str) -> bool {
        !name.is_empty() && is_token(name) && !self.registry.is_invalid(name)
    }

    /// Finds the entry, parses its raw values and drops it if nothing survived.
    fn find_parsed_mut(&mut self, name: &str) -> Option<usize> {
        let i = self.position(name)?;
        if self.entries[i].parsed_slots_mut().is_empty() {
            self.entries.remove(i);
            return None;
        }
        Some(i)
    }

    fn find_or_create(&mut self, name: &str) -> usize {
        match self.find_parsed_mut(name) {
            Some(i) => i,
            None => {
                self.entries.push(HeaderEntry::new(name, self.registry.parser(name)));
                self.entries.len() - 1
            }
        }
    }

    /// Adds one value, parsed strictly.
    pub fn add(&mut self, name: &str, value: &str) -> Result<(), HeaderError> {
        self.add_values(name, [value])
    }

    /// Adds each value in turn. Values accepted before a failure are kept.
    pub fn add_values<I, S>(&mut self, name: &str, values: I) -> Result<(), HeaderError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.check_header_name(name)?;
        let existing = self.find_parsed_mut(name);
        let mut fresh = None;
        let entry = match existing {
            Some(i) => &mut self.entries[i],
            None => fresh.insert(HeaderEntry::new(name, self.registry.parser(name))),
        };
        let parser = entry.parser;
        let result = {
            let slots = entry.slots.get_mut().unwrap_or_else(PoisonError::into_inner);
            values
                .into_iter()
                .try_for_each(|value| parse_and_add_value(name, parser, slots, value.as_ref()))
        };
        if let Some(mut entry) = fresh {
            if !entry.slots_mut().parsed.is_empty() {
                self.entries.push(entry);
            }
        }
        result
    }

    /// Stores `value` unparsed. Returns false only for a malformed or forbidden name.
    pub fn try_add_without_validation(&mut self, name: &str, value: &str) -> bool {
        self.try_add_values_without_validation(name, [value])
    }

    pub fn try_add_values_without_validation<I, S>(&mut self, name: &str, values: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if !self.is_valid_header_name(name) {
            return false;
        }
        let i = match self.position(name) {
            Some(i) => i,
            None => {
                self.entries.push(HeaderEntry::new(name, self.registry.parser(name)));
                self.entries.len() - 1
            }
        };
        let slots = self.entries[i].slots_mut();
        slots.raw.extend(values.into_iter().map(|v| v.as_ref().to_string()));
        true
    }

    /// Parses `value` now; text the parser rejects is kept as an invalid value and false is
    /// returned. Never fails.
    pub fn try_parse_and_add_value(&mut self, name: &str, value: &str) -> bool {
        if !self.is_valid_header_name(name) {
            return false;
        }
        let existing = self.find_parsed_mut(name);
        let mut fresh = None;
        let entry = match existing {
            Some(i) => &mut self.entries[i],
            None => fresh.insert(HeaderEntry::new(name, self.registry.parser(name))),
        };
        let parser = entry.parser;
        let slots = entry.slots.get_mut().unwrap_or_else(PoisonError::into_inner);
        let added = match parser {
            Some(parser) => try_parse_and_add_value(name, parser, slots, value),
            None => parse_and_add_value(name, None, slots, value).is_ok(),
        };
        if let Some(mut entry) = fresh {
            if !entry.slots_mut().is_empty() {
                self.entries.push(entry);
            }
        }
        added
    }

    /// All values for `name` as strings, or `InvalidOperation` when the header is absent.
    pub fn get_values(&self, name: &str) -> Result<Vec<String>, HeaderError> {
        self.check_header_name(name)?;
        self.try_get_values(name)
            .ok_or_else(|| HeaderError::InvalidOperation(format!("The given header '{}' was not found.", name)))
    }

    pub fn try_get_values(&self, name: &str) -> Option<Vec<String>> {
        if !self.is_valid_header_name(name) {
            return None;
        }
        let slots = self.entry(name)?.parsed_slots();
        (!slots.is_empty()).then(|| slots.values_as_strings(None))
    }

    /// True when `name` has at least one value after parsing.
    pub fn contains(&self, name: &str) -> bool {
        self.is_valid_header_name(name) && self.entry(name).map_or(false, |e| !e.parsed_slots().is_empty())
    }

    pub fn remove(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(i) if self.is_valid_header_name(name) => {
                self.entries.remove(i);
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Names and values of every header that has at least one value, in insertion order.
    /// Entries whose raw values parsed to nothing are skipped; see [`HttpHeaders::normalize`].
    pub fn entries(&self) -> Vec<(String, Vec<String>)> {
        self.entries
            .iter()
            .filter_map(|e| {
                let slots = e.parsed_slots();
                (!slots.is_empty()).then(|| (e.name.clone(), slots.values_as_strings(None)))
            })
            .collect()
    }

    /// Parses every raw value and removes the entries left with no value at all.
    pub fn normalize(&mut self) {
        self.entries.retain_mut(|e| !e.parsed_slots_mut().is_empty());
    }

    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|e| e.parsed_slots().is_empty())
    }

    /// The header rendered as one line value, joined with the parser's separator.
    pub fn header_string(&self, name: &str) -> Option<String> {
        self.header_string_excluding(name, None)
    }

    pub(crate) fn header_string_excluding(&self, name: &str, exclude: Option<&HeaderValue>) -> Option<String> {
        let entry = self.entry(name)?;
        let slots = entry.parsed_slots();
        (!slots.is_empty()).then(|| entry.header_string(&slots, exclude))
    }

    /// Copies every header of `source` whose name is not present here. Values are cloned.
    pub fn add_headers(&mut self, source: &HttpHeaders) {
        for entry in &source.entries {
            if self.position(&entry.name).is_some() {
                continue;
            }
            let slots = entry.parsed_slots();
            if slots.is_empty() {
                continue;
            }
            let mut copy = HeaderEntry::new(&entry.name, self.registry.parser(&entry.name));
            let target = copy.slots_mut();
            target.parsed = slots.parsed.clone();
            target.invalid = slots.invalid.clone();
            drop(slots);
            self.entries.push(copy);
        }
    }

    /// Parsed values only; raw values are parsed first and invalid ones are left out.
    pub(crate) fn parsed_values(&self, name: &str) -> Vec<HeaderValue> {
        self.entry(name).map_or_else(Vec::new, |e| e.parsed_slots().parsed.clone())
    }

    pub(crate) fn parsed_value(&self, name: &str) -> Option<HeaderValue> {
        self.entry(name).and_then(|e| e.parsed_slots().parsed.first().cloned())
    }

    pub(crate) fn typed_value<T: TypedValue>(&self, name: &str) -> Option<T> {
        self.parsed_value(name).as_ref().and_then(T::from_header_value).cloned()
    }

    pub(crate) fn typed_values<T: TypedValue>(&self, name: &str) -> Vec<T> {
        self.parsed_values(name).iter().filter_map(T::from_header_value).cloned().collect()
    }

    pub(crate) fn add_parsed_value(&mut self, name: &str, value: HeaderValue) {
        let i = self.find_or_create(name);
        self.entries[i].slots_mut().parsed.push(value);
    }

    /// Replaces every value of `name` with `value`.
    pub(crate) fn set_parsed_value(&mut self, name: &str, value: HeaderValue) {
        let i = self.find_or_create(name);
        let slots = self.entries[i].slots_mut();
        *slots = Slots::default();
        slots.parsed.push(value);
    }

    pub(crate) fn set_or_remove_parsed_value(&mut self, name: &str, value: Option<HeaderValue>) {
        match value {
            Some(v) => self.set_parsed_value(name, v),
            None => {
                self.remove(name);
            }
        }
    }

    /// Removes the first parsed value equal to `value` under the header's comparer. The entry
    /// goes away once it holds nothing.
    pub(crate) fn remove_parsed_value(&mut self, name: &str, value: &HeaderValue) -> bool {
        let Some(i) = self.find_parsed_mut(name) else {
            return false;
        };
        let entry = &mut self.entries[i];
        let parser = entry.parser;
        let slots = entry.slots_mut();
        let found = slots.parsed.iter().position(|v| values_equal(parser, value, v));
        if let Some(p) = found {
            slots.parsed.remove(p);
        }
        if slots.is_empty() {
            self.entries.remove(i);
        }
        found.is_some()
    }

    pub(crate) fn contains_parsed_value(&self, name: &str, value: &HeaderValue) -> bool {
        self.entry(name).map_or(false, |e| {
            let slots = e.parsed_slots();
            slots.parsed.iter().any(|v| values_equal(e.parser, value, v))
        })
    }
}

fn values_equal(parser: Option<&dyn HeaderParser>, a: &HeaderValue, b: &HeaderValue) -> bool {
    match parser {
        Some(p) => p.equals(a, b),
        None => a == b,
    }
}

impl<'a> IntoIterator for &'a HttpHeaders {
    type Item = (String, Vec<String>);
    type IntoIter = std::vec::IntoIter<(String, Vec<String>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries().into_iter()
    }
}

/// One `Name: value\r\n` line per header.
impl fmt::Display for HttpHeaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            let slots = entry.parsed_slots();
            if slots.is_empty() {
                continue;
            }
            write!(f, "{}: {}\r\n", entry.name, entry.header_string(&slots, None))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> HttpHeaders {
        HttpHeaders::with_registry(Arc::new(ParserRegistry::for_request()))
    }

    fn content() -> HttpHeaders {
        HttpHeaders::with_registry(Arc::new(ParserRegistry::for_content()))
    }

    #[test]
    fn add_parses_and_renders() {
        let mut h = request();
        h.add("Accept", "text/html, application/json;q=0.9").unwrap();
        h.add("accept", "*/*").unwrap();
        assert_eq!(h.get_values("ACCEPT").unwrap(), vec!["text/html", "application/json; q=0.9", "*/*"]);
        assert_eq!(h.to_string(), "Accept: text/html, application/json; q=0.9, */*\r\n");
    }

    #[test]
    fn header_name_checks() {
        let mut h = request();
        assert!(matches!(h.add("", "x"), Err(HeaderError::Argument(_))));
        assert!(matches!(h.add("Bad Name", "x"), Err(HeaderError::Format(_))));
        assert!(matches!(h.add("Content-Type", "text/plain"), Err(HeaderError::InvalidOperation(_))));
        assert!(!h.try_add_without_validation("Content-Type", "text/plain"));
        assert!(!h.try_add_without_validation("a:b", "x"));
        assert!(h.is_empty());
    }

    #[test]
    fn strict_add_rejects_malformed_value() {
        let mut h = request();
        let err = h.add("Max-Forwards", "ten").unwrap_err();
        assert_eq!(err, HeaderError::invalid_value("ten"));
        assert!(!h.contains("Max-Forwards"));
    }

    #[test]
    fn second_value_on_single_value_header() {
        let mut h = request();
        h.add("Host", "example.com").unwrap();
        assert!(matches!(h.add("Host", "example.org"), Err(HeaderError::InvalidOperation(_))));

        let mut raw = request();
        assert!(raw.try_add_without_validation("Host", "example.com"));
        assert!(raw.try_add_without_validation("Host", "example.org"));
        assert_eq!(raw.get_values("Host").unwrap(), vec!["example.com", "example.org"]);
        assert_eq!(raw.header_string("Host").as_deref(), Some("example.com, example.org"));
    }

    #[test]
    fn raw_values_parse_lazily_and_keep_invalid_text() {
        let mut h = request();
        h.try_add_without_validation("Max-Forwards", "not a number");
        h.try_add_without_validation("X-Custom", "anything goes");
        assert!(h.contains("Max-Forwards"));
        assert_eq!(h.get_values("Max-Forwards").unwrap(), vec!["not a number"]);
        assert_eq!(h.typed_value::<String>("X-Custom").as_deref(), Some("anything goes"));
        assert!(h.parsed_values("Max-Forwards").is_empty());
    }

    #[test]
    fn reparsing_is_idempotent() {
        let mut h = request();
        h.try_add_without_validation("Accept-Encoding", "gzip, deflate;q=0.5, bogus value");
        let first = h.get_values("Accept-Encoding").unwrap();
        let second = h.get_values("Accept-Encoding").unwrap();
        assert_eq!(first, second);
        assert_eq!(first, vec!["gzip, deflate;q=0.5, bogus value"]);
    }

    #[test]
    fn empty_list_is_absent_until_normalized() {
        let mut h = request();
        h.try_add_without_validation("Accept", " , ,");
        assert!(!h.contains("Accept"));
        assert!(h.try_get_values("Accept").is_none());
        assert!(h.entries().is_empty());
        assert_eq!(h.to_string(), "");
        h.normalize();
        assert!(h.entries.is_empty());
    }

    #[test]
    fn get_values_reports_missing_header() {
        let h = request();
        assert!(matches!(h.get_values("Accept"), Err(HeaderError::InvalidOperation(_))));
        assert!(matches!(h.get_values("Content-Type"), Err(HeaderError::InvalidOperation(_))));
        assert!(h.try_get_values("Accept").is_none());
    }

    #[test]
    fn try_parse_and_add_keeps_rejected_text() {
        let mut h = content();
        assert!(!h.try_parse_and_add_value("Content-Length", "-5"));
        assert_eq!(h.get_values("Content-Length").unwrap(), vec!["-5"]);
        assert!(h.try_parse_and_add_value("Allow", "GET, PUT"));
        assert!(!h.try_parse_and_add_value("Expires", "soon\r\nX-Injected: 1"));
        assert!(!h.contains("Expires"));
    }

    #[test]
    fn bare_newline_is_rejected_without_parser() {
        let mut h = HttpHeaders::new();
        assert!(matches!(h.add("X-A", "a\r\nb"), Err(HeaderError::Format(_))));
        h.add("X-A", "a\r\n b").unwrap();
        assert!(h.try_add_without_validation("X-B", "a\r\nb"));
        assert!(!h.contains("X-B"));
    }

    #[test]
    fn cache_control_lines_merge() {
        let mut h = request();
        h.add("Cache-Control", "no-cache").unwrap();
        h.add("Cache-Control", "max-age=30, foo=bar").unwrap();
        assert_eq!(h.parsed_values("Cache-Control").len(), 1);
        assert_eq!(h.header_string("Cache-Control").as_deref(), Some("no-cache, max-age=30, foo=bar"));
    }

    #[test]
    fn product_info_joins_with_space() {
        let mut h = request();
        h.add("User-Agent", "Mozilla/5.0 (X11)").unwrap();
        h.add("User-Agent", "Extra/1").unwrap();
        assert_eq!(h.header_string("User-Agent").as_deref(), Some("Mozilla/5.0 (X11) Extra/1"));
    }

    #[test]
    fn add_values_keeps_values_before_failure() {
        let mut h = request();
        let result = h.add_values("Accept-Language", ["en", "fr;q=0.5", "de;q=x"]);
        assert!(result.is_err());
        assert_eq!(h.get_values("Accept-Language").unwrap(), vec!["en", "fr; q=0.5"]);
    }

    #[test]
    fn parsed_value_operations_use_comparer() {
        let mut h = request();
        h.add("Connection", "Keep-Alive, CLOSE").unwrap();
        let close = HeaderValue::Text("close".into());
        assert!(h.contains_parsed_value("Connection", &close));
        assert!(h.remove_parsed_value("Connection", &close));
        assert!(!h.remove_parsed_value("Connection", &close));
        assert_eq!(h.header_string("Connection").as_deref(), Some("Keep-Alive"));
        assert!(h.remove_parsed_value("Connection", &HeaderValue::Text("keep-alive".into())));
        assert!(!h.contains("Connection"));
    }

    #[test]
    fn header_string_can_exclude_a_value() {
        let mut h = request();
        h.add("Connection", "close, upgrade").unwrap();
        let close = HeaderValue::Text("Close".into());
        assert_eq!(h.header_string_excluding("Connection", Some(&close)).as_deref(), Some("upgrade"));
    }

    #[test]
    fn set_parsed_value_replaces_everything() {
        let mut h = request();
        h.try_add_without_validation("Max-Forwards", "x");
        h.set_parsed_value("Max-Forwards", HeaderValue::Int32(3));
        assert_eq!(h.get_values("Max-Forwards").unwrap(), vec!["3"]);
        h.set_or_remove_parsed_value("Max-Forwards", None);
        assert!(!h.contains("Max-Forwards"));
    }

    #[test]
    fn add_headers_skips_existing_names() {
        let mut defaults = request();
        defaults.add("Accept", "text/html").unwrap();
        defaults.add("User-Agent", "Default/1").unwrap();
        defaults.try_add_without_validation("Max-Forwards", "bogus");
        let mut h = request();
        h.add("User-Agent", "Mine/2").unwrap();
        h.add_headers(&defaults);
        assert_eq!(h.header_string("User-Agent").as_deref(), Some("Mine/2"));
        assert_eq!(h.header_string("Accept").as_deref(), Some("text/html"));
        assert_eq!(h.get_values("Max-Forwards").unwrap(), vec!["bogus"]);
    }

    #[test]
    fn remove_and_clear() {
        let mut h = request();
        h.add("Accept", "text/html").unwrap();
        h.add("X-Trace", "1").unwrap();
        assert!(h.remove("accept"));
        assert!(!h.remove("accept"));
        assert_eq!(h.entries(), vec![("X-Trace".to_string(), vec!["1".to_string()])]);
        h.clear();
        assert!(h.is_empty());
    }

    #[test]
    fn shared_readers_across_threads() {
        let mut h = request();
        h.try_add_without_validation("Accept", "text/html, text/plain");
        let h = Arc::new(h);
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let h = Arc::clone(&h);
                std::thread::spawn(move || h.get_values("Accept").unwrap())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), vec!["text/html", "text/plain"]);
        }
    }
}
