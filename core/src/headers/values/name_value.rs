/*
 * name_value.rs
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

//! `name[=value]` pairs and `;`-delimited parameter lists (RFC 7231 parameter).

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::HeaderError;
use crate::headers::rules::{quoted_string_length, token_length, whitespace_length, ParseResult};
use crate::headers::utilities::{are_equal_collections, check_valid_token};

use super::{parse_single, try_parse_single};

/// A name with an optional token or quoted-string value (e.g. `charset=utf-8`, `no-cache`).
#[derive(Debug, Clone)]
pub struct NameValue {
    name: String,
    value: Option<String>,
}

impl NameValue {
    pub fn new(name: impl Into<String>) -> Result<Self, HeaderError> {
        let name = name.into();
        check_valid_token(&name, "name")?;
        Ok(Self { name, value: None })
    }

    /// The value must be a token or a quoted-string (quotes included).
    pub fn with_value(name: impl Into<String>, value: impl Into<String>) -> Result<Self, HeaderError> {
        let mut nv = Self::new(name)?;
        nv.set_value(Some(value.into()))?;
        Ok(nv)
    }

    pub(crate) fn new_unchecked(name: &str, value: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            value: value.filter(|v| !v.is_empty()).map(str::to_string),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn set_value(&mut self, value: Option<String>) -> Result<(), HeaderError> {
        if let Some(v) = value.as_deref() {
            check_value_format(v)?;
        }
        self.value = value.filter(|v| !v.is_empty());
        Ok(())
    }

    pub fn parse(input: &str) -> Result<Self, HeaderError> {
        parse_single(input, Self::name_value_length)
    }

    pub fn try_parse(input: &str) -> Option<Self> {
        try_parse_single(input, Self::name_value_length)
    }

    /// `token OWS [ "=" OWS ( token / quoted-string ) OWS ]`
    pub(crate) fn name_value_length(input: &str, start: usize) -> Option<(usize, NameValue)> {
        let bytes = input.as_bytes();
        if start >= bytes.len() {
            return None;
        }
        let name_len = token_length(input, start);
        if name_len == 0 {
            return None;
        }
        let name = &input[start..start + name_len];
        let mut current = start + name_len;
        current += whitespace_length(input, current);
        if current == bytes.len() || bytes[current] != b'=' {
            current += whitespace_length(input, current);
            return Some((current - start, NameValue::new_unchecked(name, None)));
        }
        current += 1;
        current += whitespace_length(input, current);
        let value_len = value_length(input, current);
        if value_len == 0 {
            return None;
        }
        let value = &input[current..current + value_len];
        current += value_len;
        current += whitespace_length(input, current);
        Some((current - start, NameValue::new_unchecked(name, Some(value))))
    }

    /// Parses `nv *( delimiter nv )`. A dangling delimiter fails the whole list.
    pub(crate) fn name_value_list_length(
        input: &str,
        start: usize,
        delimiter: u8,
        out: &mut Vec<NameValue>,
    ) -> Option<usize> {
        let bytes = input.as_bytes();
        if start >= bytes.len() {
            return None;
        }
        let mut current = start + whitespace_length(input, start);
        loop {
            let (len, item) = Self::name_value_length(input, current)?;
            out.push(item);
            current += len;
            current += whitespace_length(input, current);
            if current == bytes.len() || bytes[current] != delimiter {
                return Some(current - start);
            }
            current += 1;
            current += whitespace_length(input, current);
        }
    }

    /// Case-insensitive lookup by parameter name.
    pub(crate) fn find<'a>(values: &'a [NameValue], name: &str) -> Option<&'a NameValue> {
        values.iter().find(|nv| nv.name.eq_ignore_ascii_case(name))
    }

    pub(crate) fn find_index(values: &[NameValue], name: &str) -> Option<usize> {
        values.iter().position(|nv| nv.name.eq_ignore_ascii_case(name))
    }

    /// Appends `"{separator} {item}"` per item; the separator is skipped for the first item
    /// written into an empty buffer unless `leading` is set.
    pub(crate) fn write_list(values: &[NameValue], separator: char, leading: bool, out: &mut String) {
        for nv in values {
            if leading || !out.is_empty() {
                out.push(separator);
                out.push(' ');
            }
            out.push_str(&nv.to_string());
        }
    }

    pub(crate) fn hash_list<H: Hasher>(values: &[NameValue], state: &mut H) {
        // Order-independent so it agrees with multiset equality.
        let combined = values.iter().fold(0u64, |acc, nv| {
            let mut h = std::collections::hash_map::DefaultHasher::new();
            nv.hash(&mut h);
            acc ^ h.finish()
        });
        state.write_u64(combined);
    }
}

/// Token or quoted-string; 0 when neither starts at `start`.
pub(crate) fn value_length(input: &str, start: usize) -> usize {
    if start >= input.len() {
        return 0;
    }
    let len = token_length(input, start);
    if len > 0 {
        return len;
    }
    match quoted_string_length(input, start) {
        ParseResult::Parsed(n) => n,
        _ => 0,
    }
}

fn check_value_format(value: &str) -> Result<(), HeaderError> {
    if !value.is_empty() && value_length(value, 0) != value.len() {
        return Err(HeaderError::invalid_value(value));
    }
    Ok(())
}

impl PartialEq for NameValue {
    fn eq(&self, other: &Self) -> bool {
        if !self.name.eq_ignore_ascii_case(&other.name) {
            return false;
        }
        match (self.value.as_deref(), other.value.as_deref()) {
            (None, None) => true,
            (Some(a), Some(b)) if a.starts_with('"') => a == b,
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            _ => false,
        }
    }
}

impl Eq for NameValue {}

impl Hash for NameValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.to_ascii_lowercase().hash(state);
        match self.value.as_deref() {
            None => {}
            Some(v) if v.starts_with('"') => v.hash(state),
            Some(v) => v.to_ascii_lowercase().hash(state),
        }
    }
}

impl fmt::Display for NameValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(v) => write!(f, "{}={}", self.name, v),
            None => f.write_str(&self.name),
        }
    }
}

/// A name-value pair followed by `;` parameters, e.g. `Expect: 100-continue`.
#[derive(Debug, Clone)]
pub struct NameValueWithParameters {
    base: NameValue,
    parameters: Vec<NameValue>,
}

impl NameValueWithParameters {
    pub fn new(name: impl Into<String>) -> Result<Self, HeaderError> {
        Ok(Self { base: NameValue::new(name)?, parameters: Vec::new() })
    }

    pub fn with_value(name: impl Into<String>, value: impl Into<String>) -> Result<Self, HeaderError> {
        Ok(Self { base: NameValue::with_value(name, value)?, parameters: Vec::new() })
    }

    /// The `100-continue` expectation.
    pub fn continue_100() -> Self {
        Self { base: NameValue::new_unchecked("100-continue", None), parameters: Vec::new() }
    }

    pub fn name(&self) -> &str {
        self.base.name()
    }

    pub fn value(&self) -> Option<&str> {
        self.base.value()
    }

    pub fn parameters(&self) -> &[NameValue] {
        &self.parameters
    }

    pub fn parameters_mut(&mut self) -> &mut Vec<NameValue> {
        &mut self.parameters
    }

    pub fn parse(input: &str) -> Result<Self, HeaderError> {
        parse_single(input, Self::name_value_with_parameters_length)
    }

    pub fn try_parse(input: &str) -> Option<Self> {
        try_parse_single(input, Self::name_value_with_parameters_length)
    }

    pub(crate) fn name_value_with_parameters_length(input: &str, start: usize) -> Option<(usize, Self)> {
        let bytes = input.as_bytes();
        if start >= bytes.len() {
            return None;
        }
        let (len, base) = NameValue::name_value_length(input, start)?;
        let mut current = start + len;
        current += whitespace_length(input, current);
        let mut parameters = Vec::new();
        if current < bytes.len() && bytes[current] == b';' {
            current += 1;
            current += whitespace_length(input, current);
            let params_len = NameValue::name_value_list_length(input, current, b';', &mut parameters)?;
            current += params_len;
        }
        Some((current - start, Self { base, parameters }))
    }
}

impl PartialEq for NameValueWithParameters {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base && are_equal_collections(&self.parameters, &other.parameters, |a, b| a == b)
    }
}

impl Eq for NameValueWithParameters {}

impl Hash for NameValueWithParameters {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.base.hash(state);
        NameValue::hash_list(&self.parameters, state);
    }
}

impl fmt::Display for NameValueWithParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = self.base.to_string();
        NameValue::write_list(&self.parameters, ';', true, &mut s);
        f.write_str(&s)
    }
}
