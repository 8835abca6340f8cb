/*
 * content_range.rs
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

//! `Content-Range` values.

use std::fmt;

use crate::error::HeaderError;
use crate::headers::rules::{number_length, token_length, whitespace_length, MAX_INT64_DIGITS};
use crate::headers::utilities::check_valid_token;

use super::{parse_single, try_parse_single};

const DEFAULT_UNIT: &str = "bytes";

/// `unit SP ( first "-" last / "*" ) "/" ( length / "*" )`
///
/// `from` and `to` are either both present or both absent.
#[derive(Debug, Clone)]
pub struct ContentRange {
    unit: String,
    from: Option<i64>,
    to: Option<i64>,
    length: Option<i64>,
}

impl ContentRange {
    pub fn new(from: i64, to: i64, length: i64) -> Result<Self, HeaderError> {
        if length < 0 {
            return Err(HeaderError::out_of_range("length"));
        }
        if to < 0 || to > length {
            return Err(HeaderError::out_of_range("to"));
        }
        if from < 0 || from > to {
            return Err(HeaderError::out_of_range("from"));
        }
        Ok(Self { unit: DEFAULT_UNIT.to_string(), from: Some(from), to: Some(to), length: Some(length) })
    }

    /// `bytes */length`
    pub fn with_length(length: i64) -> Result<Self, HeaderError> {
        if length < 0 {
            return Err(HeaderError::out_of_range("length"));
        }
        Ok(Self { unit: DEFAULT_UNIT.to_string(), from: None, to: None, length: Some(length) })
    }

    /// `bytes from-to/*`
    pub fn with_range(from: i64, to: i64) -> Result<Self, HeaderError> {
        if to < 0 {
            return Err(HeaderError::out_of_range("to"));
        }
        if from < 0 || from > to {
            return Err(HeaderError::out_of_range("from"));
        }
        Ok(Self { unit: DEFAULT_UNIT.to_string(), from: Some(from), to: Some(to), length: None })
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn set_unit(&mut self, unit: impl Into<String>) -> Result<(), HeaderError> {
        let unit = unit.into();
        check_valid_token(&unit, "value")?;
        self.unit = unit;
        Ok(())
    }

    pub fn from(&self) -> Option<i64> {
        self.from
    }

    pub fn to(&self) -> Option<i64> {
        self.to
    }

    pub fn length(&self) -> Option<i64> {
        self.length
    }

    pub fn has_length(&self) -> bool {
        self.length.is_some()
    }

    pub fn has_range(&self) -> bool {
        self.from.is_some()
    }

    pub fn parse(input: &str) -> Result<Self, HeaderError> {
        parse_single(input, Self::content_range_length)
    }

    pub fn try_parse(input: &str) -> Option<Self> {
        try_parse_single(input, Self::content_range_length)
    }

    pub(crate) fn content_range_length(input: &str, start: usize) -> Option<(usize, Self)> {
        let bytes = input.as_bytes();
        if start >= bytes.len() {
            return None;
        }
        let unit_len = token_length(input, start);
        if unit_len == 0 {
            return None;
        }
        let unit = input[start..start + unit_len].to_string();
        let mut current = start + unit_len;
        let ws = whitespace_length(input, current);
        if ws == 0 {
            return None;
        }
        current += ws;
        if current == bytes.len() {
            return None;
        }
        let range = read_range(input, &mut current)?;
        if current == bytes.len() || bytes[current] != b'/' {
            return None;
        }
        current += 1;
        current += whitespace_length(input, current);
        if current == bytes.len() {
            return None;
        }
        let length = read_length(input, &mut current)?;
        let (from, to) = match range {
            Some((f, t)) => (Some(f), Some(t)),
            None => (None, None),
        };
        if let (Some(t), Some(l)) = (to, length) {
            if t >= l {
                return None;
            }
        }
        Some((current - start, Self { unit, from, to, length }))
    }
}

fn read_number(input: &str, current: usize) -> Option<(usize, i64)> {
    let len = number_length(input, current, false);
    if len == 0 || len > MAX_INT64_DIGITS {
        return None;
    }
    let value = input[current..current + len].parse::<i64>().ok()?;
    Some((len, value))
}

/// `*` or `from-to`. Outer None is a failure; inner None is the wildcard.
fn read_range(input: &str, current: &mut usize) -> Option<Option<(i64, i64)>> {
    let bytes = input.as_bytes();
    let range = if bytes[*current] == b'*' {
        *current += 1;
        None
    } else {
        let (from_len, from) = read_number(input, *current)?;
        *current += from_len;
        *current += whitespace_length(input, *current);
        if *current == bytes.len() || bytes[*current] != b'-' {
            return None;
        }
        *current += 1;
        *current += whitespace_length(input, *current);
        if *current == bytes.len() {
            return None;
        }
        let (to_len, to) = read_number(input, *current)?;
        *current += to_len;
        if from > to {
            return None;
        }
        Some((from, to))
    };
    *current += whitespace_length(input, *current);
    Some(range)
}

fn read_length(input: &str, current: &mut usize) -> Option<Option<i64>> {
    let length = if input.as_bytes()[*current] == b'*' {
        *current += 1;
        None
    } else {
        let (len, value) = read_number(input, *current)?;
        *current += len;
        Some(value)
    };
    *current += whitespace_length(input, *current);
    Some(length)
}

impl PartialEq for ContentRange {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from
            && self.to == other.to
            && self.length == other.length
            && self.unit.eq_ignore_ascii_case(&other.unit)
    }
}

impl Eq for ContentRange {}

impl std::hash::Hash for ContentRange {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.unit.to_ascii_lowercase().hash(state);
        self.from.hash(state);
        self.to.hash(state);
        self.length.hash(state);
    }
}

impl fmt::Display for ContentRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.unit)?;
        match (self.from, self.to) {
            (Some(from), Some(to)) => write!(f, "{}-{}", from, to)?,
            _ => f.write_str("*")?,
        }
        f.write_str("/")?;
        match self.length {
            Some(length) => write!(f, "{}", length),
            None => f.write_str("*"),
        }
    }
}
