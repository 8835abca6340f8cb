/*
 * range.rs
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

//! Byte ranges requested with the `Range` header.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::HeaderError;
use crate::headers::rules::{number_length, token_length, whitespace_length, MAX_INT64_DIGITS};
use crate::headers::utilities::{are_equal_collections, check_valid_token, next_non_empty_or_whitespace_index};

use super::{parse_single, try_parse_single};

const DEFAULT_UNIT: &str = "bytes";

/// One `first-pos "-" [ last-pos ]` or `"-" suffix-length` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RangeItem {
    from: Option<i64>,
    to: Option<i64>,
}

impl RangeItem {
    pub fn new(from: Option<i64>, to: Option<i64>) -> Result<Self, HeaderError> {
        if from.is_none() && to.is_none() {
            return Err(HeaderError::Argument(
                "Invalid range. At least one of the two parameters must not be null.".to_string(),
            ));
        }
        if from.is_some_and(|f| f < 0) {
            return Err(HeaderError::out_of_range("from"));
        }
        if to.is_some_and(|t| t < 0) {
            return Err(HeaderError::out_of_range("to"));
        }
        if let (Some(f), Some(t)) = (from, to) {
            if f > t {
                return Err(HeaderError::out_of_range("from"));
            }
        }
        Ok(Self { from, to })
    }

    pub fn from(&self) -> Option<i64> {
        self.from
    }

    pub fn to(&self) -> Option<i64> {
        self.to
    }

    pub(crate) fn range_item_length(input: &str, start: usize) -> Option<(usize, Self)> {
        let bytes = input.as_bytes();
        if start >= bytes.len() {
            return None;
        }
        let from_len = number_length(input, start, false);
        if from_len > MAX_INT64_DIGITS {
            return None;
        }
        let mut current = start + from_len;
        current += whitespace_length(input, current);
        if current == bytes.len() || bytes[current] != b'-' {
            return None;
        }
        current += 1;
        current += whitespace_length(input, current);
        let to_start = current;
        let mut to_len = 0;
        if current < bytes.len() {
            to_len = number_length(input, current, false);
            if to_len > MAX_INT64_DIGITS {
                return None;
            }
            current += to_len;
            current += whitespace_length(input, current);
        }
        if from_len == 0 && to_len == 0 {
            return None;
        }
        let from = match from_len {
            0 => None,
            n => Some(input[start..start + n].parse::<i64>().ok()?),
        };
        let to = match to_len {
            0 => None,
            n => Some(input[to_start..to_start + n].parse::<i64>().ok()?),
        };
        if let (Some(f), Some(t)) = (from, to) {
            if f > t {
                return None;
            }
        }
        Some((current - start, Self { from, to }))
    }

    /// Comma separated items; empty elements are skipped but at least one item is required.
    pub(crate) fn range_item_list_length(input: &str, start: usize, out: &mut Vec<RangeItem>) -> Option<usize> {
        let len = input.len();
        if start >= len {
            return None;
        }
        let (mut current, _) = next_non_empty_or_whitespace_index(input, start, true);
        if current == len {
            return None;
        }
        loop {
            let (item_len, item) = Self::range_item_length(input, current)?;
            out.push(item);
            current += item_len;
            let (next, separator) = next_non_empty_or_whitespace_index(input, current, true);
            current = next;
            if current < len && !separator {
                return None;
            }
            if current == len {
                return Some(current - start);
            }
        }
    }
}

impl fmt::Display for RangeItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(from) = self.from {
            write!(f, "{}", from)?;
        }
        f.write_str("-")?;
        if let Some(to) = self.to {
            write!(f, "{}", to)?;
        }
        Ok(())
    }
}

/// `unit "=" range-item *( "," range-item )`
#[derive(Debug, Clone)]
pub struct Range {
    unit: String,
    ranges: Vec<RangeItem>,
}

impl Default for Range {
    fn default() -> Self {
        Self { unit: DEFAULT_UNIT.to_string(), ranges: Vec::new() }
    }
}

impl Range {
    /// A `bytes` range with a single item.
    pub fn new(from: Option<i64>, to: Option<i64>) -> Result<Self, HeaderError> {
        Ok(Self { unit: DEFAULT_UNIT.to_string(), ranges: vec![RangeItem::new(from, to)?] })
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

    pub fn ranges(&self) -> &[RangeItem] {
        &self.ranges
    }

    pub fn ranges_mut(&mut self) -> &mut Vec<RangeItem> {
        &mut self.ranges
    }

    pub fn parse(input: &str) -> Result<Self, HeaderError> {
        parse_single(input, Self::range_length)
    }

    pub fn try_parse(input: &str) -> Option<Self> {
        try_parse_single(input, Self::range_length)
    }

    pub(crate) fn range_length(input: &str, start: usize) -> Option<(usize, Self)> {
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
        current += whitespace_length(input, current);
        if current == bytes.len() || bytes[current] != b'=' {
            return None;
        }
        current += 1;
        current += whitespace_length(input, current);
        let mut ranges = Vec::new();
        current += RangeItem::range_item_list_length(input, current, &mut ranges)?;
        Some((current - start, Self { unit, ranges }))
    }
}

impl PartialEq for Range {
    fn eq(&self, other: &Self) -> bool {
        self.unit.eq_ignore_ascii_case(&other.unit) && are_equal_collections(&self.ranges, &other.ranges, |a, b| a == b)
    }
}

impl Eq for Range {}

impl Hash for Range {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.unit.to_ascii_lowercase().hash(state);
        // Sorted so the hash agrees with order-insensitive equality.
        let mut items: Vec<_> = self.ranges.iter().map(|r| (r.from, r.to)).collect();
        items.sort_unstable();
        items.hash(state);
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=", self.unit)?;
        for (i, item) in self.ranges.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            item.fmt(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_item_list() {
        let r = Range::parse("bytes=0-499, 500-, -200").unwrap();
        assert_eq!(r.unit(), "bytes");
        assert_eq!(
            r.ranges(),
            &[
                RangeItem::new(Some(0), Some(499)).unwrap(),
                RangeItem::new(Some(500), None).unwrap(),
                RangeItem::new(None, Some(200)).unwrap(),
            ]
        );
        assert_eq!(r.to_string(), "bytes=0-499, 500-, -200");
    }

    #[test]
    fn tolerates_empty_elements() {
        let r = Range::parse("items = , 1-2 ,, 3-4 ,").unwrap();
        assert_eq!(r.ranges().len(), 2);
    }

    #[test]
    fn rejects_inverted_and_empty() {
        assert!(Range::try_parse("bytes=5-1").is_none());
        assert!(Range::try_parse("bytes=-").is_none());
        assert!(Range::try_parse("bytes=").is_none());
        assert!(Range::try_parse("bytes 1-2").is_none());
        assert!(Range::try_parse("bytes=1-2 3-4").is_none());
        assert!(Range::try_parse("bytes=12345678901234567890-").is_none());
    }

    #[test]
    fn item_constructor() {
        assert!(matches!(RangeItem::new(None, None), Err(HeaderError::Argument(_))));
        assert!(matches!(RangeItem::new(Some(-1), None), Err(HeaderError::ArgumentOutOfRange(_))));
        assert!(matches!(RangeItem::new(Some(3), Some(2)), Err(HeaderError::ArgumentOutOfRange(_))));
    }

    #[test]
    fn equality_ignores_order_and_unit_case() {
        let a = Range::parse("Bytes=1-2, 3-4").unwrap();
        let b = Range::parse("bytes=3-4, 1-2").unwrap();
        assert_eq!(a, b);
    }
}
