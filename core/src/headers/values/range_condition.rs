/*
 * range_condition.rs
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

//! `If-Range` and `Retry-After` values: an alternative of two representations each.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::HeaderError;
use crate::headers::date::{format_http_date, parse_http_date, whole_seconds};
use crate::headers::rules::{number_length, whitespace_length, MAX_INT32_DIGITS};

use super::{parse_single, try_parse_single, EntityTag};

/// `entity-tag / HTTP-date`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RangeCondition {
    EntityTag(EntityTag),
    /// Whole seconds; build through [`RangeCondition::from_date`] to drop finer precision.
    Date(DateTime<Utc>),
}

impl RangeCondition {
    pub fn from_tag(tag: impl Into<String>) -> Result<Self, HeaderError> {
        EntityTag::new(tag).map(RangeCondition::EntityTag)
    }

    pub fn from_date(date: DateTime<Utc>) -> Self {
        RangeCondition::Date(whole_seconds(date))
    }

    pub fn entity_tag(&self) -> Option<&EntityTag> {
        match self {
            RangeCondition::EntityTag(t) => Some(t),
            RangeCondition::Date(_) => None,
        }
    }

    pub fn date(&self) -> Option<DateTime<Utc>> {
        match self {
            RangeCondition::Date(d) => Some(*d),
            RangeCondition::EntityTag(_) => None,
        }
    }

    pub fn parse(input: &str) -> Result<Self, HeaderError> {
        parse_single(input, Self::range_condition_length)
    }

    pub fn try_parse(input: &str) -> Option<Self> {
        try_parse_single(input, Self::range_condition_length)
    }

    /// Both forms must run to the end of the input.
    pub(crate) fn range_condition_length(input: &str, start: usize) -> Option<(usize, Self)> {
        let bytes = input.as_bytes();
        if start + 1 >= bytes.len() {
            return None;
        }
        let (first, second) = (bytes[start], bytes[start + 1]);
        if first == b'"' || (matches!(first, b'w' | b'W') && second == b'/') {
            let (len, tag) = EntityTag::entity_tag_length(input, start)?;
            if start + len != bytes.len() {
                return None;
            }
            Some((len, RangeCondition::EntityTag(tag)))
        } else {
            let date = parse_http_date(&input[start..])?;
            Some((bytes.len() - start, RangeCondition::Date(date)))
        }
    }
}

impl From<EntityTag> for RangeCondition {
    fn from(value: EntityTag) -> Self {
        RangeCondition::EntityTag(value)
    }
}

impl From<DateTime<Utc>> for RangeCondition {
    fn from(value: DateTime<Utc>) -> Self {
        RangeCondition::from_date(value)
    }
}

impl fmt::Display for RangeCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeCondition::EntityTag(t) => t.fmt(f),
            RangeCondition::Date(d) => f.write_str(&format_http_date(d)),
        }
    }
}

/// `HTTP-date / delta-seconds`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RetryCondition {
    Delta(Duration),
    /// Whole seconds; build through [`RetryCondition::from_date`] to drop finer precision.
    Date(DateTime<Utc>),
}

impl RetryCondition {
    /// Whole seconds only; deltas beyond `i32::MAX` seconds are out of range.
    pub fn from_delta(delta: Duration) -> Result<Self, HeaderError> {
        if delta.as_secs() > i32::MAX as u64 {
            return Err(HeaderError::out_of_range("delta"));
        }
        Ok(RetryCondition::Delta(Duration::from_secs(delta.as_secs())))
    }

    pub fn from_date(date: DateTime<Utc>) -> Self {
        RetryCondition::Date(whole_seconds(date))
    }

    pub fn delta(&self) -> Option<Duration> {
        match self {
            RetryCondition::Delta(d) => Some(*d),
            RetryCondition::Date(_) => None,
        }
    }

    pub fn date(&self) -> Option<DateTime<Utc>> {
        match self {
            RetryCondition::Date(d) => Some(*d),
            RetryCondition::Delta(_) => None,
        }
    }

    pub fn parse(input: &str) -> Result<Self, HeaderError> {
        parse_single(input, Self::retry_condition_length)
    }

    pub fn try_parse(input: &str) -> Option<Self> {
        try_parse_single(input, Self::retry_condition_length)
    }

    pub(crate) fn retry_condition_length(input: &str, start: usize) -> Option<(usize, Self)> {
        let bytes = input.as_bytes();
        if start >= bytes.len() {
            return None;
        }
        if bytes[start].is_ascii_digit() {
            let len = number_length(input, start, false);
            if len == 0 || len > MAX_INT32_DIGITS {
                return None;
            }
            let mut current = start + len;
            current += whitespace_length(input, current);
            if current != bytes.len() {
                return None;
            }
            let seconds = input[start..start + len].parse::<i32>().ok()?;
            Some((current - start, RetryCondition::Delta(Duration::from_secs(seconds as u64))))
        } else {
            let date = parse_http_date(&input[start..])?;
            Some((bytes.len() - start, RetryCondition::Date(date)))
        }
    }
}

impl From<DateTime<Utc>> for RetryCondition {
    fn from(value: DateTime<Utc>) -> Self {
        RetryCondition::from_date(value)
    }
}

impl fmt::Display for RetryCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryCondition::Delta(d) => write!(f, "{}", d.as_secs()),
            RetryCondition::Date(d) => f.write_str(&format_http_date(d)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_condition_forms() {
        let tag = RangeCondition::parse("W/\"abc\"").unwrap();
        assert!(tag.entity_tag().is_some_and(EntityTag::is_weak));
        let date = RangeCondition::parse("Sun, 06 Nov 1994 08:49:37 GMT").unwrap();
        assert_eq!(date.to_string(), "Sun, 06 Nov 1994 08:49:37 GMT");
        assert!(RangeCondition::try_parse("\"abc\" x").is_none());
        assert!(RangeCondition::try_parse("x").is_none());
    }

    #[test]
    fn retry_after_seconds() {
        let r = RetryCondition::parse("120").unwrap();
        assert_eq!(r.delta(), Some(Duration::from_secs(120)));
        assert_eq!(r.to_string(), "120");
        assert!(RetryCondition::try_parse("99999999999").is_none());
        assert!(RetryCondition::try_parse("3000000000").is_none());
        assert!(RetryCondition::try_parse("12 s").is_none());
    }

    #[test]
    fn retry_after_date() {
        let r = RetryCondition::parse("Fri, 31 Dec 1999 23:59:59 GMT").unwrap();
        assert!(r.date().is_some());
        assert!(matches!(
            RetryCondition::from_delta(Duration::from_secs(u64::from(u32::MAX))),
            Err(HeaderError::ArgumentOutOfRange(_))
        ));
    }

    #[test]
    fn dates_drop_sub_seconds() {
        use chrono::TimeZone;
        let when = Utc.timestamp_opt(784_111_777, 250_000_000).unwrap();
        let whole = Utc.timestamp_opt(784_111_777, 0).unwrap();

        let range = RangeCondition::from(when);
        assert_eq!(range.date(), Some(whole));
        assert_eq!(RangeCondition::parse(&range.to_string()).unwrap(), range);

        let retry = RetryCondition::from_date(when);
        assert_eq!(retry.date(), Some(whole));
        assert_eq!(RetryCondition::parse(&retry.to_string()).unwrap(), retry);
    }
}
