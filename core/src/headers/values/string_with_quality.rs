/*
 * string_with_quality.rs
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

//! Weighted tokens (`Accept-Charset`, `Accept-Encoding`, `Accept-Language`).

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::HeaderError;
use crate::headers::rules::{number_length, token_length, whitespace_length};
use crate::headers::utilities::{check_valid_token, format_quality, parse_quality};

use super::{parse_single, try_parse_single};

/// `token [ OWS ";" OWS "q" OWS "=" OWS qvalue ]`
#[derive(Debug, Clone)]
pub struct StringWithQuality {
    value: String,
    quality: Option<f64>,
}

impl StringWithQuality {
    pub fn new(value: impl Into<String>) -> Result<Self, HeaderError> {
        let value = value.into();
        check_valid_token(&value, "value")?;
        Ok(Self { value, quality: None })
    }

    pub fn with_quality(value: impl Into<String>, quality: f64) -> Result<Self, HeaderError> {
        let value = value.into();
        check_valid_token(&value, "value")?;
        let quality = quality + 0.0;
        if !(0.0..=1.0).contains(&quality) {
            return Err(HeaderError::out_of_range("quality"));
        }
        Ok(Self { value, quality: Some(quality) })
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn quality(&self) -> Option<f64> {
        self.quality
    }

    pub fn parse(input: &str) -> Result<Self, HeaderError> {
        parse_single(input, Self::string_with_quality_length)
    }

    pub fn try_parse(input: &str) -> Option<Self> {
        try_parse_single(input, Self::string_with_quality_length)
    }

    pub(crate) fn string_with_quality_length(input: &str, start: usize) -> Option<(usize, Self)> {
        let bytes = input.as_bytes();
        if start >= bytes.len() {
            return None;
        }
        let token_len = token_length(input, start);
        if token_len == 0 {
            return None;
        }
        let value = input[start..start + token_len].to_string();
        let mut current = start + token_len;
        current += whitespace_length(input, current);
        if current == bytes.len() || bytes[current] != b';' {
            return Some((current - start, Self { value, quality: None }));
        }
        current += 1;
        current += whitespace_length(input, current);
        let quality = read_quality(input, &mut current)?;
        Some((current - start, Self { value, quality: Some(quality) }))
    }
}

/// `q OWS = OWS number OWS`, with the number in [0, 1].
fn read_quality(input: &str, index: &mut usize) -> Option<f64> {
    let bytes = input.as_bytes();
    let mut current = *index;
    if current == bytes.len() || !matches!(bytes[current], b'q' | b'Q') {
        return None;
    }
    current += 1;
    current += whitespace_length(input, current);
    if current == bytes.len() || bytes[current] != b'=' {
        return None;
    }
    current += 1;
    current += whitespace_length(input, current);
    if current == bytes.len() {
        return None;
    }
    let number_len = number_length(input, current, true);
    if number_len == 0 {
        return None;
    }
    let quality = parse_quality(&input[current..current + number_len])?;
    if !(0.0..=1.0).contains(&quality) {
        return None;
    }
    current += number_len;
    current += whitespace_length(input, current);
    *index = current;
    Some(quality)
}

impl PartialEq for StringWithQuality {
    fn eq(&self, other: &Self) -> bool {
        self.value.eq_ignore_ascii_case(&other.value) && self.quality == other.quality
    }
}

impl Eq for StringWithQuality {}

impl Hash for StringWithQuality {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.to_ascii_lowercase().hash(state);
        self.quality.map(f64::to_bits).hash(state);
    }
}

impl fmt::Display for StringWithQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.quality {
            Some(q) => write!(f, "{}; q={}", self.value, format_quality(q)),
            None => f.write_str(&self.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quality() {
        let v = StringWithQuality::parse("gzip;q=1.0").unwrap();
        assert_eq!(v.value(), "gzip");
        assert_eq!(v.quality(), Some(1.0));
        let v = StringWithQuality::parse("de ; Q = 0.7 ").unwrap();
        assert_eq!(v.quality(), Some(0.7));
        assert_eq!(v.to_string(), "de; q=0.7");
    }

    #[test]
    fn rejects_out_of_range_quality() {
        assert!(StringWithQuality::try_parse("gzip;q=2").is_none());
        assert!(StringWithQuality::try_parse("gzip;x=1").is_none());
        assert!(StringWithQuality::try_parse("gzip;q=").is_none());
    }

    #[test]
    fn constructor_checks_range() {
        assert!(matches!(
            StringWithQuality::with_quality("gzip", 1.5),
            Err(HeaderError::ArgumentOutOfRange(_))
        ));
        assert!(matches!(StringWithQuality::new("a b"), Err(HeaderError::Format(_))));
    }

    #[test]
    fn equality() {
        assert_eq!(
            StringWithQuality::with_quality("GZIP", 0.5).unwrap(),
            StringWithQuality::parse("gzip; q=0.5").unwrap()
        );
        assert_ne!(StringWithQuality::new("gzip").unwrap(), StringWithQuality::parse("gzip;q=1").unwrap());
    }

    #[test]
    fn negative_zero_quality_renders_unsigned() {
        let v = StringWithQuality::with_quality("gzip", -0.0).unwrap();
        assert_eq!(v.to_string(), "gzip; q=0.0");
        assert_eq!(StringWithQuality::parse(&v.to_string()).unwrap(), v);
        assert!(matches!(
            StringWithQuality::with_quality("gzip", -0.001),
            Err(HeaderError::ArgumentOutOfRange(_))
        ));
    }
}
