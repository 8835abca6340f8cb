/*
 * transfer_coding.rs
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

//! Transfer codings (`Transfer-Encoding`, `TE`).

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::HeaderError;
use crate::headers::rules::{token_length, whitespace_length};
use crate::headers::utilities::{are_equal_collections, check_valid_token, get_quality, set_quality};

use super::{parse_single, try_parse_single, NameValue};

/// `token *( OWS ";" OWS parameter )`
#[derive(Debug, Clone)]
pub struct TransferCoding {
    value: String,
    parameters: Vec<NameValue>,
}

impl TransferCoding {
    pub fn new(value: impl Into<String>) -> Result<Self, HeaderError> {
        let value = value.into();
        check_valid_token(&value, "value")?;
        Ok(Self { value, parameters: Vec::new() })
    }

    /// `chunked`, the coding that frames a message body of unknown length.
    pub fn chunked() -> Self {
        Self { value: "chunked".to_string(), parameters: Vec::new() }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn parameters(&self) -> &[NameValue] {
        &self.parameters
    }

    pub fn parameters_mut(&mut self) -> &mut Vec<NameValue> {
        &mut self.parameters
    }

    pub fn parse(input: &str) -> Result<Self, HeaderError> {
        parse_single(input, Self::transfer_coding_length)
    }

    pub fn try_parse(input: &str) -> Option<Self> {
        try_parse_single(input, Self::transfer_coding_length)
    }

    pub(crate) fn transfer_coding_length(input: &str, start: usize) -> Option<(usize, Self)> {
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
        let mut parameters = Vec::new();
        if current < bytes.len() && bytes[current] == b';' {
            current += 1;
            current += NameValue::name_value_list_length(input, current, b';', &mut parameters)?;
        }
        Some((current - start, Self { value, parameters }))
    }
}

impl PartialEq for TransferCoding {
    fn eq(&self, other: &Self) -> bool {
        self.value.eq_ignore_ascii_case(&other.value)
            && are_equal_collections(&self.parameters, &other.parameters, |a, b| a == b)
    }
}

impl Eq for TransferCoding {}

impl Hash for TransferCoding {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.to_ascii_lowercase().hash(state);
        NameValue::hash_list(&self.parameters, state);
    }
}

impl fmt::Display for TransferCoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = self.value.clone();
        NameValue::write_list(&self.parameters, ';', true, &mut s);
        f.write_str(&s)
    }
}

/// A transfer coding in `TE`, with an optional `q` weight parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransferCodingWithQuality(TransferCoding);

impl TransferCodingWithQuality {
    pub fn new(value: impl Into<String>) -> Result<Self, HeaderError> {
        TransferCoding::new(value).map(Self)
    }

    pub fn with_quality(value: impl Into<String>, quality: f64) -> Result<Self, HeaderError> {
        let mut v = Self::new(value)?;
        v.set_quality(Some(quality))?;
        Ok(v)
    }

    pub fn quality(&self) -> Option<f64> {
        get_quality(&self.0.parameters)
    }

    pub fn set_quality(&mut self, quality: Option<f64>) -> Result<(), HeaderError> {
        set_quality(&mut self.0.parameters, quality)
    }

    pub fn coding(&self) -> &TransferCoding {
        &self.0
    }

    pub fn value(&self) -> &str {
        self.0.value()
    }

    pub fn parameters(&self) -> &[NameValue] {
        self.0.parameters()
    }

    pub fn parse(input: &str) -> Result<Self, HeaderError> {
        parse_single(input, Self::transfer_coding_with_quality_length)
    }

    pub fn try_parse(input: &str) -> Option<Self> {
        try_parse_single(input, Self::transfer_coding_with_quality_length)
    }

    pub(crate) fn transfer_coding_with_quality_length(input: &str, start: usize) -> Option<(usize, Self)> {
        TransferCoding::transfer_coding_length(input, start).map(|(len, tc)| (len, Self(tc)))
    }
}

impl fmt::Display for TransferCodingWithQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_coding_with_parameters() {
        let tc = TransferCoding::parse("custom ; a=1;b=\"x y\"").unwrap();
        assert_eq!(tc.value(), "custom");
        assert_eq!(tc.parameters().len(), 2);
        assert_eq!(tc.to_string(), "custom; a=1; b=\"x y\"");
    }

    #[test]
    fn rejects_list_and_dangling_semicolon() {
        assert!(TransferCoding::try_parse("gzip, chunked").is_none());
        assert!(TransferCoding::try_parse("gzip;").is_none());
        assert!(TransferCoding::try_parse("").is_none());
    }

    #[test]
    fn equality_ignores_case() {
        assert_eq!(TransferCoding::new("Chunked").unwrap(), TransferCoding::parse("chunked").unwrap());
    }

    #[test]
    fn quality_parameter() {
        let tc = TransferCodingWithQuality::parse("deflate; q=0.5").unwrap();
        assert_eq!(tc.quality(), Some(0.5));
        let built = TransferCodingWithQuality::with_quality("trailers", 1.0).unwrap();
        assert_eq!(built.to_string(), "trailers; q=1.0");
        assert_eq!(TransferCodingWithQuality::new("gzip").unwrap().quality(), None);
    }
}
