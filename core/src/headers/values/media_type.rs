/*
 * media_type.rs
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

//! Media types (`Content-Type`, `Accept`).

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::HeaderError;
use crate::headers::rules::{token_length, whitespace_length};
use crate::headers::utilities::{are_equal_collections, get_quality, set_quality};

use super::{parse_single, try_parse_single, NameValue};

const CHARSET: &str = "charset";

/// `type/subtype *( ";" parameter )`
#[derive(Debug, Clone)]
pub struct MediaType {
    media_type: String,
    parameters: Vec<NameValue>,
}

impl MediaType {
    /// `media_type` must be exactly `type/subtype` with no surrounding whitespace.
    pub fn new(media_type: impl Into<String>) -> Result<Self, HeaderError> {
        let media_type = media_type.into();
        check_media_type_format(&media_type, "media_type")?;
        Ok(Self { media_type, parameters: Vec::new() })
    }

    /// For media types and charsets known to be well formed.
    pub(crate) fn new_unchecked(media_type: &str, charset: Option<&str>) -> Self {
        let parameters = charset.map(|c| NameValue::new_unchecked(CHARSET, Some(c))).into_iter().collect();
        Self { media_type: media_type.to_string(), parameters }
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn set_media_type(&mut self, media_type: impl Into<String>) -> Result<(), HeaderError> {
        let media_type = media_type.into();
        check_media_type_format(&media_type, "value")?;
        self.media_type = media_type;
        Ok(())
    }

    pub fn parameters(&self) -> &[NameValue] {
        &self.parameters
    }

    pub fn parameters_mut(&mut self) -> &mut Vec<NameValue> {
        &mut self.parameters
    }

    pub fn charset(&self) -> Option<&str> {
        NameValue::find(&self.parameters, CHARSET).and_then(NameValue::value)
    }

    /// None or an empty string removes the parameter.
    pub fn set_charset(&mut self, charset: Option<&str>) -> Result<(), HeaderError> {
        let existing = NameValue::find_index(&self.parameters, CHARSET);
        match charset.filter(|c| !c.is_empty()) {
            None => {
                if let Some(i) = existing {
                    self.parameters.remove(i);
                }
            }
            Some(c) => match existing {
                Some(i) => self.parameters[i].set_value(Some(c.to_string()))?,
                None => self.parameters.push(NameValue::with_value(CHARSET, c)?),
            },
        }
        Ok(())
    }

    pub fn parse(input: &str) -> Result<Self, HeaderError> {
        parse_single(input, Self::media_type_length)
    }

    pub fn try_parse(input: &str) -> Option<Self> {
        try_parse_single(input, Self::media_type_length)
    }

    pub(crate) fn media_type_length(input: &str, start: usize) -> Option<(usize, Self)> {
        let bytes = input.as_bytes();
        if start >= bytes.len() {
            return None;
        }
        let (expr_len, media_type) = media_type_expression_length(input, start)?;
        let mut current = start + expr_len;
        current += whitespace_length(input, current);
        let mut parameters = Vec::new();
        if current < bytes.len() && bytes[current] == b';' {
            current += 1;
            current += NameValue::name_value_list_length(input, current, b';', &mut parameters)?;
        }
        Some((current - start, Self { media_type, parameters }))
    }
}

/// `token OWS "/" OWS token`; the returned text drops any inner whitespace.
fn media_type_expression_length(input: &str, start: usize) -> Option<(usize, String)> {
    let bytes = input.as_bytes();
    let type_len = token_length(input, start);
    if type_len == 0 {
        return None;
    }
    let mut current = start + type_len;
    current += whitespace_length(input, current);
    if current >= bytes.len() || bytes[current] != b'/' {
        return None;
    }
    current += 1;
    current += whitespace_length(input, current);
    let sub_len = token_length(input, current);
    if sub_len == 0 {
        return None;
    }
    let total = current + sub_len - start;
    let text = if type_len + sub_len + 1 == total {
        input[start..start + total].to_string()
    } else {
        format!("{}/{}", &input[start..start + type_len], &input[current..current + sub_len])
    };
    Some((total, text))
}

fn check_media_type_format(media_type: &str, param: &str) -> Result<(), HeaderError> {
    if media_type.is_empty() {
        return Err(HeaderError::empty(param));
    }
    match media_type_expression_length(media_type, 0) {
        Some((_, text)) if text.len() == media_type.len() => Ok(()),
        _ => Err(HeaderError::invalid_value(media_type)),
    }
}

impl PartialEq for MediaType {
    fn eq(&self, other: &Self) -> bool {
        self.media_type.eq_ignore_ascii_case(&other.media_type)
            && are_equal_collections(&self.parameters, &other.parameters, |a, b| a == b)
    }
}

impl Eq for MediaType {}

impl Hash for MediaType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.media_type.to_ascii_lowercase().hash(state);
        NameValue::hash_list(&self.parameters, state);
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = self.media_type.clone();
        NameValue::write_list(&self.parameters, ';', true, &mut s);
        f.write_str(&s)
    }
}

/// A media type in `Accept`, carrying an optional `q` weight.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaTypeWithQuality(MediaType);

impl MediaTypeWithQuality {
    pub fn new(media_type: impl Into<String>) -> Result<Self, HeaderError> {
        MediaType::new(media_type).map(Self)
    }

    pub fn with_quality(media_type: impl Into<String>, quality: f64) -> Result<Self, HeaderError> {
        let mut v = Self::new(media_type)?;
        v.set_quality(Some(quality))?;
        Ok(v)
    }

    pub fn quality(&self) -> Option<f64> {
        get_quality(&self.0.parameters)
    }

    pub fn set_quality(&mut self, quality: Option<f64>) -> Result<(), HeaderError> {
        set_quality(&mut self.0.parameters, quality)
    }

    pub fn media_type(&self) -> &MediaType {
        &self.0
    }

    pub fn media_type_mut(&mut self) -> &mut MediaType {
        &mut self.0
    }

    pub fn into_media_type(self) -> MediaType {
        self.0
    }

    pub fn parse(input: &str) -> Result<Self, HeaderError> {
        parse_single(input, Self::media_type_with_quality_length)
    }

    pub fn try_parse(input: &str) -> Option<Self> {
        try_parse_single(input, Self::media_type_with_quality_length)
    }

    pub(crate) fn media_type_with_quality_length(input: &str, start: usize) -> Option<(usize, Self)> {
        MediaType::media_type_length(input, start).map(|(len, mt)| (len, Self(mt)))
    }
}

impl From<MediaType> for MediaTypeWithQuality {
    fn from(value: MediaType) -> Self {
        Self(value)
    }
}

impl fmt::Display for MediaTypeWithQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_parameters() {
        let mt = MediaType::parse("text/html; charset=\"utf-8\"; level=1").unwrap();
        assert_eq!(mt.media_type(), "text/html");
        assert_eq!(mt.charset(), Some("\"utf-8\""));
        assert_eq!(mt.parameters().len(), 2);
        assert_eq!(mt.to_string(), "text/html; charset=\"utf-8\"; level=1");
    }

    #[test]
    fn normalizes_inner_whitespace() {
        let mt = MediaType::parse("text / plain").unwrap();
        assert_eq!(mt.media_type(), "text/plain");
    }

    #[test]
    fn rejects_malformed() {
        assert!(MediaType::try_parse("text").is_none());
        assert!(MediaType::try_parse("text/plain;").is_none());
        assert!(MediaType::try_parse("text/plain, text/html").is_none());
        assert!(matches!(MediaType::new(""), Err(HeaderError::Argument(_))));
        assert!(matches!(MediaType::new("text / plain"), Err(HeaderError::Format(_))));
        assert!(matches!(MediaType::new("text/plain; charset=x"), Err(HeaderError::Format(_))));
    }

    #[test]
    fn charset_accessors() {
        let mut mt = MediaType::new("text/plain").unwrap();
        mt.set_charset(Some("utf-8")).unwrap();
        assert_eq!(mt.to_string(), "text/plain; charset=utf-8");
        mt.set_charset(Some("iso-8859-1")).unwrap();
        assert_eq!(mt.charset(), Some("iso-8859-1"));
        assert!(mt.set_charset(Some("bad value")).is_err());
        mt.set_charset(None).unwrap();
        assert_eq!(mt.to_string(), "text/plain");
    }

    #[test]
    fn equality_ignores_case_and_order() {
        let a = MediaType::parse("Text/HTML; a=1; b=2").unwrap();
        let b = MediaType::parse("text/html; b=2; A=1").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn quality() {
        let mut mt = MediaTypeWithQuality::parse("text/*; q=0.8").unwrap();
        assert_eq!(mt.quality(), Some(0.8));
        mt.set_quality(Some(0.5)).unwrap();
        assert_eq!(mt.to_string(), "text/*; q=0.5");
        assert!(matches!(mt.set_quality(Some(-0.1)), Err(HeaderError::ArgumentOutOfRange(_))));
        let v = MediaTypeWithQuality::with_quality("application/json", 1.0).unwrap();
        assert_eq!(v.to_string(), "application/json; q=1.0");
    }

    #[test]
    fn negative_zero_quality() {
        let mut mt = MediaTypeWithQuality::new("text/html").unwrap();
        mt.set_quality(Some(-0.0)).unwrap();
        assert_eq!(mt.to_string(), "text/html; q=0.0");
        assert_eq!(mt.quality(), Some(0.0));
        assert_eq!(MediaTypeWithQuality::parse(&mt.to_string()).unwrap(), mt);
    }
}
