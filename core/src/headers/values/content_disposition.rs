/*
 * content_disposition.rs
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

//! `Content-Disposition` values and their well-known parameters.

use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};

use crate::error::HeaderError;
use crate::headers::date::{format_http_date, parse_http_date};
use crate::headers::encoding::{decode_5987, decode_mime, encode_5987, encode_mime, is_quoted, requires_encoding};
use crate::headers::rules::{token_length, whitespace_length};
use crate::headers::utilities::are_equal_collections;

use super::{parse_single, try_parse_single, NameValue};

const NAME: &str = "name";
const FILE_NAME: &str = "filename";
const FILE_NAME_STAR: &str = "filename*";
const CREATION_DATE: &str = "creation-date";
const MODIFICATION_DATE: &str = "modification-date";
const READ_DATE: &str = "read-date";
const SIZE: &str = "size";

/// `disposition-type *( ";" parameter )`
#[derive(Debug, Clone)]
pub struct ContentDisposition {
    disposition_type: String,
    parameters: Vec<NameValue>,
}

impl ContentDisposition {
    pub fn new(disposition_type: impl Into<String>) -> Result<Self, HeaderError> {
        let disposition_type = disposition_type.into();
        check_disposition_type(&disposition_type, "disposition_type")?;
        Ok(Self { disposition_type, parameters: Vec::new() })
    }

    pub fn disposition_type(&self) -> &str {
        &self.disposition_type
    }

    pub fn set_disposition_type(&mut self, value: impl Into<String>) -> Result<(), HeaderError> {
        let value = value.into();
        check_disposition_type(&value, "value")?;
        self.disposition_type = value;
        Ok(())
    }

    pub fn parameters(&self) -> &[NameValue] {
        &self.parameters
    }

    pub fn parameters_mut(&mut self) -> &mut Vec<NameValue> {
        &mut self.parameters
    }

    pub fn name(&self) -> Option<String> {
        self.get_name(NAME)
    }

    pub fn set_name(&mut self, value: Option<&str>) -> Result<(), HeaderError> {
        self.set_name_param(NAME, value)
    }

    pub fn file_name(&self) -> Option<String> {
        self.get_name(FILE_NAME)
    }

    pub fn set_file_name(&mut self, value: Option<&str>) -> Result<(), HeaderError> {
        self.set_name_param(FILE_NAME, value)
    }

    pub fn file_name_star(&self) -> Option<String> {
        self.get_name(FILE_NAME_STAR)
    }

    pub fn set_file_name_star(&mut self, value: Option<&str>) -> Result<(), HeaderError> {
        self.set_name_param(FILE_NAME_STAR, value)
    }

    pub fn creation_date(&self) -> Option<DateTime<Utc>> {
        self.get_date(CREATION_DATE)
    }

    pub fn set_creation_date(&mut self, value: Option<DateTime<Utc>>) {
        self.set_date(CREATION_DATE, value)
    }

    pub fn modification_date(&self) -> Option<DateTime<Utc>> {
        self.get_date(MODIFICATION_DATE)
    }

    pub fn set_modification_date(&mut self, value: Option<DateTime<Utc>>) {
        self.set_date(MODIFICATION_DATE, value)
    }

    pub fn read_date(&self) -> Option<DateTime<Utc>> {
        self.get_date(READ_DATE)
    }

    pub fn set_read_date(&mut self, value: Option<DateTime<Utc>>) {
        self.set_date(READ_DATE, value)
    }

    pub fn size(&self) -> Option<i64> {
        let value = NameValue::find(&self.parameters, SIZE)?.value()?;
        value.parse::<u64>().ok().and_then(|v| i64::try_from(v).ok())
    }

    pub fn set_size(&mut self, value: Option<i64>) -> Result<(), HeaderError> {
        let existing = NameValue::find_index(&self.parameters, SIZE);
        match value {
            None => {
                if let Some(i) = existing {
                    self.parameters.remove(i);
                }
            }
            Some(v) if v < 0 => return Err(HeaderError::out_of_range("value")),
            Some(v) => {
                let text = v.to_string();
                match existing {
                    Some(i) => self.parameters[i].set_value(Some(text))?,
                    None => self.parameters.push(NameValue::new_unchecked(SIZE, Some(&text))),
                }
            }
        }
        Ok(())
    }

    pub fn parse(input: &str) -> Result<Self, HeaderError> {
        parse_single(input, Self::disposition_type_length)
    }

    pub fn try_parse(input: &str) -> Option<Self> {
        try_parse_single(input, Self::disposition_type_length)
    }

    pub(crate) fn disposition_type_length(input: &str, start: usize) -> Option<(usize, Self)> {
        let bytes = input.as_bytes();
        if start >= bytes.len() {
            return None;
        }
        let type_len = token_length(input, start);
        if type_len == 0 {
            return None;
        }
        let disposition_type = input[start..start + type_len].to_string();
        let mut current = start + type_len;
        current += whitespace_length(input, current);
        let mut parameters = Vec::new();
        if current < bytes.len() && bytes[current] == b';' {
            current += 1;
            current += NameValue::name_value_list_length(input, current, b';', &mut parameters)?;
        }
        Some((current - start, Self { disposition_type, parameters }))
    }

    fn get_date(&self, parameter: &str) -> Option<DateTime<Utc>> {
        let value = NameValue::find(&self.parameters, parameter)?.value()?;
        let value = if is_quoted(value) { &value[1..value.len() - 1] } else { value };
        parse_http_date(value)
    }

    fn set_date(&mut self, parameter: &str, date: Option<DateTime<Utc>>) {
        let existing = NameValue::find_index(&self.parameters, parameter);
        match date {
            None => {
                if let Some(i) = existing {
                    self.parameters.remove(i);
                }
            }
            Some(date) => {
                let quoted = format!("\"{}\"", format_http_date(&date));
                let nv = NameValue::new_unchecked(parameter, Some(&quoted));
                match existing {
                    Some(i) => self.parameters[i] = nv,
                    None => self.parameters.push(nv),
                }
            }
        }
    }

    /// `*` parameters are RFC 5987 decoded (None if that fails); others are RFC 2047 decoded
    /// when possible and returned as-is otherwise.
    fn get_name(&self, parameter: &str) -> Option<String> {
        let value = NameValue::find(&self.parameters, parameter)?.value()?;
        if parameter.ends_with('*') {
            decode_5987(value)
        } else {
            Some(decode_mime(value).unwrap_or_else(|| value.to_string()))
        }
    }

    fn set_name_param(&mut self, parameter: &str, value: Option<&str>) -> Result<(), HeaderError> {
        let existing = NameValue::find_index(&self.parameters, parameter);
        let Some(value) = value.filter(|v| !v.is_empty()) else {
            if let Some(i) = existing {
                self.parameters.remove(i);
            }
            return Ok(());
        };
        let encoded = if parameter.ends_with('*') {
            encode_5987(value)
        } else {
            encode_and_quote_mime(value)?
        };
        match existing {
            Some(i) => self.parameters[i].set_value(Some(encoded))?,
            None => self.parameters.push(NameValue::with_value(parameter, encoded)?),
        }
        Ok(())
    }
}

/// Quotes the value when it is not a token and encodes it when it is not ASCII.
fn encode_and_quote_mime(input: &str) -> Result<String, HeaderError> {
    let (mut text, mut quote) = if is_quoted(input) {
        (input[1..input.len() - 1].to_string(), true)
    } else {
        (input.to_string(), false)
    };
    if text.contains('"') {
        return Err(HeaderError::Argument(format!("The format of value '{}' is invalid.", input)));
    }
    if requires_encoding(&text) {
        quote = true;
        text = encode_mime(&text);
    } else if !quote && token_length(&text, 0) != text.len() {
        quote = true;
    }
    Ok(if quote { format!("\"{}\"", text) } else { text })
}

fn check_disposition_type(value: &str, param: &str) -> Result<(), HeaderError> {
    if value.is_empty() {
        return Err(HeaderError::empty(param));
    }
    if token_length(value, 0) != value.len() {
        return Err(HeaderError::invalid_value(value));
    }
    Ok(())
}

impl PartialEq for ContentDisposition {
    fn eq(&self, other: &Self) -> bool {
        self.disposition_type.eq_ignore_ascii_case(&other.disposition_type)
            && are_equal_collections(&self.parameters, &other.parameters, |a, b| a == b)
    }
}

impl Eq for ContentDisposition {}

impl Hash for ContentDisposition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.disposition_type.to_ascii_lowercase().hash(state);
        NameValue::hash_list(&self.parameters, state);
    }
}

impl fmt::Display for ContentDisposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = self.disposition_type.clone();
        NameValue::write_list(&self.parameters, ';', true, &mut s);
        f.write_str(&s)
    }
}
