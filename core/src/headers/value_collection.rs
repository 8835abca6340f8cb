/*
 * value_collection.rs
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

//! Typed list views over one multi-value header.

use std::fmt;

use crate::error::HeaderError;
use crate::headers::store::HttpHeaders;
use crate::headers::utilities::check_valid_token;
use crate::headers::values::TypedValue;

pub(crate) type Validator<T> = fn(&T) -> Result<(), HeaderError>;

/// Rejects list items that are not a single token (`Connection`, `Vary`, `Allow`, ...).
pub(crate) fn token_item(item: &String) -> Result<(), HeaderError> {
    check_valid_token(item, "item")
}

/// The values of header `name` seen as a collection of `T`.
///
/// Writes go straight to the store. A collection may carry a special value (`close` for
/// `Connection`, `chunked` for `Transfer-Encoding`) that the owning header group also
/// exposes as a flag.
pub struct HeaderValueCollection<'a, T: TypedValue> {
    store: &'a mut HttpHeaders,
    name: &'static str,
    special: Option<T>,
    validator: Option<Validator<T>>,
}

impl<'a, T: TypedValue> HeaderValueCollection<'a, T> {
    pub(crate) fn new(store: &'a mut HttpHeaders, name: &'static str) -> Self {
        Self { store, name, special: None, validator: None }
    }

    pub(crate) fn with_special(mut self, special: T) -> Self {
        self.special = Some(special);
        self
    }

    pub(crate) fn with_validator(mut self, validator: Validator<T>) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn header_name(&self) -> &'static str {
        self.name
    }

    fn check(&self, item: &T) -> Result<(), HeaderError> {
        match self.validator {
            Some(validate) => validate(item),
            None => Ok(()),
        }
    }

    pub fn add(&mut self, item: T) -> Result<(), HeaderError> {
        self.check(&item)?;
        self.store.add_parsed_value(self.name, item.into_header_value());
        Ok(())
    }

    /// Parses `input` with the header's parser and adds every value, or fails without change.
    pub fn parse_add(&mut self, input: &str) -> Result<(), HeaderError> {
        self.store.add(self.name, input)
    }

    pub fn try_parse_add(&mut self, input: &str) -> bool {
        self.store.try_parse_and_add_value(self.name, input)
    }

    /// Removes the header altogether, including values the parser rejected.
    pub fn clear(&mut self) {
        self.store.remove(self.name);
    }

    pub fn contains(&self, item: &T) -> bool {
        self.store.contains_parsed_value(self.name, &item.clone().into_header_value())
    }

    pub fn remove(&mut self, item: &T) -> bool {
        self.store.remove_parsed_value(self.name, &item.clone().into_header_value())
    }

    pub fn count(&self) -> usize {
        self.values().len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Parsed values in order; values the parser rejected are not included.
    pub fn values(&self) -> Vec<T> {
        self.store.typed_values(self.name)
    }

    pub fn iter(&self) -> std::vec::IntoIter<T> {
        self.values().into_iter()
    }

    pub fn is_special_value_set(&self) -> bool {
        self.special
            .as_ref()
            .map_or(false, |s| self.store.contains_parsed_value(self.name, &s.clone().into_header_value()))
    }

    pub(crate) fn set_special_value(&mut self) {
        let Some(special) = self.special.clone() else {
            return;
        };
        let value = special.into_header_value();
        if !self.store.contains_parsed_value(self.name, &value) {
            self.store.add_parsed_value(self.name, value);
        }
    }

    pub(crate) fn remove_special_value(&mut self) {
        if let Some(special) = self.special.clone() {
            self.store.remove_parsed_value(self.name, &special.into_header_value());
        }
    }

    /// The header line without the special value.
    pub fn to_string_without_special(&self) -> String {
        let special = self.special.clone().map(TypedValue::into_header_value);
        let line = match special {
            Some(ref s) if self.is_special_value_set() => self.store.header_string_excluding(self.name, Some(s)),
            _ => self.store.header_string(self.name),
        };
        line.unwrap_or_default()
    }
}

impl<'a, 'b, T: TypedValue> IntoIterator for &'b HeaderValueCollection<'a, T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: TypedValue> fmt::Display for HeaderValueCollection<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.store.header_string(self.name).unwrap_or_default())
    }
}

impl<T: TypedValue + fmt::Debug> fmt::Debug for HeaderValueCollection<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeaderValueCollection")
            .field("name", &self.name)
            .field("values", &self.values())
            .finish()
    }
}
