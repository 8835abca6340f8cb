/*
 * product.rs
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

//! Products and product comments (`User-Agent`, `Server`, `Upgrade`).

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::HeaderError;
use crate::headers::rules::{comment_length, token_length, whitespace_length, ParseResult};
use crate::headers::utilities::{check_valid_comment, check_valid_token};

use super::{parse_single, try_parse_single};

/// `token [ OWS "/" OWS token ]`
#[derive(Debug, Clone)]
pub struct Product {
    name: String,
    version: Option<String>,
}

impl Product {
    pub fn new(name: impl Into<String>) -> Result<Self, HeaderError> {
        let name = name.into();
        check_valid_token(&name, "name")?;
        Ok(Self { name, version: None })
    }

    /// An empty version is treated as absent.
    pub fn with_version(name: impl Into<String>, version: impl Into<String>) -> Result<Self, HeaderError> {
        let mut product = Self::new(name)?;
        let version = version.into();
        if !version.is_empty() {
            check_valid_token(&version, "version")?;
            product.version = Some(version);
        }
        Ok(product)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn parse(input: &str) -> Result<Self, HeaderError> {
        parse_single(input, Self::product_length)
    }

    pub fn try_parse(input: &str) -> Option<Self> {
        try_parse_single(input, Self::product_length)
    }

    pub(crate) fn product_length(input: &str, start: usize) -> Option<(usize, Self)> {
        let bytes = input.as_bytes();
        if start >= bytes.len() {
            return None;
        }
        let name_len = token_length(input, start);
        if name_len == 0 {
            return None;
        }
        let name = input[start..start + name_len].to_string();
        let mut current = start + name_len;
        current += whitespace_length(input, current);
        if current == bytes.len() || bytes[current] != b'/' {
            return Some((current - start, Self { name, version: None }));
        }
        current += 1;
        current += whitespace_length(input, current);
        let version_len = token_length(input, current);
        if version_len == 0 {
            return None;
        }
        let version = input[current..current + version_len].to_string();
        current += version_len;
        current += whitespace_length(input, current);
        Some((current - start, Self { name, version: Some(version) }))
    }
}

impl PartialEq for Product {
    fn eq(&self, other: &Self) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
            && match (&self.version, &other.version) {
                (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
                (None, None) => true,
                _ => false,
            }
    }
}

impl Eq for Product {}

impl Hash for Product {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.to_ascii_lowercase().hash(state);
        self.version.as_ref().map(|v| v.to_ascii_lowercase()).hash(state);
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{}/{}", self.name, v),
            None => f.write_str(&self.name),
        }
    }
}

/// One element of a `User-Agent` or `Server` header: a product or a parenthesised comment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProductInfo {
    Product(Product),
    Comment(String),
}

impl ProductInfo {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Result<Self, HeaderError> {
        Product::with_version(name, version).map(ProductInfo::Product)
    }

    /// The comment must include its parentheses, e.g. `(compatible)`.
    pub fn comment(comment: impl Into<String>) -> Result<Self, HeaderError> {
        let comment = comment.into();
        check_valid_comment(&comment, "comment")?;
        Ok(ProductInfo::Comment(comment))
    }

    pub fn product(&self) -> Option<&Product> {
        match self {
            ProductInfo::Product(p) => Some(p),
            ProductInfo::Comment(_) => None,
        }
    }

    pub fn comment_text(&self) -> Option<&str> {
        match self {
            ProductInfo::Product(_) => None,
            ProductInfo::Comment(c) => Some(c),
        }
    }

    pub fn parse(input: &str) -> Result<Self, HeaderError> {
        Self::try_parse(input).ok_or_else(|| HeaderError::invalid_value(input))
    }

    /// Exactly one product or comment, with optional surrounding whitespace.
    pub fn try_parse(input: &str) -> Option<Self> {
        let start = whitespace_length(input, 0);
        let (len, value) = Self::product_info_length(input, start)?;
        let end = start + len;
        (end + whitespace_length(input, end) == input.len()).then_some(value)
    }

    pub(crate) fn product_info_length(input: &str, start: usize) -> Option<(usize, Self)> {
        let bytes = input.as_bytes();
        if start >= bytes.len() {
            return None;
        }
        if bytes[start] == b'(' {
            let ParseResult::Parsed(len) = comment_length(input, start) else {
                return None;
            };
            let comment = input[start..start + len].to_string();
            let mut current = start + len;
            current += whitespace_length(input, current);
            return Some((current - start, ProductInfo::Comment(comment)));
        }
        Product::product_length(input, start).map(|(len, p)| (len, ProductInfo::Product(p)))
    }
}

impl From<Product> for ProductInfo {
    fn from(value: Product) -> Self {
        ProductInfo::Product(value)
    }
}

impl fmt::Display for ProductInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductInfo::Product(p) => p.fmt(f),
            ProductInfo::Comment(c) => f.write_str(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_with_version() {
        let p = Product::parse("Mozilla / 5.0").unwrap();
        assert_eq!(p.name(), "Mozilla");
        assert_eq!(p.version(), Some("5.0"));
        assert_eq!(p.to_string(), "Mozilla/5.0");
        assert!(Product::try_parse("Mozilla/").is_none());
        assert!(Product::try_parse("a b").is_none());
    }

    #[test]
    fn empty_version_is_absent() {
        let p = Product::with_version("curl", "").unwrap();
        assert_eq!(p.version(), None);
        assert_eq!(p, Product::new("CURL").unwrap());
    }

    #[test]
    fn product_info_comment() {
        let c = ProductInfo::parse("(Windows NT 10.0; (nested))").unwrap();
        assert_eq!(c.comment_text(), Some("(Windows NT 10.0; (nested))"));
        assert!(matches!(ProductInfo::comment("no parens"), Err(HeaderError::Format(_))));
        assert!(ProductInfo::try_parse("a/1 b/2").is_none());
        assert_eq!(ProductInfo::parse(" a/1 ").unwrap(), ProductInfo::new("a", "1").unwrap());
    }

    #[test]
    fn comments_compare_ordinally() {
        assert_ne!(ProductInfo::comment("(A)").unwrap(), ProductInfo::comment("(a)").unwrap());
    }
}
