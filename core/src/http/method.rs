/*
 * method.rs
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

//! Request methods.

use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::HeaderError;
use crate::headers::rules::is_token;

/// An HTTP request method: any token. Comparison ignores case.
#[derive(Debug, Clone)]
pub struct HttpMethod(Cow<'static, str>);

impl HttpMethod {
    pub const GET: HttpMethod = HttpMethod(Cow::Borrowed("GET"));
    pub const PUT: HttpMethod = HttpMethod(Cow::Borrowed("PUT"));
    pub const POST: HttpMethod = HttpMethod(Cow::Borrowed("POST"));
    pub const DELETE: HttpMethod = HttpMethod(Cow::Borrowed("DELETE"));
    pub const HEAD: HttpMethod = HttpMethod(Cow::Borrowed("HEAD"));
    pub const OPTIONS: HttpMethod = HttpMethod(Cow::Borrowed("OPTIONS"));
    pub const TRACE: HttpMethod = HttpMethod(Cow::Borrowed("TRACE"));

    pub fn new(method: impl Into<String>) -> Result<Self, HeaderError> {
        let method = method.into();
        if method.is_empty() {
            return Err(HeaderError::empty("method"));
        }
        if !is_token(&method) {
            return Err(HeaderError::Format("The format of the HTTP method is invalid.".to_string()));
        }
        Ok(HttpMethod(Cow::Owned(method)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for HttpMethod {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for HttpMethod {}

impl Hash for HttpMethod {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.0.bytes() {
            state.write_u8(b.to_ascii_uppercase());
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Default for HttpMethod {
    fn default() -> Self {
        HttpMethod::GET
    }
}
