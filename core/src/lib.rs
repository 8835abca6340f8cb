/*
 * lib.rs
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

//! Intestazioni core: typed HTTP header parsing and storage, request and response messages,
//! content bodies, and an async handler pipeline behind a small client.
//!
//! The header layer validates and parses values lazily, keeps malformed values it cannot parse
//! so they round-trip, and exposes typed accessors per header group. The send pipeline carries
//! no transport of its own; callers supply a [`http::MessageHandler`].

pub mod config;
pub mod error;
pub mod headers;
pub mod http;
pub mod uri;

pub use config::{ClientConfig, ConfigError};
pub use error::{HeaderError, HttpError};
pub use headers::{ContentHeaders, HttpHeaders, RequestHeaders, ResponseHeaders};
pub use http::{HttpClient, HttpContent, HttpMethod, HttpRequestMessage, HttpResponseMessage};
pub use uri::Uri;
