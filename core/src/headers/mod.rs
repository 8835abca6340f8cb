/*
 * mod.rs
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

//! HTTP header parsing and typed header storage.
//!
//! Layers, bottom up: grammar scanners ([`rules`]), typed values ([`values`]), parser
//! strategies chosen per header name by a [`ParserRegistry`], the generic [`HttpHeaders`]
//! store, and the typed groups [`RequestHeaders`], [`ResponseHeaders`] and [`ContentHeaders`].

pub mod date;
pub mod names;
pub mod rules;
pub mod values;

mod content;
mod encoding;
mod general;
mod parser;
mod registry;
mod request;
mod response;
mod store;
mod utilities;
mod value_collection;

pub use content::ContentHeaders;
pub use general::{GeneralHeaders, SpecialFlags};
pub use parser::{HeaderParser, Parsed};
pub use registry::{HeaderRegistries, ParserRegistry};
pub use request::RequestHeaders;
pub use response::ResponseHeaders;
pub use store::HttpHeaders;
pub use value_collection::HeaderValueCollection;
pub use values::{HeaderValue, TypedValue};
