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

//! Send pipeline: messages, bodies, handler chains and the client front end.
//!
//! Nothing here touches the network. A [`MessageHandler`] at the end of the chain turns a
//! request into a response; the client adds base-address resolution, default headers,
//! timeouts, cancellation and response buffering around it.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

mod client;
mod content;
mod handler;
mod method;
mod request;
mod response;

pub use client::{CompletionOption, HttpClient, DEFAULT_TIMEOUT};
pub use content::{BoxReader, HttpContent, MAX_BUFFER_SIZE};
pub use handler::{DelegatingHandler, MessageHandler, MessageProcessingHandler, MessageProcessor};
pub use method::HttpMethod;
pub use request::HttpRequestMessage;
pub use response::HttpResponseMessage;

/// Boxed `Send` future, used where a trait or recursive call needs a nameable future type.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Protocol version carried on messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HttpVersion {
    pub major: u8,
    pub minor: u8,
}

impl HttpVersion {
    pub const HTTP_1_0: HttpVersion = HttpVersion { major: 1, minor: 0 };
    pub const HTTP_1_1: HttpVersion = HttpVersion { major: 1, minor: 1 };
    pub const HTTP_2: HttpVersion = HttpVersion { major: 2, minor: 0 };
}

impl Default for HttpVersion {
    fn default() -> Self {
        HttpVersion::HTTP_1_1
    }
}

impl fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Writes the `Headers:` block shared by request and response `Display`.
pub(crate) fn write_header_block(f: &mut fmt::Formatter<'_>, blocks: &[String]) -> fmt::Result {
    f.write_str("Headers:\r\n{\r\n")?;
    for line in blocks.iter().flat_map(|b| b.lines()) {
        write!(f, "  {}\r\n", line)?;
    }
    f.write_str("}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_defaults_and_formats() {
        assert_eq!(HttpVersion::default(), HttpVersion::HTTP_1_1);
        assert_eq!(HttpVersion::HTTP_2.to_string(), "2.0");
        assert!(HttpVersion::HTTP_1_0 < HttpVersion::HTTP_1_1);
    }
}
