/*
 * request.rs
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

//! Outgoing request messages.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use super::{write_header_block, HttpContent, HttpMethod, HttpVersion};
use crate::error::HttpError;
use crate::headers::RequestHeaders;
use crate::uri::Uri;

/// A request: method, target, headers, optional body and caller-defined properties.
///
/// A message can be sent once; a second send is refused.
#[derive(Debug, Default)]
pub struct HttpRequestMessage {
    method: HttpMethod,
    uri: Option<Uri>,
    version: HttpVersion,
    headers: RequestHeaders,
    content: Option<HttpContent>,
    properties: HashMap<String, String>,
    sent: AtomicBool,
}

impl HttpRequestMessage {
    /// A request for `uri`, which may be relative to the client's base address.
    pub fn new(method: HttpMethod, uri: &str) -> Result<Self, HttpError> {
        let mut request = Self { method, ..Self::default() };
        request.set_uri(Some(Uri::parse(uri)?))?;
        Ok(request)
    }

    pub fn method(&self) -> &HttpMethod {
        &self.method
    }

    pub fn set_method(&mut self, method: HttpMethod) -> Result<(), HttpError> {
        self.check_not_sent()?;
        self.method = method;
        Ok(())
    }

    pub fn uri(&self) -> Option<&Uri> {
        self.uri.as_ref()
    }

    /// Absolute targets must be `http` or `https`.
    pub fn set_uri(&mut self, uri: Option<Uri>) -> Result<(), HttpError> {
        self.check_not_sent()?;
        if let Some(u) = &uri {
            if u.is_absolute() && !u.is_http() {
                return Err(HttpError::Argument("Only 'http' and 'https' schemes are allowed.".to_string()));
            }
        }
        self.uri = uri;
        Ok(())
    }

    /// Used by the client once the target is resolved; skips the sent check.
    pub(crate) fn replace_uri(&mut self, uri: Uri) {
        self.uri = Some(uri);
    }

    pub fn version(&self) -> HttpVersion {
        self.version
    }

    pub fn set_version(&mut self, version: HttpVersion) {
        self.version = version;
    }

    pub fn headers(&self) -> &RequestHeaders {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut RequestHeaders {
        &mut self.headers
    }

    pub fn content(&self) -> Option<&HttpContent> {
        self.content.as_ref()
    }

    pub fn content_mut(&mut self) -> Option<&mut HttpContent> {
        self.content.as_mut()
    }

    pub fn set_content(&mut self, content: Option<HttpContent>) {
        self.content = content;
    }

    pub fn take_content(&mut self) -> Option<HttpContent> {
        self.content.take()
    }

    pub fn properties(&self) -> &HashMap<String, String> {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut HashMap<String, String> {
        &mut self.properties
    }

    pub fn is_sent(&self) -> bool {
        self.sent.load(Ordering::Acquire)
    }

    /// Marks the message sent; false if it already was.
    pub(crate) fn mark_as_sent(&self) -> bool {
        self.sent
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn check_not_sent(&self) -> Result<(), HttpError> {
        if self.is_sent() {
            return Err(HttpError::InvalidOperation(
                "This instance has already started one or more requests. Properties can only be modified before sending the first request.".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for HttpRequestMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Method: {}, RequestUri: ", self.method)?;
        match &self.uri {
            Some(u) => write!(f, "'{}'", u)?,
            None => f.write_str("'<null>'")?,
        }
        write!(f, ", Version: {}, Content: ", self.version)?;
        let mut blocks = vec![self.headers.to_string()];
        match &self.content {
            Some(content) => {
                f.write_str("HttpContent")?;
                blocks.push(content.headers().to_string());
            }
            None => f.write_str("<null>")?,
        }
        f.write_str(", ")?;
        write_header_block(f, &blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_must_be_http() {
        assert!(HttpRequestMessage::new(HttpMethod::GET, "https://example.com/").is_ok());
        assert!(HttpRequestMessage::new(HttpMethod::GET, "/relative").is_ok());
        assert!(matches!(
            HttpRequestMessage::new(HttpMethod::GET, "ftp://example.com/"),
            Err(HttpError::Argument(_))
        ));
    }

    #[test]
    fn sent_once() {
        let mut request = HttpRequestMessage::new(HttpMethod::GET, "http://example.com/").unwrap();
        assert!(request.mark_as_sent());
        assert!(!request.mark_as_sent());
        assert!(matches!(request.set_method(HttpMethod::POST), Err(HttpError::InvalidOperation(_))));
    }

    #[test]
    fn display_lists_headers() {
        let mut request = HttpRequestMessage::new(HttpMethod::GET, "http://example.com/a").unwrap();
        request.headers_mut().add("Accept", "text/html").unwrap();
        assert_eq!(
            request.to_string(),
            "Method: GET, RequestUri: 'http://example.com/a', Version: 1.1, Content: <null>, Headers:\r\n{\r\n  Accept: text/html\r\n}"
        );
        request.set_content(Some(HttpContent::from_string("x")));
        assert!(request.to_string().contains("Content: HttpContent, Headers:\r\n{\r\n  Accept: text/html\r\n  Content-Type: text/plain; charset=utf-8\r\n}"));
    }
}
