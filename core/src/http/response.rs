/*
 * response.rs
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

//! Response messages.

use std::fmt;

use super::{write_header_block, HttpContent, HttpRequestMessage, HttpVersion};
use crate::error::{HeaderError, HttpError};
use crate::headers::ResponseHeaders;

/// A response: status, reason phrase, headers, optional body and the request that produced it.
#[derive(Debug)]
pub struct HttpResponseMessage {
    status_code: u16,
    reason_phrase: Option<String>,
    version: HttpVersion,
    headers: ResponseHeaders,
    content: Option<HttpContent>,
    request: Option<HttpRequestMessage>,
}

impl HttpResponseMessage {
    /// Status codes run from 0 to 999.
    pub fn new(status_code: u16) -> Result<Self, HttpError> {
        check_status(status_code)?;
        Ok(Self {
            status_code,
            reason_phrase: None,
            version: HttpVersion::default(),
            headers: ResponseHeaders::new(),
            content: None,
            request: None,
        })
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn set_status_code(&mut self, status_code: u16) -> Result<(), HttpError> {
        check_status(status_code)?;
        self.status_code = status_code;
        Ok(())
    }

    /// The explicit phrase, else the standard description of the status code.
    pub fn reason_phrase(&self) -> Option<&str> {
        self.reason_phrase.as_deref().or_else(|| status_description(self.status_code))
    }

    pub fn set_reason_phrase(&mut self, reason_phrase: Option<&str>) -> Result<(), HttpError> {
        if let Some(phrase) = reason_phrase {
            if phrase.contains(['\r', '\n']) {
                return Err(HeaderError::Format("The reason phrase must not contain new-line characters.".to_string()).into());
            }
        }
        self.reason_phrase = reason_phrase.map(str::to_string);
        Ok(())
    }

    pub fn version(&self) -> HttpVersion {
        self.version
    }

    pub fn set_version(&mut self, version: HttpVersion) {
        self.version = version;
    }

    pub fn headers(&self) -> &ResponseHeaders {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut ResponseHeaders {
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

    pub fn request(&self) -> Option<&HttpRequestMessage> {
        self.request.as_ref()
    }

    pub fn set_request(&mut self, request: Option<HttpRequestMessage>) {
        self.request = request;
    }

    pub fn take_request(&mut self) -> Option<HttpRequestMessage> {
        self.request.take()
    }

    pub fn is_success_status_code(&self) -> bool {
        (200..=299).contains(&self.status_code)
    }

    pub fn ensure_success_status_code(&self) -> Result<&Self, HttpError> {
        if self.is_success_status_code() {
            return Ok(self);
        }
        Err(HttpError::Request(format!(
            "Response status code does not indicate success: {} ({}).",
            self.status_code,
            self.reason_phrase().unwrap_or_default()
        )))
    }
}

impl fmt::Display for HttpResponseMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StatusCode: {}, ReasonPhrase: '{}', Version: {}, Content: ",
            self.status_code,
            self.reason_phrase().unwrap_or("<null>"),
            self.version
        )?;
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

fn check_status(status_code: u16) -> Result<(), HttpError> {
    if status_code > 999 {
        return Err(HttpError::ArgumentOutOfRange(format!("status_code: {}", status_code)));
    }
    Ok(())
}

fn status_description(code: u16) -> Option<&'static str> {
    Some(match code {
        100 => "Continue",
        101 => "Switching Protocols",
        102 => "Processing",
        103 => "Early Hints",
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        203 => "Non-Authoritative Information",
        204 => "No Content",
        205 => "Reset Content",
        206 => "Partial Content",
        207 => "Multi-Status",
        208 => "Already Reported",
        226 => "IM Used",
        300 => "Multiple Choices",
        301 => "Moved Permanently",
        302 => "Found",
        303 => "See Other",
        304 => "Not Modified",
        305 => "Use Proxy",
        307 => "Temporary Redirect",
        308 => "Permanent Redirect",
        400 => "Bad Request",
        401 => "Unauthorized",
        402 => "Payment Required",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        406 => "Not Acceptable",
        407 => "Proxy Authentication Required",
        408 => "Request Timeout",
        409 => "Conflict",
        410 => "Gone",
        411 => "Length Required",
        412 => "Precondition Failed",
        413 => "Request Entity Too Large",
        414 => "Request-Uri Too Long",
        415 => "Unsupported Media Type",
        416 => "Requested Range Not Satisfiable",
        417 => "Expectation Failed",
        421 => "Misdirected Request",
        422 => "Unprocessable Entity",
        423 => "Locked",
        424 => "Failed Dependency",
        426 => "Upgrade Required",
        428 => "Precondition Required",
        429 => "Too Many Requests",
        431 => "Request Header Fields Too Large",
        451 => "Unavailable For Legal Reasons",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        505 => "Http Version Not Supported",
        506 => "Variant Also Negotiates",
        507 => "Insufficient Storage",
        508 => "Loop Detected",
        510 => "Not Extended",
        511 => "Network Authentication Required",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_range() {
        assert!(HttpResponseMessage::new(0).is_ok());
        assert!(HttpResponseMessage::new(999).is_ok());
        assert!(matches!(HttpResponseMessage::new(1000), Err(HttpError::ArgumentOutOfRange(_))));
    }

    #[test]
    fn reason_phrase_defaults_and_validates() {
        let mut response = HttpResponseMessage::new(404).unwrap();
        assert_eq!(response.reason_phrase(), Some("Not Found"));
        response.set_reason_phrase(Some("Nope")).unwrap();
        assert_eq!(response.reason_phrase(), Some("Nope"));
        assert!(response.set_reason_phrase(Some("a\r\nb")).is_err());
        assert_eq!(HttpResponseMessage::new(799).unwrap().reason_phrase(), None);
    }

    #[test]
    fn success_check() {
        let ok = HttpResponseMessage::new(204).unwrap();
        assert!(ok.ensure_success_status_code().is_ok());
        let missing = HttpResponseMessage::new(404).unwrap();
        let err = missing.ensure_success_status_code().unwrap_err();
        assert_eq!(err.to_string(), "Response status code does not indicate success: 404 (Not Found).");
    }

    #[test]
    fn display_format() {
        let mut response = HttpResponseMessage::new(200).unwrap();
        response.headers_mut().add("Server", "test/1.0").unwrap();
        assert_eq!(
            response.to_string(),
            "StatusCode: 200, ReasonPhrase: 'OK', Version: 1.1, Content: <null>, Headers:\r\n{\r\n  Server: test/1.0\r\n}"
        );
    }
}
