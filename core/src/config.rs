/*
 * config.rs
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

//! Client configuration stored as XML.
//!
//! ```xml
//! <client>
//!   <timeout-ms>100000</timeout-ms>
//!   <max-response-content-buffer-size>2147483647</max-response-content-buffer-size>
//!   <base-address>http://example.com/</base-address>
//!   <default-header name="Accept">text/html</default-header>
//! </client>
//! ```
//!
//! `timeout-ms` also accepts `infinite`. Unknown elements are skipped. Reading and writing go
//! through the quick_xml reader and writer.

use std::fs;
use std::path::Path;
use std::time::Duration;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;
use thiserror::Error;

use crate::error::HttpError;
use crate::http::{HttpClient, DEFAULT_TIMEOUT, MAX_BUFFER_SIZE};
use crate::uri::Uri;

const ROOT: &[u8] = b"client";
const TIMEOUT: &[u8] = b"timeout-ms";
const MAX_BUFFER: &[u8] = b"max-response-content-buffer-size";
const BASE_ADDRESS: &[u8] = b"base-address";
const DEFAULT_HEADER: &[u8] = b"default-header";
const INFINITE: &str = "infinite";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("XML error: {0}")]
    Xml(String),
    #[error("invalid value for <{element}>: '{value}'")]
    InvalidValue { element: &'static str, value: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Settings applied to an [`HttpClient`] before its first request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// `None` is an infinite timeout.
    pub timeout: Option<Duration>,
    pub max_response_content_buffer_size: u64,
    pub base_address: Option<String>,
    /// Name and value of each default request header, in document order.
    pub default_headers: Vec<(String, String)>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Some(DEFAULT_TIMEOUT),
            max_response_content_buffer_size: MAX_BUFFER_SIZE,
            base_address: None,
            default_headers: Vec::new(),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Field {
    Timeout,
    MaxBuffer,
    BaseAddress,
    DefaultHeader,
}

impl ClientConfig {
    pub fn from_xml(content: &str) -> Result<Self, ConfigError> {
        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(true);
        let mut config = ClientConfig::default();
        let mut field: Option<Field> = None;
        let mut header_name = String::new();
        let mut in_root = false;

        loop {
            match reader.read_event() {
                Err(e) => return Err(ConfigError::Xml(e.to_string())),
                Ok(Event::Eof) => break,
                Ok(Event::Start(e)) => {
                    let name = e.name();
                    let name = name.as_ref();
                    if name == ROOT {
                        in_root = true;
                    } else if in_root {
                        field = match name {
                            TIMEOUT => Some(Field::Timeout),
                            MAX_BUFFER => Some(Field::MaxBuffer),
                            BASE_ADDRESS => Some(Field::BaseAddress),
                            DEFAULT_HEADER => {
                                header_name = header_name_attribute(&e)?;
                                Some(Field::DefaultHeader)
                            }
                            _ => None,
                        };
                    }
                }
                Ok(Event::Empty(e)) => {
                    if in_root && e.name().as_ref() == DEFAULT_HEADER {
                        config.default_headers.push((header_name_attribute(&e)?, String::new()));
                    }
                }
                Ok(Event::Text(e)) => {
                    let Some(current) = field else {
                        continue;
                    };
                    let text = e.unescape().map_err(xml_error)?.trim().to_string();
                    match current {
                        Field::Timeout => config.timeout = parse_timeout(&text)?,
                        Field::MaxBuffer => {
                            config.max_response_content_buffer_size = text.parse().map_err(|_| {
                                ConfigError::InvalidValue { element: "max-response-content-buffer-size", value: text.clone() }
                            })?
                        }
                        Field::BaseAddress => config.base_address = Some(text),
                        Field::DefaultHeader => {
                            config.default_headers.push((std::mem::take(&mut header_name), text))
                        }
                    }
                    field = None;
                }
                Ok(Event::End(e)) => {
                    if e.name().as_ref() == ROOT {
                        in_root = false;
                    }
                    field = None;
                }
                _ => {}
            }
        }
        Ok(config)
    }

    pub fn to_xml(&self) -> Result<String, ConfigError> {
        let mut out = Vec::new();
        let mut writer = Writer::new_with_indent(&mut out, b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_error)?;
        writer.write_event(Event::Start(BytesStart::new("client"))).map_err(xml_error)?;
        let timeout = match self.timeout {
            Some(t) => t.as_millis().to_string(),
            None => INFINITE.to_string(),
        };
        writer
            .create_element("timeout-ms")
            .write_text_content(BytesText::new(&timeout))
            .map_err(xml_error)?;
        writer
            .create_element("max-response-content-buffer-size")
            .write_text_content(BytesText::new(&self.max_response_content_buffer_size.to_string()))
            .map_err(xml_error)?;
        if let Some(base) = &self.base_address {
            writer
                .create_element("base-address")
                .write_text_content(BytesText::new(base))
                .map_err(xml_error)?;
        }
        for (name, value) in &self.default_headers {
            writer
                .create_element("default-header")
                .with_attribute(("name", name.as_str()))
                .write_text_content(BytesText::new(value))
                .map_err(xml_error)?;
        }
        writer.write_event(Event::End(BytesEnd::new("client"))).map_err(xml_error)?;
        String::from_utf8(out).map_err(xml_error)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_xml(&content)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_xml()?)?;
        Ok(())
    }

    /// Applies every setting to `client`. Fails once the client has sent a request.
    pub fn apply_to(&self, client: &mut HttpClient) -> Result<(), HttpError> {
        client.set_timeout(self.timeout)?;
        client.set_max_response_content_buffer_size(self.max_response_content_buffer_size)?;
        if let Some(base) = &self.base_address {
            client.set_base_address(Some(Uri::parse_absolute(base)?))?;
        }
        for (name, value) in &self.default_headers {
            client.default_request_headers_mut().add(name, value)?;
        }
        Ok(())
    }
}

fn xml_error<E: std::fmt::Display>(e: E) -> ConfigError {
    ConfigError::Xml(e.to_string())
}

fn header_name_attribute(e: &BytesStart<'_>) -> Result<String, ConfigError> {
    let attr = e
        .try_get_attribute("name")
        .map_err(xml_error)?
        .ok_or_else(|| ConfigError::InvalidValue { element: "default-header", value: String::new() })?;
    let value = attr.unescape_value().map_err(xml_error)?;
    Ok(value.into_owned())
}

fn parse_timeout(text: &str) -> Result<Option<Duration>, ConfigError> {
    if text.eq_ignore_ascii_case(INFINITE) {
        return Ok(None);
    }
    text.parse::<u64>()
        .map(|ms| Some(Duration::from_millis(ms)))
        .map_err(|_| ConfigError::InvalidValue { element: "timeout-ms", value: text.to_string() })
}
