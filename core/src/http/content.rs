/*
 * content.rs
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

//! Message bodies and their content headers.
//!
//! A body is held as bytes, as a one-shot async reader, or as a list of multipart parts.
//! Reading it as bytes or text buffers it first, up to a caller-chosen limit; once buffered,
//! every later read is served from the buffer.

use std::io::{self, Cursor};
use std::pin::Pin;
use std::sync::{Mutex, PoisonError};
use std::task::{Context, Poll};

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use super::BoxFuture;
use crate::error::{HeaderError, HttpError};
use crate::headers::values::{ContentDisposition, MediaType, NameValue};
use crate::headers::ContentHeaders;
use crate::uri::form_encode;

/// Largest body that can be buffered.
pub const MAX_BUFFER_SIZE: u64 = i32::MAX as u64;

const DEFAULT_STREAM_BUFFER_SIZE: usize = 4096;
/// Upper bound on preallocation from a declared length; the buffer grows past it as bytes arrive.
const INITIAL_BUFFER_CAPACITY: usize = 64 * 1024;
const MAX_BOUNDARY_LENGTH: usize = 70;
const BOUNDARY_SPECIALS: &str = "'()+_,-./:=? ";

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF32LE_BOM: &[u8] = &[0xFF, 0xFE, 0x00, 0x00];
const UTF16LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16BE_BOM: &[u8] = &[0xFE, 0xFF];

/// A readable body stream.
pub type BoxReader = Box<dyn AsyncRead + Send + Unpin>;

enum Body {
    Bytes(Bytes),
    /// Taken on first serialization.
    Stream { reader: Mutex<Option<BoxReader>>, buffer_size: usize },
    Multipart { boundary: String, form_data: bool, parts: Vec<HttpContent> },
}

/// A message body plus its content headers.
pub struct HttpContent {
    headers: ContentHeaders,
    body: Body,
    buffered: Option<Bytes>,
}

impl HttpContent {
    fn with_body(body: Body) -> Self {
        Self { headers: ContentHeaders::new(), body, buffered: None }
    }

    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Self::with_body(Body::Bytes(bytes.into()))
    }

    /// UTF-8 text with `Content-Type: text/plain; charset=utf-8`.
    pub fn from_string(text: impl Into<String>) -> Self {
        let text: String = text.into();
        let mut content = Self::from_bytes(text.into_bytes());
        content
            .headers
            .set_content_type(Some(MediaType::new_unchecked("text/plain", Some("utf-8"))));
        content
    }

    /// UTF-8 text with the given media type and `charset=utf-8`.
    pub fn from_string_with_media_type(text: impl Into<String>, media_type: &str) -> Result<Self, HeaderError> {
        let mut media_type = MediaType::new(media_type)?;
        media_type.set_charset(Some("utf-8"))?;
        let text: String = text.into();
        let mut content = Self::from_bytes(text.into_bytes());
        content.headers.set_content_type(Some(media_type));
        Ok(content)
    }

    /// `application/x-www-form-urlencoded` name/value pairs.
    pub fn form_url_encoded<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let body = pairs
            .into_iter()
            .map(|(k, v)| format!("{}={}", form_encode(k.as_ref()), form_encode(v.as_ref())))
            .collect::<Vec<_>>()
            .join("&");
        let mut content = Self::from_bytes(body.into_bytes());
        content
            .headers
            .set_content_type(Some(MediaType::new_unchecked("application/x-www-form-urlencoded", None)));
        content
    }

    /// A body read from `reader` when first serialized. The stream can be consumed only once
    /// unless the content is buffered.
    pub fn from_stream(reader: impl AsyncRead + Send + Unpin + 'static) -> Self {
        Self::with_body(Body::Stream {
            reader: Mutex::new(Some(Box::new(reader))),
            buffer_size: DEFAULT_STREAM_BUFFER_SIZE,
        })
    }

    pub fn from_stream_with_buffer_size(
        reader: impl AsyncRead + Send + Unpin + 'static,
        buffer_size: usize,
    ) -> Result<Self, HttpError> {
        if buffer_size == 0 {
            return Err(HttpError::ArgumentOutOfRange("buffer_size".to_string()));
        }
        Ok(Self::with_body(Body::Stream { reader: Mutex::new(Some(Box::new(reader))), buffer_size }))
    }

    /// `multipart/<subtype>` with a random boundary.
    pub fn multipart(subtype: &str) -> Result<Self, HttpError> {
        Self::multipart_with_boundary(subtype, &default_boundary()?)
    }

    pub fn multipart_with_boundary(subtype: &str, boundary: &str) -> Result<Self, HttpError> {
        if subtype.trim().is_empty() {
            return Err(HeaderError::empty("subtype").into());
        }
        Self::new_multipart(subtype, boundary, false)
    }

    /// `multipart/form-data` with a random boundary.
    pub fn form_data() -> Result<Self, HttpError> {
        Self::new_multipart("form-data", &default_boundary()?, true)
    }

    pub fn form_data_with_boundary(boundary: &str) -> Result<Self, HttpError> {
        Self::new_multipart("form-data", boundary, true)
    }

    fn new_multipart(subtype: &str, boundary: &str, form_data: bool) -> Result<Self, HttpError> {
        validate_boundary(boundary)?;
        let mut media_type = MediaType::new(format!("multipart/{}", subtype))?;
        media_type
            .parameters_mut()
            .push(NameValue::with_value("boundary", format!("\"{}\"", boundary))?);
        let mut content = Self::with_body(Body::Multipart { boundary: boundary.to_string(), form_data, parts: Vec::new() });
        content.headers.set_content_type(Some(media_type));
        Ok(content)
    }

    pub fn headers(&self) -> &ContentHeaders {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut ContentHeaders {
        &mut self.headers
    }

    pub fn is_multipart(&self) -> bool {
        matches!(self.body, Body::Multipart { .. })
    }

    pub fn is_buffered(&self) -> bool {
        self.buffered.is_some()
    }

    /// The nested parts of a multipart body; empty for any other body.
    pub fn parts(&self) -> &[HttpContent] {
        match &self.body {
            Body::Multipart { parts, .. } => parts,
            _ => &[],
        }
    }

    /// Appends a part to a multipart body. Form-data parts without a `Content-Disposition` get
    /// `form-data`.
    pub fn add_part(&mut self, mut part: HttpContent) -> Result<(), HttpError> {
        let Body::Multipart { form_data, parts, .. } = &mut self.body else {
            return Err(HttpError::InvalidOperation("Content is not multipart.".to_string()));
        };
        if *form_data && part.headers.content_disposition().is_none() {
            part.headers
                .set_content_disposition(Some(ContentDisposition::new("form-data")?));
        }
        parts.push(part);
        Ok(())
    }

    /// Adds a form field named `name`.
    pub fn add_form_field(&mut self, part: HttpContent, name: &str) -> Result<(), HttpError> {
        if name.trim().is_empty() {
            return Err(HeaderError::empty("name").into());
        }
        self.add_form_part(part, name, None)
    }

    /// Adds a file named `file_name` under the form field `name`.
    pub fn add_form_file(&mut self, part: HttpContent, name: &str, file_name: &str) -> Result<(), HttpError> {
        if name.trim().is_empty() {
            return Err(HeaderError::empty("name").into());
        }
        if file_name.trim().is_empty() {
            return Err(HeaderError::empty("file_name").into());
        }
        self.add_form_part(part, name, Some(file_name))
    }

    fn add_form_part(&mut self, mut part: HttpContent, name: &str, file_name: Option<&str>) -> Result<(), HttpError> {
        if !matches!(self.body, Body::Multipart { form_data: true, .. }) {
            return Err(HttpError::InvalidOperation("Content is not multipart/form-data.".to_string()));
        }
        if part.headers.content_disposition().is_none() {
            let mut disposition = ContentDisposition::new("form-data")?;
            disposition.set_name(Some(name))?;
            disposition.set_file_name(file_name)?;
            disposition.set_file_name_star(file_name)?;
            part.headers.set_content_disposition(Some(disposition));
        }
        self.add_part(part)
    }

    /// Length of the serialized body, if it can be known without reading it.
    pub fn compute_length(&self) -> Option<i64> {
        if let Some(buffered) = &self.buffered {
            return i64::try_from(buffered.len()).ok();
        }
        match &self.body {
            Body::Bytes(b) => i64::try_from(b.len()).ok(),
            Body::Stream { .. } => None,
            Body::Multipart { boundary, parts, .. } => {
                let mut total = format!("--{}\r\n", boundary).len() as i64;
                let separator = format!("\r\n--{}\r\n", boundary).len() as i64;
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        total += separator;
                    }
                    total += part_header_block(part).len() as i64;
                    total += part.compute_length()?;
                }
                total += format!("\r\n--{}--\r\n", boundary).len() as i64;
                Some(total)
            }
        }
    }

    /// The `Content-Length` header, computed and stored when not yet present.
    pub fn content_length(&mut self) -> Option<i64> {
        let computed = self.compute_length();
        self.headers.materialize_length(move || computed)
    }

    /// Serializes the body into memory, failing when it exceeds `max_buffer_size` bytes.
    pub async fn load_into_buffer(&mut self, max_buffer_size: u64) -> Result<(), HttpError> {
        if max_buffer_size > MAX_BUFFER_SIZE {
            return Err(HttpError::ArgumentOutOfRange(format!(
                "max_buffer_size: buffering more than {} bytes is not supported",
                MAX_BUFFER_SIZE
            )));
        }
        if self.buffered.is_some() {
            return Ok(());
        }
        let limit = max_buffer_size as usize;
        let capacity = match self.content_length() {
            Some(len) if len as u64 > max_buffer_size => return Err(buffer_exceeded(max_buffer_size)),
            Some(len) => initial_capacity(len),
            None => 0,
        };
        let mut buffer = LimitedBuffer { data: BytesMut::with_capacity(capacity), limit, exceeded: false };
        if let Err(e) = self.serialize_to(&mut buffer).await {
            return Err(if buffer.exceeded { buffer_exceeded(max_buffer_size) } else { e });
        }
        self.buffered = Some(buffer.data.freeze());
        Ok(())
    }

    pub async fn read_as_bytes(&mut self) -> Result<Bytes, HttpError> {
        self.load_into_buffer(MAX_BUFFER_SIZE).await?;
        Ok(self.buffered.clone().unwrap_or_default())
    }

    /// Decodes the body using the `Content-Type` charset, else a byte order mark, else UTF-8.
    pub async fn read_as_string(&mut self) -> Result<String, HttpError> {
        let bytes = self.read_as_bytes().await?;
        let charset = self.headers.content_type().and_then(|m| m.charset().map(str::to_string));
        decode_text(&bytes, charset.as_deref())
    }

    /// A reader over the body. Unbuffered streams are handed over directly.
    pub async fn read_as_stream(&mut self) -> Result<BoxReader, HttpError> {
        if self.buffered.is_none() && self.is_multipart() {
            self.load_into_buffer(MAX_BUFFER_SIZE).await?;
        }
        if let Some(buffered) = &self.buffered {
            return Ok(Box::new(Cursor::new(buffered.clone())));
        }
        match &mut self.body {
            Body::Bytes(b) => Ok(Box::new(Cursor::new(b.clone()))),
            Body::Stream { reader, .. } => take_reader(reader),
            Body::Multipart { .. } => Ok(Box::new(Cursor::new(Bytes::new()))),
        }
    }

    /// Writes the body to `writer`, from the buffer when there is one.
    pub async fn copy_to<W>(&mut self, writer: &mut W) -> Result<(), HttpError>
    where
        W: AsyncWrite + Send + Unpin,
    {
        self.copy_to_dyn(writer).await
    }

    fn copy_to_dyn<'a>(&'a mut self, writer: &'a mut (dyn AsyncWrite + Send + Unpin)) -> BoxFuture<'a, Result<(), HttpError>> {
        Box::pin(async move {
            if let Some(buffered) = self.buffered.clone() {
                writer.write_all(&buffered).await?;
                return Ok(());
            }
            self.serialize_to(writer).await
        })
    }

    fn serialize_to<'a>(&'a mut self, writer: &'a mut (dyn AsyncWrite + Send + Unpin)) -> BoxFuture<'a, Result<(), HttpError>> {
        Box::pin(async move {
            match &mut self.body {
                Body::Bytes(b) => writer.write_all(b).await?,
                Body::Stream { reader, buffer_size } => {
                    let reader = take_reader(reader)?;
                    let mut reader = BufReader::with_capacity(*buffer_size, reader);
                    tokio::io::copy_buf(&mut reader, &mut *writer).await?;
                }
                Body::Multipart { boundary, parts, .. } => {
                    writer.write_all(&latin1(&format!("--{}\r\n", boundary))).await?;
                    for (i, part) in parts.iter_mut().enumerate() {
                        let mut head = String::new();
                        if i > 0 {
                            head.push_str(&format!("\r\n--{}\r\n", boundary));
                        }
                        head.push_str(&part_header_block(part));
                        writer.write_all(&latin1(&head)).await?;
                        part.copy_to_dyn(&mut *writer).await?;
                    }
                    writer.write_all(&latin1(&format!("\r\n--{}--\r\n", boundary))).await?;
                }
            }
            Ok(())
        })
    }
}

impl std::fmt::Debug for HttpContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match &self.body {
            Body::Bytes(_) => "bytes",
            Body::Stream { .. } => "stream",
            Body::Multipart { .. } => "multipart",
        };
        f.debug_struct("HttpContent")
            .field("kind", &kind)
            .field("headers", &self.headers)
            .field("buffered", &self.buffered.as_ref().map(Bytes::len))
            .finish()
    }
}

fn take_reader(reader: &mut Mutex<Option<BoxReader>>) -> Result<BoxReader, HttpError> {
    reader
        .get_mut()
        .unwrap_or_else(PoisonError::into_inner)
        .take()
        .ok_or_else(|| HttpError::InvalidOperation("The stream was already consumed. It cannot be read again.".to_string()))
}

fn initial_capacity(declared: i64) -> usize {
    usize::try_from(declared).unwrap_or(0).min(INITIAL_BUFFER_CAPACITY)
}

fn buffer_exceeded(max: u64) -> HttpError {
    HttpError::Request(format!("Cannot write more bytes to the buffer than the configured maximum buffer size: {}.", max))
}

/// `Name: v1, v2\r\n` per stored header, then the blank line.
fn part_header_block(part: &HttpContent) -> String {
    let mut block = String::new();
    for (name, values) in part.headers.entries() {
        block.push_str(&format!("{}: {}\r\n", name, values.join(", ")));
    }
    block.push_str("\r\n");
    block
}

/// Header text on the wire is ISO-8859-1; anything wider becomes `?`.
fn latin1(text: &str) -> Vec<u8> {
    text.chars().map(|c| u8::try_from(c as u32).unwrap_or(b'?')).collect()
}

fn validate_boundary(boundary: &str) -> Result<(), HttpError> {
    if boundary.trim().is_empty() {
        return Err(HeaderError::empty("boundary").into());
    }
    if boundary.len() > MAX_BOUNDARY_LENGTH {
        return Err(HttpError::ArgumentOutOfRange(format!(
            "boundary: the field cannot be longer than {} characters",
            MAX_BOUNDARY_LENGTH
        )));
    }
    let valid = !boundary.ends_with(' ')
        && boundary.chars().all(|c| c.is_ascii_alphanumeric() || BOUNDARY_SPECIALS.contains(c));
    if !valid {
        return Err(HttpError::Argument(format!("The format of value '{}' is invalid.", boundary)));
    }
    Ok(())
}

/// A random version 4 UUID in its hyphenated form.
fn default_boundary() -> Result<String, HttpError> {
    let mut bytes = [0u8; 16];
    getrandom::getrandom(&mut bytes).map_err(|e| HttpError::Request(format!("getrandom: {}", e)))?;
    bytes[6] = (bytes[6] & 0x0F) | 0x40;
    bytes[8] = (bytes[8] & 0x3F) | 0x80;
    let mut out = String::with_capacity(36);
    for (i, b) in bytes.iter().enumerate() {
        if matches!(i, 4 | 6 | 8 | 10) {
            out.push('-');
        }
        out.push_str(&format!("{:02x}", b));
    }
    Ok(out)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum TextEncoding {
    Utf8,
    Ascii,
    Latin1,
    Utf16Le,
    Utf16Be,
    Utf32Le,
}

impl TextEncoding {
    fn from_charset(charset: &str) -> Option<Self> {
        let charset = charset.trim_matches('"').to_ascii_lowercase();
        Some(match charset.as_str() {
            "utf-8" | "utf8" => TextEncoding::Utf8,
            "us-ascii" | "ascii" => TextEncoding::Ascii,
            "iso-8859-1" | "latin1" | "latin-1" => TextEncoding::Latin1,
            "utf-16" | "utf-16le" | "unicode" => TextEncoding::Utf16Le,
            "utf-16be" | "unicodefffe" => TextEncoding::Utf16Be,
            "utf-32" | "utf-32le" => TextEncoding::Utf32Le,
            _ => return None,
        })
    }

    fn preamble(self) -> &'static [u8] {
        match self {
            TextEncoding::Utf8 => UTF8_BOM,
            TextEncoding::Utf16Le => UTF16LE_BOM,
            TextEncoding::Utf16Be => UTF16BE_BOM,
            TextEncoding::Utf32Le => UTF32LE_BOM,
            TextEncoding::Ascii | TextEncoding::Latin1 => &[],
        }
    }

    fn decode(self, bytes: &[u8]) -> String {
        match self {
            TextEncoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            TextEncoding::Ascii => bytes.iter().map(|&b| if b < 0x80 { b as char } else { '?' }).collect(),
            TextEncoding::Latin1 => bytes.iter().map(|&b| b as char).collect(),
            TextEncoding::Utf16Le | TextEncoding::Utf16Be => {
                let units = bytes.chunks(2).map(|c| match (self, c) {
                    (TextEncoding::Utf16Le, [lo, hi]) => u16::from_le_bytes([*lo, *hi]),
                    (_, [hi, lo]) => u16::from_be_bytes([*hi, *lo]),
                    _ => 0xFFFD,
                });
                char::decode_utf16(units).map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER)).collect()
            }
            TextEncoding::Utf32Le => bytes
                .chunks(4)
                .map(|c| match c {
                    [a, b, c, d] => char::from_u32(u32::from_le_bytes([*a, *b, *c, *d])).unwrap_or(char::REPLACEMENT_CHARACTER),
                    _ => char::REPLACEMENT_CHARACTER,
                })
                .collect(),
        }
    }
}

pub(crate) fn decode_text(bytes: &[u8], charset: Option<&str>) -> Result<String, HttpError> {
    if bytes.is_empty() {
        return Ok(String::new());
    }
    let declared = match charset {
        Some(c) => Some(TextEncoding::from_charset(c).ok_or_else(|| {
            HttpError::InvalidOperation(
                "The character set provided in ContentType is invalid. Cannot read content as string using an invalid character set.".to_string(),
            )
        })?),
        None => None,
    };
    let sniffed = [TextEncoding::Utf8, TextEncoding::Utf32Le, TextEncoding::Utf16Le, TextEncoding::Utf16Be]
        .into_iter()
        .find(|e| bytes.starts_with(e.preamble()));
    let encoding = declared.or(sniffed).unwrap_or(TextEncoding::Utf8);
    let preamble = encoding.preamble();
    let body = if !preamble.is_empty() && bytes.starts_with(preamble) { &bytes[preamble.len()..] } else { bytes };
    Ok(encoding.decode(body))
}

/// In-memory sink that refuses to grow past `limit`.
struct LimitedBuffer {
    data: BytesMut,
    limit: usize,
    exceeded: bool,
}

impl AsyncWrite for LimitedBuffer {
    fn poll_write(self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &[u8]) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        if this.limit - this.data.len() < buf.len() {
            this.exceeded = true;
            return Poll::Ready(Err(io::Error::new(io::ErrorKind::Other, "buffer limit exceeded")));
        }
        this.data.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn string_content_defaults() {
        let mut content = HttpContent::from_string("héllo");
        assert_eq!(content.headers().header_string("Content-Type").as_deref(), Some("text/plain; charset=utf-8"));
        assert_eq!(content.headers().content_length(), None);
        assert_eq!(content.content_length(), Some(6));
        assert_eq!(content.read_as_string().await.unwrap(), "héllo");
    }

    #[tokio::test]
    async fn form_pairs_are_encoded() {
        let mut content = HttpContent::form_url_encoded([("name", "Jo Bloggs"), ("q", "a&b=c")]);
        assert_eq!(
            content.headers().header_string("Content-Type").as_deref(),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(content.read_as_string().await.unwrap(), "name=Jo+Bloggs&q=a%26b%3Dc");
    }

    #[tokio::test]
    async fn stream_is_consumed_once_unless_buffered() {
        let mut content = HttpContent::from_stream(Cursor::new(b"abc".to_vec()));
        assert_eq!(content.compute_length(), None);
        let mut sink = Vec::new();
        content.copy_to(&mut sink).await.unwrap();
        assert_eq!(sink, b"abc");
        let err = content.copy_to(&mut Vec::new()).await.unwrap_err();
        assert!(matches!(err, HttpError::InvalidOperation(_)));

        let mut buffered = HttpContent::from_stream(Cursor::new(b"xyz".to_vec()));
        buffered.load_into_buffer(16).await.unwrap();
        assert_eq!(buffered.read_as_bytes().await.unwrap(), Bytes::from_static(b"xyz"));
        assert_eq!(buffered.read_as_bytes().await.unwrap(), Bytes::from_static(b"xyz"));
        assert_eq!(buffered.compute_length(), Some(3));
    }

    #[tokio::test]
    async fn buffer_limit_is_enforced() {
        let mut known = HttpContent::from_bytes(vec![0u8; 10]);
        assert!(matches!(known.load_into_buffer(5).await, Err(HttpError::Request(_))));
        let mut unknown = HttpContent::from_stream(Cursor::new(vec![0u8; 10]));
        assert!(matches!(unknown.load_into_buffer(5).await, Err(HttpError::Request(_))));
        assert!(matches!(
            HttpContent::from_bytes(Vec::new()).load_into_buffer(MAX_BUFFER_SIZE + 1).await,
            Err(HttpError::ArgumentOutOfRange(_))
        ));
    }

    #[tokio::test]
    async fn declared_length_does_not_preallocate() {
        assert_eq!(initial_capacity(10), 10);
        assert_eq!(initial_capacity(-1), 0);
        assert_eq!(initial_capacity(i32::MAX as i64), INITIAL_BUFFER_CAPACITY);

        let mut content = HttpContent::from_stream(Cursor::new(b"abc".to_vec()));
        content.headers_mut().set_content_length(Some(i32::MAX as i64)).unwrap();
        content.load_into_buffer(MAX_BUFFER_SIZE).await.unwrap();
        assert_eq!(content.read_as_bytes().await.unwrap(), Bytes::from_static(b"abc"));
    }

    #[tokio::test]
    async fn multipart_layout_and_length() {
        let mut multipart = HttpContent::multipart_with_boundary("mixed", "b1").unwrap();
        assert_eq!(
            multipart.headers().header_string("Content-Type").as_deref(),
            Some("multipart/mixed; boundary=\"b1\"")
        );
        multipart.add_part(HttpContent::from_bytes(&b"one"[..])).unwrap();
        multipart.add_part(HttpContent::from_string("two")).unwrap();
        let expected = "--b1\r\n\r\none\r\n--b1\r\nContent-Type: text/plain; charset=utf-8\r\n\r\ntwo\r\n--b1--\r\n";
        assert_eq!(multipart.compute_length(), Some(expected.len() as i64));
        assert_eq!(multipart.read_as_string().await.unwrap(), expected);
    }

    #[tokio::test]
    async fn form_data_parts_get_dispositions() {
        let mut form = HttpContent::form_data_with_boundary("xx").unwrap();
        form.add_form_field(HttpContent::from_bytes(&b"1"[..]), "count").unwrap();
        form.add_form_file(HttpContent::from_bytes(&b"data"[..]), "upload", "a.txt").unwrap();
        form.add_part(HttpContent::from_bytes(&b"z"[..])).unwrap();
        let dispositions: Vec<String> = form
            .parts()
            .iter()
            .filter_map(|p| p.headers().header_string("Content-Disposition"))
            .collect();
        assert_eq!(
            dispositions,
            vec![
                "form-data; name=count",
                "form-data; name=upload; filename=a.txt; filename*=utf-8''a.txt",
                "form-data",
            ]
        );
        assert!(form.add_form_field(HttpContent::from_bytes(Vec::new()), " ").is_err());
    }

    #[test]
    fn boundary_rules() {
        assert!(HttpContent::multipart_with_boundary("mixed", "ok boundary").is_ok());
        assert!(HttpContent::multipart_with_boundary("mixed", "trailing ").is_err());
        assert!(HttpContent::multipart_with_boundary("mixed", "bad\"quote").is_err());
        assert!(matches!(
            HttpContent::multipart_with_boundary("mixed", &"a".repeat(71)),
            Err(HttpError::ArgumentOutOfRange(_))
        ));
        assert!(HttpContent::multipart_with_boundary(" ", "b").is_err());
        let generated = default_boundary().unwrap();
        assert_eq!(generated.len(), 36);
        assert_eq!(generated.as_bytes()[14], b'4');
    }

    #[test]
    fn charset_and_bom_decoding() {
        assert_eq!(decode_text(b"\xEF\xBB\xBFhi", None).unwrap(), "hi");
        assert_eq!(decode_text(b"\xFF\xFEh\x00i\x00", None).unwrap(), "hi");
        assert_eq!(decode_text(b"\xFE\xFF\x00h\x00i", None).unwrap(), "hi");
        assert_eq!(decode_text(b"caf\xE9", Some("iso-8859-1")).unwrap(), "café");
        assert_eq!(decode_text(b"caf\xE9", Some("us-ascii")).unwrap(), "caf?");
        assert!(matches!(decode_text(b"x", Some("klingon")), Err(HttpError::InvalidOperation(_))));
        assert_eq!(decode_text(b"", Some("klingon")).unwrap(), "");
    }
}
