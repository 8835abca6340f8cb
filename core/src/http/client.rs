/*
 * client.rs
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

//! Client front end over a handler chain.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use bytes::Bytes;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::content::MAX_BUFFER_SIZE;
use super::{HttpContent, HttpMethod, HttpRequestMessage, HttpResponseMessage, MessageHandler};
use crate::error::HttpError;
use crate::headers::RequestHeaders;
use crate::uri::Uri;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(100);

/// When a send completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionOption {
    /// After the whole response body has been buffered.
    #[default]
    ResponseContentRead,
    /// As soon as the handler returns the response; the body is left unread.
    ResponseHeadersRead,
}

/// Sends requests through a [`MessageHandler`], adding base-address resolution, default
/// headers, a timeout, cancellation and response buffering.
///
/// Settings may be changed only until the first request is sent.
pub struct HttpClient {
    handler: Arc<dyn MessageHandler>,
    base_address: Option<Uri>,
    default_request_headers: RequestHeaders,
    timeout: Option<Duration>,
    max_response_content_buffer_size: u64,
    pending: Mutex<CancellationToken>,
    started: AtomicBool,
}

impl HttpClient {
    pub fn new(handler: Arc<dyn MessageHandler>) -> Self {
        Self {
            handler,
            base_address: None,
            default_request_headers: RequestHeaders::new(),
            timeout: Some(DEFAULT_TIMEOUT),
            max_response_content_buffer_size: MAX_BUFFER_SIZE,
            pending: Mutex::new(CancellationToken::new()),
            started: AtomicBool::new(false),
        }
    }

    pub fn base_address(&self) -> Option<&Uri> {
        self.base_address.as_ref()
    }

    /// The base must be an absolute `http` or `https` URI.
    pub fn set_base_address(&mut self, base: Option<Uri>) -> Result<(), HttpError> {
        self.check_not_started()?;
        if let Some(b) = &base {
            if !b.is_absolute() || !b.is_http() {
                return Err(HttpError::Argument(
                    "The base address must be an absolute 'http' or 'https' URI.".to_string(),
                ));
            }
        }
        self.base_address = base;
        Ok(())
    }

    pub fn default_request_headers(&self) -> &RequestHeaders {
        &self.default_request_headers
    }

    pub fn default_request_headers_mut(&mut self) -> &mut RequestHeaders {
        &mut self.default_request_headers
    }

    /// `None` is an infinite timeout.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn set_timeout(&mut self, timeout: Option<Duration>) -> Result<(), HttpError> {
        self.check_not_started()?;
        if let Some(t) = timeout {
            if t.is_zero() || t.as_millis() > i32::MAX as u128 {
                return Err(HttpError::ArgumentOutOfRange(format!("timeout: {:?}", t)));
            }
        }
        self.timeout = timeout;
        Ok(())
    }

    pub fn max_response_content_buffer_size(&self) -> u64 {
        self.max_response_content_buffer_size
    }

    pub fn set_max_response_content_buffer_size(&mut self, size: u64) -> Result<(), HttpError> {
        self.check_not_started()?;
        if size == 0 || size > MAX_BUFFER_SIZE {
            return Err(HttpError::ArgumentOutOfRange(format!(
                "max_response_content_buffer_size: {}",
                size
            )));
        }
        self.max_response_content_buffer_size = size;
        Ok(())
    }

    /// Cancels every request in flight. Later sends are unaffected.
    pub fn cancel_pending_requests(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        let old = std::mem::replace(&mut *pending, CancellationToken::new());
        old.cancel();
    }

    pub async fn send(
        &self,
        request: HttpRequestMessage,
        option: CompletionOption,
    ) -> Result<HttpResponseMessage, HttpError> {
        self.send_with_cancellation(request, option, CancellationToken::new()).await
    }

    pub async fn send_with_cancellation(
        &self,
        mut request: HttpRequestMessage,
        option: CompletionOption,
        cancel: CancellationToken,
    ) -> Result<HttpResponseMessage, HttpError> {
        if !request.mark_as_sent() {
            return Err(HttpError::InvalidOperation(
                "The request message was already sent. Cannot send the same request message multiple times.".to_string(),
            ));
        }
        self.started.store(true, Ordering::Release);
        self.prepare(&mut request)?;

        let linked = self.pending.lock().unwrap_or_else(PoisonError::into_inner).child_token();
        let method = request.method().clone();
        let uri = request.uri().map(ToString::to_string).unwrap_or_default();
        debug!(%method, %uri, "sending request");

        let work = async {
            let mut response = self.handler.send(request, linked.clone()).await?;
            if option == CompletionOption::ResponseContentRead {
                if let Some(content) = response.content_mut() {
                    content.load_into_buffer(self.max_response_content_buffer_size).await?;
                }
            }
            Ok(response)
        };
        let deadline = async {
            match self.timeout {
                Some(t) => tokio::time::sleep(t).await,
                None => std::future::pending::<()>().await,
            }
        };

        let result = tokio::select! {
            r = work => r,
            _ = cancel.cancelled() => Err(HttpError::Canceled),
            _ = linked.cancelled() => Err(HttpError::Canceled),
            _ = deadline => Err(HttpError::Timeout),
        };
        match &result {
            Ok(response) => debug!(%method, %uri, status = response.status_code(), "received response"),
            Err(HttpError::Timeout) => {
                linked.cancel();
                warn!(%method, %uri, timeout = ?self.timeout, "request timed out");
            }
            Err(HttpError::Canceled) => {
                linked.cancel();
                warn!(%method, %uri, "request canceled");
            }
            Err(e) => debug!(%method, %uri, error = %e, "request failed"),
        }
        result
    }

    pub async fn get(&self, uri: &str) -> Result<HttpResponseMessage, HttpError> {
        self.send(HttpRequestMessage::new(HttpMethod::GET, uri)?, CompletionOption::default()).await
    }

    pub async fn post(&self, uri: &str, content: HttpContent) -> Result<HttpResponseMessage, HttpError> {
        self.send(with_content(HttpMethod::POST, uri, content)?, CompletionOption::default()).await
    }

    pub async fn put(&self, uri: &str, content: HttpContent) -> Result<HttpResponseMessage, HttpError> {
        self.send(with_content(HttpMethod::PUT, uri, content)?, CompletionOption::default()).await
    }

    pub async fn delete(&self, uri: &str) -> Result<HttpResponseMessage, HttpError> {
        self.send(HttpRequestMessage::new(HttpMethod::DELETE, uri)?, CompletionOption::default()).await
    }

    /// GETs `uri` and decodes the body; fails on a non-success status.
    pub async fn get_string(&self, uri: &str) -> Result<String, HttpError> {
        let mut response = self.get(uri).await?;
        response.ensure_success_status_code()?;
        match response.content_mut() {
            Some(content) => content.read_as_string().await,
            None => Ok(String::new()),
        }
    }

    /// GETs `uri` and returns the raw body; fails on a non-success status.
    pub async fn get_bytes(&self, uri: &str) -> Result<Bytes, HttpError> {
        let mut response = self.get(uri).await?;
        response.ensure_success_status_code()?;
        match response.content_mut() {
            Some(content) => content.read_as_bytes().await,
            None => Ok(Bytes::new()),
        }
    }

    /// Resolves the target against the base address and merges default headers.
    fn prepare(&self, request: &mut HttpRequestMessage) -> Result<(), HttpError> {
        let resolved = match (request.uri(), &self.base_address) {
            (Some(uri), _) if uri.is_absolute() => None,
            (Some(uri), Some(base)) => Some(base.join(uri)?),
            (None, Some(base)) => Some(base.clone()),
            (_, None) => {
                return Err(HttpError::InvalidOperation(
                    "An invalid request URI was provided. Either the request URI must be an absolute URI or BaseAddress must be set.".to_string(),
                ))
            }
        };
        if let Some(uri) = resolved {
            request.replace_uri(uri);
        }
        request.headers_mut().add_headers(&self.default_request_headers);
        Ok(())
    }

    fn check_not_started(&self) -> Result<(), HttpError> {
        if self.started.load(Ordering::Acquire) {
            return Err(HttpError::InvalidOperation(
                "This instance has already started one or more requests. Properties can only be modified before sending the first request.".to_string(),
            ));
        }
        Ok(())
    }
}

fn with_content(method: HttpMethod, uri: &str, content: HttpContent) -> Result<HttpRequestMessage, HttpError> {
    let mut request = HttpRequestMessage::new(method, uri)?;
    request.set_content(Some(content));
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::BoxFuture;

    struct Fixed(u16);

    impl MessageHandler for Fixed {
        fn send(
            &self,
            request: HttpRequestMessage,
            _cancel: CancellationToken,
        ) -> BoxFuture<'_, Result<HttpResponseMessage, HttpError>> {
            let status = self.0;
            Box::pin(async move {
                let mut response = HttpResponseMessage::new(status)?;
                response.set_request(Some(request));
                Ok(response)
            })
        }
    }

    #[test]
    fn settings_are_validated() {
        let mut client = HttpClient::new(Arc::new(Fixed(200)));
        assert_eq!(client.timeout(), Some(DEFAULT_TIMEOUT));
        assert!(client.set_timeout(Some(Duration::ZERO)).is_err());
        client.set_timeout(None).unwrap();
        assert!(client.set_max_response_content_buffer_size(0).is_err());
        assert!(client.set_base_address(Some(Uri::parse("/relative").unwrap())).is_err());
        assert!(client.set_base_address(Some(Uri::parse("ftp://x/").unwrap())).is_err());
    }

    #[tokio::test]
    async fn settings_freeze_after_first_send() {
        let mut client = HttpClient::new(Arc::new(Fixed(200)));
        client.set_base_address(Some(Uri::parse("http://example.com/api/").unwrap())).unwrap();
        let response = client.get("items?x=1").await.unwrap();
        assert_eq!(
            response.request().and_then(|r| r.uri()).map(ToString::to_string).as_deref(),
            Some("http://example.com/api/items?x=1")
        );
        assert!(matches!(client.set_timeout(None), Err(HttpError::InvalidOperation(_))));
        assert!(client.default_request_headers_mut().add("Accept", "*/*").is_ok());
    }

    #[tokio::test]
    async fn relative_target_needs_base() {
        let client = HttpClient::new(Arc::new(Fixed(200)));
        assert!(matches!(client.get("/x").await, Err(HttpError::InvalidOperation(_))));
    }

    #[tokio::test]
    async fn get_string_checks_status() {
        let client = HttpClient::new(Arc::new(Fixed(500)));
        let err = client.get_string("http://example.com/").await.unwrap_err();
        assert_eq!(err.to_string(), "Response status code does not indicate success: 500 (Internal Server Error).");
    }
}
