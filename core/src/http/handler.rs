/*
 * handler.rs
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

//! Message handler chain.
//!
//! The client hands each request to a [`MessageHandler`]. Handlers compose: a
//! [`DelegatingHandler`] forwards to an inner handler, and a [`MessageProcessingHandler`]
//! runs a [`MessageProcessor`] on the request before forwarding and on the response after.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::{BoxFuture, HttpRequestMessage, HttpResponseMessage};
use crate::error::HttpError;

/// Turns a request into a response. Implementations must honour `cancel`.
pub trait MessageHandler: Send + Sync {
    fn send(
        &self,
        request: HttpRequestMessage,
        cancel: CancellationToken,
    ) -> BoxFuture<'_, Result<HttpResponseMessage, HttpError>>;
}

impl<H: MessageHandler + ?Sized> MessageHandler for Arc<H> {
    fn send(
        &self,
        request: HttpRequestMessage,
        cancel: CancellationToken,
    ) -> BoxFuture<'_, Result<HttpResponseMessage, HttpError>> {
        (**self).send(request, cancel)
    }
}

/// Forwards every request to an inner handler, which must be assigned before the first send
/// and cannot be replaced afterwards.
#[derive(Default)]
pub struct DelegatingHandler {
    inner: Option<Arc<dyn MessageHandler>>,
    started: AtomicBool,
}

impl DelegatingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inner(inner: Arc<dyn MessageHandler>) -> Self {
        Self { inner: Some(inner), started: AtomicBool::new(false) }
    }

    pub fn inner(&self) -> Option<&Arc<dyn MessageHandler>> {
        self.inner.as_ref()
    }

    pub fn set_inner(&mut self, inner: Arc<dyn MessageHandler>) -> Result<(), HttpError> {
        if self.started.load(Ordering::Acquire) {
            return Err(HttpError::InvalidOperation(
                "This instance has already started one or more requests. Properties can only be modified before sending the first request.".to_string(),
            ));
        }
        self.inner = Some(inner);
        Ok(())
    }

    fn inner_for_send(&self) -> Result<Arc<dyn MessageHandler>, HttpError> {
        self.started.store(true, Ordering::Release);
        self.inner
            .clone()
            .ok_or_else(|| HttpError::InvalidOperation("The inner handler has not been assigned.".to_string()))
    }
}

impl MessageHandler for DelegatingHandler {
    fn send(
        &self,
        request: HttpRequestMessage,
        cancel: CancellationToken,
    ) -> BoxFuture<'_, Result<HttpResponseMessage, HttpError>> {
        Box::pin(async move {
            let inner = self.inner_for_send()?;
            inner.send(request, cancel).await
        })
    }
}

/// Hooks run around the inner handler. Both default to passing the message through.
pub trait MessageProcessor: Send + Sync {
    fn process_request(
        &self,
        request: HttpRequestMessage,
        _cancel: &CancellationToken,
    ) -> Result<HttpRequestMessage, HttpError> {
        Ok(request)
    }

    fn process_response(
        &self,
        response: HttpResponseMessage,
        _cancel: &CancellationToken,
    ) -> Result<HttpResponseMessage, HttpError> {
        Ok(response)
    }
}

/// A delegating handler that runs `processor` on each request and response.
pub struct MessageProcessingHandler<P> {
    delegate: DelegatingHandler,
    processor: P,
}

impl<P: MessageProcessor> MessageProcessingHandler<P> {
    pub fn new(processor: P) -> Self {
        Self { delegate: DelegatingHandler::new(), processor }
    }

    pub fn with_inner(processor: P, inner: Arc<dyn MessageHandler>) -> Self {
        Self { delegate: DelegatingHandler::with_inner(inner), processor }
    }

    pub fn set_inner(&mut self, inner: Arc<dyn MessageHandler>) -> Result<(), HttpError> {
        self.delegate.set_inner(inner)
    }

    pub fn processor(&self) -> &P {
        &self.processor
    }
}

impl<P: MessageProcessor> MessageHandler for MessageProcessingHandler<P> {
    fn send(
        &self,
        request: HttpRequestMessage,
        cancel: CancellationToken,
    ) -> BoxFuture<'_, Result<HttpResponseMessage, HttpError>> {
        Box::pin(async move {
            let inner = self.delegate.inner_for_send()?;
            let request = self.processor.process_request(request, &cancel)?;
            if cancel.is_cancelled() {
                return Err(HttpError::Canceled);
            }
            let response = inner.send(request, cancel.clone()).await?;
            self.processor.process_response(response, &cancel)
        })
    }
}
