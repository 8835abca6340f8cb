/*
 * error.rs
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

//! Header and pipeline errors.

use thiserror::Error;

/// Errors raised by header values, parsers used in strict mode, and header stores.
///
/// Primitive scanners never produce these; they report failure with a zero length or `None`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// Value does not match the required grammar.
    #[error("{0}")]
    Format(String),
    /// Empty or otherwise unusable argument.
    #[error("{0}")]
    Argument(String),
    #[error("value cannot be null: {0}")]
    ArgumentNull(&'static str),
    /// Numeric field outside its permitted range.
    #[error("specified argument was out of the range of valid values: {0}")]
    ArgumentOutOfRange(String),
    /// Structural misuse (forbidden header, second value on a single-value header, missing header).
    #[error("{0}")]
    InvalidOperation(String),
}

impl HeaderError {
    pub(crate) fn invalid_value(value: &str) -> Self {
        HeaderError::Format(format!("The format of value '{}' is invalid.", value))
    }

    pub(crate) fn empty(param: &str) -> Self {
        HeaderError::Argument(format!("The value cannot be null or empty. (parameter '{}')", param))
    }

    pub(crate) fn out_of_range(param: &str) -> Self {
        HeaderError::ArgumentOutOfRange(param.to_string())
    }
}

/// Errors from the send pipeline (client, handlers, content).
#[derive(Debug, Error)]
pub enum HttpError {
    #[error(transparent)]
    Header(#[from] HeaderError),
    /// Request could not be completed or the response signalled failure.
    #[error("{0}")]
    Request(String),
    #[error("the operation was canceled")]
    Canceled,
    #[error("the request timed out")]
    Timeout,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    InvalidOperation(String),
    #[error("specified argument was out of the range of valid values: {0}")]
    ArgumentOutOfRange(String),
    #[error("{0}")]
    Argument(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_value_message() {
        let e = HeaderError::invalid_value("x y");
        assert_eq!(e.to_string(), "The format of value 'x y' is invalid.");
    }

    #[test]
    fn header_error_converts_into_http_error() {
        let e: HttpError = HeaderError::out_of_range("quality").into();
        assert!(matches!(e, HttpError::Header(HeaderError::ArgumentOutOfRange(_))));
    }
}
