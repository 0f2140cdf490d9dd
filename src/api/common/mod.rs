//
//  build-center-cli
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types for the Build Center client
//!
//! This module provides the types shared by the transport, the endpoint
//! capabilities and the resource model: the unified error type and the
//! decoded response wrapper.
//!
//! # Overview
//!
//! - [`ApiError`] - Unified error type for all API operations
//! - [`WireResponse`] - A decoded JSON body paired with its raw response text
//!
//! # Example
//!
//! ```rust
//! use build_center_cli::api::common::ApiError;
//!
//! fn handle_result<T>(result: Result<T, ApiError>) {
//!     match result {
//!         Ok(_) => println!("Success!"),
//!         Err(ApiError::Unauthorized(_)) => println!("Please provide a valid token"),
//!         Err(ApiError::NotFound(message)) => println!("Resource not found: {}", message),
//!         Err(e) => println!("Error: {}", e),
//!     }
//! }
//! ```

use serde_json::Value;
use thiserror::Error;

/// Unified error type for all Build Center API operations.
///
/// Every failure surfaced by the transport, the endpoint capabilities and the
/// resource model is one of these variants. None of them is recovered
/// internally: the client performs no retries and no silent fallback.
///
/// # Variants
///
/// | Variant | Description | HTTP Status |
/// |---------|-------------|-------------|
/// | `BadRequest` | The server rejected the request fields | 400 |
/// | `Unauthorized` | Missing or invalid bearer token | 401 |
/// | `Forbidden` | Token lacks the required access flags | 403 |
/// | `NotFound` | Requested resource does not exist | 404 |
/// | `ServerReported` | Body carried an `error.message` field | any |
/// | `ContentTypeMismatch` | Response type differs from the requested accept | any |
/// | `MalformedResponse` | Body missing, not JSON, or missing required fields | any |
/// | `TransportFailure` | Any other non-2xx status | other |
/// | `Network` | Connection-level failure | N/A |
/// | `Io` | Reading an upload source or writing a download sink failed | N/A |
///
/// # Example
///
/// ```rust
/// use build_center_cli::api::common::ApiError;
///
/// let error = ApiError::TransportFailure {
///     status: 502,
///     message: "Bad Gateway".to_string(),
/// };
/// assert_eq!(error.status(), Some(502));
/// ```
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request was malformed or failed server-side validation.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The bearer token is missing, unknown, expired or disabled.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The token is valid but does not carry the required access.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The requested resource was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The server answered with an `error.message` field in its JSON body.
    #[error("Server error: {0}")]
    ServerReported(String),

    /// The response `Content-Type` does not match the requested accept type.
    ///
    /// Raised before any parsing of the body takes place.
    #[error("Received content with unexpected type: expected {expected}, got {actual}")]
    ContentTypeMismatch {
        /// The content type that was requested
        expected: String,
        /// The content type the server answered with
        actual: String,
    },

    /// The response could not be turned into the expected shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A non-2xx status without a dedicated variant.
    #[error("Request failed with status {status}: {message}")]
    TransportFailure {
        /// The raw HTTP status code
        status: u16,
        /// Error message from the body, or the canonical status reason
        message: String,
    },

    /// A network-level error occurred during the request.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Reading an upload source or writing a download sink failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Returns the HTTP status code associated with this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest(_) => Some(400),
            Self::Unauthorized(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::TransportFailure { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// A decoded JSON response body paired with the raw text it was parsed from.
///
/// The `body` has already had every object key converted from the wire's
/// camelCase to snake_case. The `raw` text is kept verbatim so bound
/// resources can reproduce exactly what the server sent.
#[derive(Debug, Clone, PartialEq)]
pub struct WireResponse {
    /// Decoded body with snake_case keys
    pub body: Value,
    /// Response text exactly as received
    pub raw: String,
}

/// Extracts the message from a `{"error": {"message": "..."}}` body.
///
/// Returns `None` when the value is not an object, has no `error` member or
/// the message is not a string.
pub fn error_message(body: &Value) -> Option<&str> {
    body.get("error")
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_message_present() {
        let body = json!({"error": {"message": "App name already taken"}});
        assert_eq!(error_message(&body), Some("App name already taken"));
    }

    #[test]
    fn test_error_message_absent() {
        assert_eq!(error_message(&json!({"id": "abc"})), None);
        assert_eq!(error_message(&json!([1, 2, 3])), None);
        assert_eq!(error_message(&json!({"error": {"code": 7}})), None);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::BadRequest("x".into()).status(), Some(400));
        assert_eq!(ApiError::NotFound("x".into()).status(), Some(404));
        assert_eq!(ApiError::MalformedResponse("x".into()).status(), None);
    }
}
