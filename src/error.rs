//! Error Handling
//!
//! This module defines the crate's two error families:
//!
//! - [`Error`]: everything that can go wrong while talking to the WhatsApp Cloud API
//!   through the [`Client`](crate::Client) (network failures, API errors, bad parameters).
//! - [`WebhookError`]: the failure classes detected by the webhook router before your
//!   [`Handler`](crate::Handler) is ever called. Each one is handed to your
//!   [`ErrorHook`](crate::ErrorHook) exactly once.

use axum::http::StatusCode as HttpStatusCode;
use reqwest::StatusCode;

use crate::MetaError;

/// The **top-level error enum** for the outbound [`Client`](crate::Client).
///
/// It uses `#[non_exhaustive]` to allow for future additions of error variants
/// without breaking client code.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The request never produced a response (connection refused, DNS failure,
    /// TLS error, timeout...).
    #[error("A network error occurred: {0}")]
    Network(#[from] reqwest::Error),

    /// The API answered with a non-success status and a Graph API error body.
    #[error("The API returned an error (HTTP status {status}): {error}")]
    Api {
        status: StatusCode,
        error: Box<MetaError>,
    },

    /// The API answered with a non-success status and a body that could not be
    /// understood as a Graph API error.
    #[error("Unexpected HTTP status {0}")]
    UnexpectedStatus(StatusCode),

    /// A success response body did not match the expected shape.
    #[error("Failed to parse the API response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The request was rejected locally before anything was sent.
    #[error("Invalid request parameters: {0}")]
    Validation(String),

    /// Represents an **I/O error** that occurred during IO operations,
    /// such as reading a file to upload.
    #[error("An I/O error occurred: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Returns the HTTP status of the failed call, if the API answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api { status, .. } | Error::UnexpectedStatus(status) => Some(*status),
            Error::Network(err) => err.status(),
            _ => None,
        }
    }
}

/// A failure detected by the webhook router while processing a POST request.
///
/// Every variant maps to a default status code and body (see
/// [`default_status`](Self::default_status) and [`default_body`](Self::default_body))
/// which the router sends unless your [`ErrorHook`](crate::ErrorHook) takes over.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum WebhookError {
    /// The request body could not be read from the connection.
    #[error("reading body: {0}")]
    ReadBody(#[source] axum::Error),

    /// The signature header was missing, malformed, or did not match the body.
    #[error("invalid signature")]
    InvalidSignature,

    /// The body was authentic but is not a valid webhook notification.
    #[error("unmarshalling request body: {0}")]
    Decode(#[source] serde_json::Error),
}

impl WebhookError {
    /// Status code the router answers with when the hook does not handle the failure.
    pub fn default_status(&self) -> HttpStatusCode {
        match self {
            WebhookError::ReadBody(_) | WebhookError::Decode(_) => HttpStatusCode::BAD_REQUEST,
            WebhookError::InvalidSignature => HttpStatusCode::FORBIDDEN,
        }
    }

    /// Body the router answers with when the hook does not handle the failure.
    pub fn default_body(&self) -> &'static str {
        match self {
            WebhookError::ReadBody(_) => "Failed to read request body",
            WebhookError::InvalidSignature => "Invalid signature",
            WebhookError::Decode(_) => "Failed to parse request body",
        }
    }

    /// Returns `true` for authentication failures.
    pub fn is_signature(&self) -> bool {
        matches!(self, WebhookError::InvalidSignature)
    }
}
