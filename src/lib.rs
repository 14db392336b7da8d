#![deny(clippy::future_not_send)]

//! # whatsapp_webhook_rs
//!
//! A Rust toolkit for the Meta WhatsApp Cloud API with a focus on the inbound side:
//! receiving, authenticating and decoding webhook notifications, plus a compact client
//! for the outbound `messages` and `media` endpoints.
//!
//! ## ✨ Features
//!
//! - **Webhook router**: one [`Webhook`] value answers the subscription handshake (GET),
//!   verifies `X-Hub-Signature-256` / `X-Hub-Signature` on every POST against the raw
//!   body, decodes the payload into a typed [`Notification`] and hands it to your
//!   [`Handler`]. Every failure goes through a single pluggable [`ErrorHook`].
//! - **Typed notifications**: messages, statuses and errors with a closed
//!   [`MessageContent`](notification::MessageContent) enum that still tolerates
//!   message types the platform adds in the future.
//! - **Client API**: send text, images and interactive messages (buttons, lists,
//!   flows, call-to-action URLs) and manage media.
//! - **HTML to WhatsApp markup**: turn simple HTML into `*bold*`, `_italic_` and
//!   `~strike~` text.
//!
//! ## 🚀 Examples
//!
//! ### Receive webhooks inside your axum app
//! ```rust,no_run
//! use axum::{http::StatusCode, response::IntoResponse, Router};
//! use whatsapp_webhook_rs::{Notification, Webhook, WebhookContext};
//!
//! # async fn example() {
//! let webhook = Webhook::builder()
//!     .verify_token("my_verify_token")
//!     .app_secret("my_app_secret")
//!     .build(|_ctx: WebhookContext, notification: Notification| async move {
//!         for message in notification.messages() {
//!             println!("{} says {:?}", message.from, message.content.text_body());
//!         }
//!         StatusCode::OK.into_response()
//!     });
//!
//! let app: Router = webhook.into_router("/webhook");
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//! axum::serve(listener, app).await.unwrap();
//! # }
//! ```
//!
//! ### Send a text message
//! ```rust,no_run
//! use whatsapp_webhook_rs::{message::Text, Client};
//!
//! # async fn example() -> Result<(), whatsapp_webhook_rs::Error> {
//! let client = Client::new("ACCESS_TOKEN", "PHONE_NUMBER_ID")?;
//! let response = client.send_text("16505551234", Text::new("Hello from Rust!")).await?;
//! println!("sent {:?}", response.message_id());
//! # Ok(()) }
//! ```

mod rest;

pub mod client;
pub mod error;
pub mod html;
pub mod media;
pub mod message;
pub mod notification;
pub mod server;
pub mod webhook;

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Represents an error object reported by Meta.
///
/// The same shape is used in two places:
/// - the `error` member of a failed Graph API response body, and
/// - the `errors` arrays of webhook messages, statuses and change values.
///
/// # Example (from a webhook status)
/// ```json
/// {
///   "code": 131050,
///   "title": "Unable to deliver the message",
///   "message": "Unable to deliver the message",
///   "error_data": { "details": "The recipient has chosen to stop receiving marketing messages" },
///   "href": "https://developers.facebook.com/docs/whatsapp/cloud-api/support/error-codes/"
/// }
/// ```
#[derive(thiserror::Error, Serialize, Deserialize, PartialEq, Clone, Debug, Default)]
#[non_exhaustive]
pub struct MetaError {
    pub code: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_subcode: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fbtrace_id: Option<String>,
    #[serde(rename = "href", default, skip_serializing_if = "Option::is_none")]
    pub support: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_data: Option<MetaErrorData>,
}

impl fmt::Display for MetaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(code: {})", self.code)?;

        if let Some(title) = &self.title {
            write!(f, " - {title}")?;
        }

        if let Some(r#type) = &self.r#type {
            write!(f, " (type: {type})")?;
        }

        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }

        if let Some(details) = self.details() {
            write!(f, "\n  Details: {details}")?;
        }

        if let Some(support) = &self.support {
            write!(f, "\n  More info: {support}")?;
        }

        if let Some(id) = &self.fbtrace_id {
            write!(f, "\n  Trace ID: {id}")?;
        }

        Ok(())
    }
}

impl MetaError {
    /// Human-readable details, from `error_data.details` or the top-level `details`.
    pub fn details(&self) -> Option<&str> {
        self.error_data
            .as_ref()
            .and_then(|data| data.details.as_deref())
            .or(self.details.as_deref())
    }
}

/// Structured detail payload attached to a [`MetaError`].
#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, Default)]
#[non_exhaustive]
pub struct MetaErrorData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messaging_product: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Represents a timestamp sent by the WhatsApp platform.
///
/// Webhooks carry UNIX timestamps (`seconds since epoch`). The documented payloads
/// encode them as strings (`"1603069091"`) while some deliveries use bare numbers;
/// both decode to the same value.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Default, Hash)]
pub struct Timestamp {
    pub(crate) inner: i64,
}

impl Timestamp {
    /// Returns the raw timestamp in seconds.
    pub fn seconds(&self) -> i64 {
        self.inner
    }

    pub(crate) fn now() -> Self {
        let inner = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or_default();
        Self { inner }
    }
}

impl From<i64> for Timestamp {
    fn from(inner: i64) -> Self {
        Self { inner }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt(f)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        rest::deserialize_str::<i64, D>(deserializer).map(|inner| Timestamp { inner })
    }
}

pub use client::Client;
pub use error::{Error, WebhookError};
pub use notification::{Change, Entry, Message, Notification, Status, Value};
pub use server::Server;
pub use webhook::{DefaultErrorHook, ErrorHook, Handler, Webhook, WebhookContext};

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn timestamp_accepts_strings_and_numbers() {
        let a: Timestamp = serde_json::from_str(r#""1603069091""#).unwrap();
        let b: Timestamp = serde_json::from_str("1603069091").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.seconds(), 1603069091);

        assert!(serde_json::from_str::<Timestamp>(r#""yesterday""#).is_err());
        assert!(serde_json::from_str::<Timestamp>("{}").is_err());
    }

    #[test]
    fn meta_error_details_fallback() {
        let err: MetaError = serde_json::from_str(
            r#"{"code": 131051, "title": "Unsupported message type", "details": "Message type is not currently supported"}"#,
        )
        .unwrap();
        assert_eq!(err.details(), Some("Message type is not currently supported"));

        let err: MetaError = serde_json::from_str(
            r#"{"code": 100, "message": "(#100) Invalid parameter", "error_data": {"details": "bad phone"}}"#,
        )
        .unwrap();
        assert_eq!(err.details(), Some("bad phone"));
        assert!(err.to_string().contains("(code: 100)"));
    }
}
