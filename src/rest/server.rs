use axum::{
    extract::Query,
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use hmac::{digest::KeyInit, Hmac, Mac};
use serde::Deserialize;
use sha1::Sha1;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::notification::Notification;

pub(crate) const SIGNATURE_256_HEADER: &str = "x-hub-signature-256";
pub(crate) const SIGNATURE_HEADER: &str = "x-hub-signature";

/// Checks the platform's signature header against `body`.
///
/// `X-Hub-Signature-256` (`sha256=<hex>`) is used whenever it is present and
/// non-empty, even if `X-Hub-Signature` (`sha1=<hex>`) is present too. An empty
/// `X-Hub-Signature-256` counts as absent. The expected value is the
/// lowercase hex HMAC of the raw body keyed with `app_secret`, compared in
/// constant time.
///
/// Returns `false` when neither header is present, when the header is not
/// valid UTF-8 or lacks the prefix, and on mismatch.
///
/// # Example
/// ```rust
/// use axum::http::HeaderMap;
/// use whatsapp_webhook_rs::webhook::verify_signature;
///
/// let mut headers = HeaderMap::new();
/// headers.insert(
///     "x-hub-signature-256",
///     "sha256=3e0d3a7a8e1b79f8d3c4c7e0d0a5fa7bd8e93c8b5c7c5d51f3bd1e2d4c0aa6b1".parse().unwrap(),
/// );
/// // Wrong secret, so this fails.
/// assert!(!verify_signature(&headers, b"{}", "not-the-secret"));
/// ```
pub fn verify_signature(headers: &HeaderMap, body: &[u8], app_secret: &str) -> bool {
    let sha256 = headers
        .get(SIGNATURE_256_HEADER)
        .filter(|header| !header.is_empty());

    let (header, prefix, expected) = if let Some(header) = sha256 {
        (header, "sha256=", hmac_hex::<Hmac<Sha256>>(app_secret, body))
    } else if let Some(header) = headers.get(SIGNATURE_HEADER) {
        (header, "sha1=", hmac_hex::<Hmac<Sha1>>(app_secret, body))
    } else {
        return false;
    };

    let Some(expected) = expected else {
        return false;
    };

    let Some(signature) = header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix(prefix))
    else {
        return false;
    };

    signature.as_bytes().ct_eq(expected.as_bytes()).into()
}

fn hmac_hex<M: Mac + KeyInit>(secret: &str, body: &[u8]) -> Option<String> {
    let mut mac = <M as Mac>::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(body);
    Some(hex::encode(mac.finalize().into_bytes()))
}

#[derive(Debug, Default)]
pub(crate) struct ChallengeQuery {
    mode: String,
    challenge: String,
    verify_token: String,
}

impl ChallengeQuery {
    /// Keeps the first value of each `hub.*` key; repeats are ignored.
    fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let (mut mode, mut challenge, mut verify_token) = (None, None, None);
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "hub.mode" => &mut mode,
                "hub.challenge" => &mut challenge,
                "hub.verify_token" => &mut verify_token,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        Self {
            mode: mode.unwrap_or_default(),
            challenge: challenge.unwrap_or_default(),
            verify_token: verify_token.unwrap_or_default(),
        }
    }
}

/// Answers the subscription handshake.
///
/// 200 with the challenge echoed verbatim when `hub.mode` is `subscribe` and the
/// token matches, 403 with an empty body otherwise. Without a configured token
/// every handshake is refused.
pub(crate) fn answer_challenge(uri: &Uri, verify_token: Option<&str>) -> Response {
    let query = match Query::<Vec<(String, String)>>::try_from_uri(uri) {
        Ok(Query(pairs)) => ChallengeQuery::from_pairs(pairs),
        Err(err) => {
            tracing::warn!(error = %err, "malformed webhook verification query");
            return StatusCode::FORBIDDEN.into_response();
        }
    };

    let Some(verify_token) = verify_token else {
        tracing::warn!("webhook verification attempted but no verify token is configured");
        return StatusCode::FORBIDDEN.into_response();
    };

    let token_ok: bool = query
        .verify_token
        .as_bytes()
        .ct_eq(verify_token.as_bytes())
        .into();

    if query.mode == "subscribe" && token_ok {
        tracing::debug!("webhook subscription verified");
        (StatusCode::OK, query.challenge).into_response()
    } else {
        tracing::warn!(mode = %query.mode, "webhook verification rejected");
        StatusCode::FORBIDDEN.into_response()
    }
}

/// Decodes a raw webhook body into a [`Notification`].
///
/// Unknown fields are ignored and unknown message types decode as
/// [`MessageContent::Unsupported`](crate::notification::MessageContent::Unsupported);
/// anything else that does not match the expected shape is an error.
pub fn decode(body: &[u8]) -> Result<Notification, serde_json::Error> {
    serde_json::from_slice(body)
}

/// Recovers what little can be read from a body that failed [`decode`]: the
/// `object` discriminator, with no entries.
pub(crate) fn decode_partial(body: &[u8]) -> Option<Notification> {
    #[derive(Deserialize)]
    struct ObjectOnly {
        object: String,
    }

    serde_json::from_slice::<ObjectOnly>(body)
        .ok()
        .map(|o| Notification::partial(o.object))
}
