//! The webhook router.
//!
//! [`Webhook`] is a single request handler for the URL you register as your
//! callback in the App Dashboard. It routes by method:
//!
//! - `GET`: the subscription handshake. `hub.challenge` is echoed back when
//!   `hub.mode` is `subscribe` and `hub.verify_token` matches; otherwise 403.
//! - `POST`: a notification. The body is read, its signature checked against your
//!   app secret, decoded into a [`Notification`] and passed to your [`Handler`],
//!   whose response is sent back as-is.
//! - anything else: 405.
//!
//! Every POST failure ([`WebhookError`]) goes through your [`ErrorHook`] exactly
//! once. If the hook returns a response, that response is sent; otherwise the
//! router sends the default status and body for that failure.
//!
//! # Usage Example (with axum)
//!
//! ```rust,no_run
//! use axum::{http::StatusCode, response::IntoResponse, Router};
//! use whatsapp_webhook_rs::{
//!     notification::MessageContent, Notification, Webhook, WebhookContext, WebhookError,
//! };
//!
//! # async fn example() {
//! let webhook = Webhook::builder()
//!     .verify_token("my_verify_token")
//!     .app_secret("my_app_secret")
//!     .error_hook(
//!         |_ctx: WebhookContext, _partial: Option<Notification>, err: WebhookError| async move {
//!             // Let the platform think everything is fine, so it stops retrying.
//!             err.is_signature().then(|| StatusCode::OK.into_response())
//!         },
//!     )
//!     .build(|_ctx: WebhookContext, notification: Notification| async move {
//!         for message in notification.messages() {
//!             if let MessageContent::Text(text) = &message.content {
//!                 println!("{}: {}", message.from, text.body);
//!             }
//!         }
//!         StatusCode::OK
//!     });
//!
//! let app = Router::new().merge(webhook.into_router("/webhook"));
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//! axum::serve(listener, app).await.unwrap();
//! # }
//! ```

use axum::{
    body::Body,
    extract::Request,
    http::{request::Parts, Extensions, HeaderMap, Method, StatusCode, Uri, Version},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::{fmt, future::Future, sync::Arc};

use crate::{
    error::WebhookError,
    notification::Notification,
    rest::server::{answer_challenge, decode_partial},
    Timestamp,
};

pub use crate::rest::server::{decode, verify_signature};

/// Your Meta app secret, used to verify payload signatures.
///
/// Its `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct AppSecret(String);

impl AppSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AppSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AppSecret(<redacted>)")
    }
}

impl From<String> for AppSecret {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for AppSecret {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Request-scoped information handed to [`Handler`]s and [`ErrorHook`]s.
///
/// Holds the request head; the body has already been consumed by the router.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct WebhookContext {
    pub method: Method,
    pub uri: Uri,
    pub version: Version,
    pub headers: HeaderMap,
    /// Extensions set by your middleware (e.g. connection info).
    pub extensions: Extensions,
    /// When the router started processing the request.
    pub received_at: Timestamp,
}

impl From<Parts> for WebhookContext {
    fn from(parts: Parts) -> Self {
        Self {
            method: parts.method,
            uri: parts.uri,
            version: parts.version,
            headers: parts.headers,
            extensions: parts.extensions,
            received_at: Timestamp::now(),
        }
    }
}

/// Processes verified, decoded notifications.
///
/// The handler is called exactly once per successful POST and fully owns the
/// response. The platform treats any non-2xx answer as a failed delivery and
/// retries it later.
///
/// Closures taking `(WebhookContext, Notification)` and returning a future whose
/// output implements [`IntoResponse`] are handlers too.
///
/// # Example
/// ```rust
/// use axum::{http::StatusCode, response::{IntoResponse, Response}};
/// use whatsapp_webhook_rs::{Handler, Notification, WebhookContext};
///
/// struct Echo;
///
/// impl Handler for Echo {
///     async fn handle(&self, _ctx: WebhookContext, notification: Notification) -> Response {
///         println!("{} message(s)", notification.messages().count());
///         StatusCode::OK.into_response()
///     }
/// }
/// ```
pub trait Handler: Send + Sync + 'static {
    fn handle(
        &self,
        ctx: WebhookContext,
        notification: Notification,
    ) -> impl Future<Output = Response> + Send;
}

impl<F, Fut, R> Handler for F
where
    F: Fn(WebhookContext, Notification) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send,
    R: IntoResponse,
{
    #[inline]
    fn handle(
        &self,
        ctx: WebhookContext,
        notification: Notification,
    ) -> impl Future<Output = Response> + Send {
        let fut = self(ctx, notification);
        async move { fut.await.into_response() }
    }
}

/// Observes, and optionally takes over, every POST failure.
///
/// `notification` is `Some` only for decode failures whose body still carried a
/// string `object`; it then holds that `object` and no entries.
///
/// Return `Some(response)` to send your own response, or `None` to let the router
/// send the default for the error (see [`WebhookError::default_status`]).
///
/// Closures taking `(WebhookContext, Option<Notification>, WebhookError)` and
/// returning a future of `Option<Response>` are hooks too.
pub trait ErrorHook: Send + Sync + 'static {
    fn handle_error(
        &self,
        ctx: WebhookContext,
        notification: Option<Notification>,
        error: WebhookError,
    ) -> impl Future<Output = Option<Response>> + Send;
}

impl<F, Fut> ErrorHook for F
where
    F: Fn(WebhookContext, Option<Notification>, WebhookError) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Option<Response>> + Send,
{
    #[inline]
    fn handle_error(
        &self,
        ctx: WebhookContext,
        notification: Option<Notification>,
        error: WebhookError,
    ) -> impl Future<Output = Option<Response>> + Send {
        self(ctx, notification, error)
    }
}

/// The hook used when none is configured: never handles anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultErrorHook;

impl ErrorHook for DefaultErrorHook {
    #[inline]
    fn handle_error(
        &self,
        _ctx: WebhookContext,
        _notification: Option<Notification>,
        _error: WebhookError,
    ) -> impl Future<Output = Option<Response>> + Send {
        std::future::ready(None)
    }
}

/// A builder for creating a [`Webhook`].
#[derive(Debug, Default, Clone)]
#[must_use]
pub struct WebhookBuilder<E = DefaultErrorHook> {
    verify_token: Option<String>,
    app_secret: Option<AppSecret>,
    error_hook: E,
}

impl WebhookBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: ErrorHook> WebhookBuilder<E> {
    /// Sets the token expected in `hub.verify_token` during the subscription
    /// handshake.
    ///
    /// Without one, every handshake is refused with 403.
    pub fn verify_token(mut self, verify_token: impl Into<String>) -> Self {
        self.verify_token = Some(verify_token.into());
        self
    }

    /// Sets the app secret used to verify payload signatures.
    ///
    /// Without one, no POST can be authenticated and every POST fails with
    /// [`WebhookError::InvalidSignature`].
    pub fn app_secret(mut self, app_secret: impl Into<AppSecret>) -> Self {
        self.app_secret = Some(app_secret.into());
        self
    }

    /// Replaces the error hook.
    pub fn error_hook<E2: ErrorHook>(self, error_hook: E2) -> WebhookBuilder<E2> {
        WebhookBuilder {
            verify_token: self.verify_token,
            app_secret: self.app_secret,
            error_hook,
        }
    }

    /// Builds the router around `handler`.
    pub fn build<H: Handler>(self, handler: H) -> Webhook<H, E> {
        Webhook {
            inner: Arc::new(Inner {
                verify_token: self.verify_token,
                app_secret: self.app_secret,
                handler,
                error_hook: self.error_hook,
            }),
        }
    }
}

struct Inner<H, E> {
    verify_token: Option<String>,
    app_secret: Option<AppSecret>,
    handler: H,
    error_hook: E,
}

/// The webhook router. See the [module docs](self).
///
/// Cheap to clone; all clones share the same configuration, handler and hook.
pub struct Webhook<H, E = DefaultErrorHook> {
    inner: Arc<Inner<H, E>>,
}

impl<H, E> Clone for Webhook<H, E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<H, E> fmt::Debug for Webhook<H, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Webhook")
            .field("verify_token", &self.inner.verify_token.as_ref().map(|_| "<redacted>"))
            .field("app_secret", &self.inner.app_secret)
            .finish_non_exhaustive()
    }
}

impl Webhook<()> {
    /// Returns a new builder to create a `Webhook`.
    pub fn builder() -> WebhookBuilder {
        WebhookBuilder::new()
    }
}

impl<H: Handler> Webhook<H> {
    /// Creates a router with the default error hook.
    pub fn new(
        verify_token: impl Into<String>,
        app_secret: impl Into<AppSecret>,
        handler: H,
    ) -> Self {
        WebhookBuilder::new()
            .verify_token(verify_token)
            .app_secret(app_secret)
            .build(handler)
    }
}

impl<H: Handler, E: ErrorHook> Webhook<H, E> {
    /// Processes one request.
    ///
    /// This is the whole router; [`into_router`](Self::into_router) and
    /// [`Server`](crate::Server) only mount it.
    pub async fn handle(&self, req: Request) -> Response {
        let (parts, body) = req.into_parts();
        match parts.method {
            Method::GET => answer_challenge(&parts.uri, self.inner.verify_token.as_deref()),
            Method::POST => self.handle_notification(parts, body).await,
            _ => StatusCode::METHOD_NOT_ALLOWED.into_response(),
        }
    }

    /// Mounts the router on `path` for every method.
    pub fn into_router(self, path: &str) -> Router {
        Router::new().route(
            path,
            any(move |req: Request| {
                let webhook = self.clone();
                async move { webhook.handle(req).await }
            }),
        )
    }

    async fn handle_notification(&self, parts: Parts, body: Body) -> Response {
        let ctx = WebhookContext::from(parts);

        let body = match axum::body::to_bytes(body, usize::MAX).await {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read webhook body");
                return self.fail(ctx, None, WebhookError::ReadBody(err)).await;
            }
        };

        let authentic = match &self.inner.app_secret {
            Some(secret) => verify_signature(&ctx.headers, &body, secret.expose()),
            None => {
                tracing::warn!("no app secret configured; webhook payload cannot be verified");
                false
            }
        };
        if !authentic {
            tracing::warn!(len = body.len(), "webhook signature verification failed");
            return self.fail(ctx, None, WebhookError::InvalidSignature).await;
        }

        match decode(&body) {
            Ok(notification) => {
                tracing::debug!(
                    object = %notification.object,
                    entries = notification.entry.len(),
                    "webhook notification accepted"
                );
                self.inner.handler.handle(ctx, notification).await
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to decode webhook body");
                let partial = decode_partial(&body);
                self.fail(ctx, partial, WebhookError::Decode(err)).await
            }
        }
    }

    async fn fail(
        &self,
        ctx: WebhookContext,
        notification: Option<Notification>,
        error: WebhookError,
    ) -> Response {
        let status = error.default_status();
        let body = error.default_body();

        match self
            .inner
            .error_hook
            .handle_error(ctx, notification, error)
            .await
        {
            Some(response) => response,
            None => (status, body).into_response(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn default_hook_and_405() {
        let webhook = Webhook::new("token", "secret", |_ctx: WebhookContext, _n: Notification| async {
            StatusCode::OK
        });

        let req = axum::http::Request::put("/").body(Body::from("{}")).unwrap();
        let res = webhook.handle(req).await;
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);

        let req = axum::http::Request::post("/").body(Body::from("{}")).unwrap();
        let res = webhook.handle(req).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn missing_app_secret_rejects_posts() {
        let webhook = Webhook::builder().build(|_ctx: WebhookContext, _n: Notification| async {
            StatusCode::OK
        });
        let req = axum::http::Request::post("/")
            .header("x-hub-signature-256", "sha256=00")
            .body(Body::from("{}"))
            .unwrap();
        assert_eq!(webhook.handle(req).await.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn secrets_are_redacted() {
        let secret = AppSecret::from("super-secret");
        assert!(!format!("{secret:?}").contains("super-secret"));

        let webhook = Webhook::new("tok", secret, |_ctx: WebhookContext, _n: Notification| async {
            StatusCode::OK
        });
        let debug = format!("{webhook:?}");
        assert!(!debug.contains("super-secret"));
        assert!(!debug.contains("tok\""));
    }
}
