//! Managed webhook server.
//!
//! Binds a TCP listener, mounts a [`Webhook`] on one route for every method and
//! runs it with `axum::serve` until the optional shutdown signal fires.
//!
//! To mount the webhook inside your own axum app instead, use
//! [`Webhook::into_router`].
//!
//! # Example
//! ```rust,no_run
//! use axum::{http::StatusCode, response::IntoResponse};
//! use whatsapp_webhook_rs::{Notification, Server, Webhook, WebhookContext};
//!
//! # async fn example() -> Result<(), whatsapp_webhook_rs::Error> {
//! let webhook = Webhook::builder()
//!     .verify_token("my_verify_token")
//!     .app_secret("my_app_secret")
//!     .build(|_ctx: WebhookContext, notification: Notification| async move {
//!         println!("{} messages", notification.messages().count());
//!         StatusCode::OK.into_response()
//!     });
//!
//! Server::builder()
//!     .endpoint("0.0.0.0:8080".parse().unwrap())
//!     .route("/webhook")
//!     .shutdown(async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .build()
//!     .serve(webhook)
//!     .await
//! # }
//! ```

use std::{
    fmt,
    future::Future,
    mem,
    net::{Ipv4Addr, SocketAddr},
    pin::Pin,
    sync::Arc,
};

use tokio::{net::TcpListener, sync::Notify};
use tracing::info;

use crate::{
    error::Error,
    webhook::{ErrorHook, Handler, Webhook},
};

const DEFAULT_ENDPOINT: SocketAddr = SocketAddr::new(
    std::net::IpAddr::V4(Ipv4Addr::LOCALHOST),
    3000,
);
const DEFAULT_ROUTE_PATH: &str = "/";

type Shutdown = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// WhatsApp webhook server.
///
/// Create with [`Server::builder()`] or [`Server::new()`].
#[derive(Default, Debug)]
pub struct Server {
    config: ServerBuilder,
}

impl Server {
    /// A server on `127.0.0.1:3000` serving `/`.
    pub fn new() -> Self {
        ServerBuilder::new().build()
    }

    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    pub fn endpoint(&self) -> SocketAddr {
        self.config.endpoint
    }

    /// Returns a future that stops the server when awaited.
    ///
    /// Any shutdown signal set on the builder keeps working; whichever fires first
    /// wins.
    pub fn shutdown_trigger(&mut self) -> impl Future<Output = ()> + Send + 'static {
        let shutdown = Arc::new(Notify::new());
        let notified = shutdown.clone();

        let old_shutdown = mem::take(&mut self.config.shutdown);
        self.config.shutdown = Some(combine_shutdown(old_shutdown, async move {
            notified.notified().await;
        }));

        async move {
            shutdown.notify_one();
        }
    }

    /// Binds the configured endpoint and serves `webhook` until shutdown.
    pub async fn serve<H, E>(self, webhook: Webhook<H, E>) -> Result<(), Error>
    where
        H: Handler,
        E: ErrorHook,
    {
        let listener = TcpListener::bind(self.config.endpoint).await?;
        self.serve_on(listener, webhook).await
    }

    /// Serves `webhook` on an already bound listener until shutdown.
    ///
    /// The configured endpoint is ignored.
    pub async fn serve_on<H, E>(self, listener: TcpListener, webhook: Webhook<H, E>) -> Result<(), Error>
    where
        H: Handler,
        E: ErrorHook,
    {
        let app = webhook.into_router(&self.config.route_path);

        let local_addr = listener.local_addr()?;
        info!(
            address = %local_addr,
            route = %self.config.route_path,
            "webhook server listening"
        );

        if let Some(shutdown) = self.config.shutdown {
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown)
                .await?;
        } else {
            axum::serve(listener, app).await?;
        }

        info!(address = %local_addr, "webhook server stopped");
        Ok(())
    }
}

/// Completes when either the old or the new shutdown future completes.
fn combine_shutdown<F>(old_shutdown: Option<Shutdown>, update_shutdown: F) -> Shutdown
where
    F: Future<Output = ()> + Send + 'static,
{
    match old_shutdown {
        Some(shutdown) => Box::pin(async {
            tokio::select! {
                _ = shutdown => (),
                _ = update_shutdown => (),
            }
        }),
        None => Box::pin(update_shutdown),
    }
}

/// Builder for creating a [`Server`]
///
/// Customize endpoint, route, and shutdown signal.
#[must_use]
pub struct ServerBuilder {
    endpoint: SocketAddr,
    route_path: String,
    shutdown: Option<Shutdown>,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT,
            route_path: DEFAULT_ROUTE_PATH.to_owned(),
            shutdown: None,
        }
    }
}

impl fmt::Debug for ServerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerBuilder")
            .field("endpoint", &self.endpoint)
            .field("route_path", &self.route_path)
            .field("shutdown", &self.shutdown.is_some())
            .finish()
    }
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the address to listen on, e.g. `0.0.0.0:8080` for all interfaces.
    pub fn endpoint(mut self, endpoint: SocketAddr) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Sets the path the webhook is served on. Defaults to `/`.
    pub fn route<P: Into<String>>(mut self, path: P) -> Self {
        self.route_path = path.into();
        self
    }

    /// Sets a future that, when resolved, shuts the server down gracefully.
    pub fn shutdown<F>(mut self, shutdown: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.shutdown = Some(Box::pin(shutdown));
        self
    }

    pub fn build(self) -> Server {
        Server { config: self }
    }
}
