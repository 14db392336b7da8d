//! WhatsApp Cloud API client.
//!
//! A small client for the `messages` and `media` endpoints of the Graph API, scoped
//! to one business phone number.
//!
//! # Example – Creating a Client
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use whatsapp_webhook_rs::client::Client;
//!
//! # fn run() -> Result<(), whatsapp_webhook_rs::Error> {
//! let client = Client::builder()
//!     .timeout(Duration::from_secs(15))
//!     .api_version("v21.0")
//!     .access_token("YOUR_ACCESS_TOKEN")
//!     .phone_number_id("YOUR_PHONE_NUMBER_ID")
//!     .build()?;
//! # Ok(()) }
//! ```
//!
//! # Example – Replying with buttons
//!
//! ```rust,no_run
//! use whatsapp_webhook_rs::{
//!     message::{Button, InteractiveButtons},
//!     Client,
//! };
//!
//! # async fn run(client: Client) -> Result<(), whatsapp_webhook_rs::Error> {
//! let params = InteractiveButtons::new(
//!     "Confirm your booking?",
//!     vec![Button::reply("confirm", "Confirm"), Button::reply("cancel", "Cancel")],
//! );
//! client.send_interactive_buttons("16505551234", params).await?;
//! # Ok(()) }
//! ```

use axum::body::Bytes;
use futures::{Stream, TryStreamExt as _};
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client as HttpClient, ClientBuilder as HttpClientBuilder,
};
use std::{borrow::Cow, fmt, path::Path, pin::pin, sync::Arc, time::Duration};
use tracing::debug;

use crate::{
    error::Error,
    media::{DeleteMediaResponse, MediaInfo, UploadMedia, UploadMediaResponse},
    message::{
        Image, InteractiveButtons, InteractiveCtaUrl, InteractiveFlow, InteractiveList,
        MessagesResponse, OutgoingContent, OutgoingMessage, Text,
    },
    rest::client::{execute_request, media_stream, upload_form},
};

/// Default Graph API host.
pub const DEFAULT_BASE_URL: &str = "https://graph.facebook.com";
/// Default Graph API version.
pub const DEFAULT_API_VERSION: &str = "v22.0";
/// Default user agent for the client
const USER_AGENT: &str = concat!("whatsapp-webhook-rs/", env!("CARGO_PKG_VERSION"), " (Rust)");

/// Client for the WhatsApp Cloud API.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone, Debug)]
pub struct Client {
    inner: Arc<InnerClient>,
}

#[derive(Debug)]
struct InnerClient {
    http: HttpClient,
    base_url: String,
    api_version: String,
    phone_number_id: String,
}

/// A Graph API access token. Its `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(REDACTED)")
    }
}

impl From<String> for AccessToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for AccessToken {
    fn from(token: &str) -> Self {
        Self(token.to_owned())
    }
}

impl Client {
    /// Creates a client with default settings.
    ///
    /// # Example
    /// ```rust,no_run
    /// use whatsapp_webhook_rs::Client;
    ///
    /// let client = Client::new("YOUR_ACCESS_TOKEN", "YOUR_PHONE_NUMBER_ID").unwrap();
    /// ```
    pub fn new(
        access_token: impl Into<AccessToken>,
        phone_number_id: impl Into<String>,
    ) -> Result<Self, Error> {
        Self::builder()
            .access_token(access_token)
            .phone_number_id(phone_number_id)
            .build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn phone_number_id(&self) -> &str {
        &self.inner.phone_number_id
    }

    /// Sends a text message.
    ///
    /// # Example
    /// ```rust,no_run
    /// # use whatsapp_webhook_rs::{message::Text, Client};
    /// # async fn example(client: Client) -> Result<(), whatsapp_webhook_rs::Error> {
    /// client
    ///     .send_text("16505551234", Text::new("See https://example.com").preview_url(true))
    ///     .await?;
    /// # Ok(()) }
    /// ```
    pub async fn send_text(&self, to: &str, text: impl Into<Text>) -> Result<MessagesResponse, Error> {
        let text = text.into();
        self.send(to, OutgoingContent::Text { text: &text }).await
    }

    /// Sends an image by media ID or link.
    pub async fn send_image(&self, to: &str, image: Image) -> Result<MessagesResponse, Error> {
        image.validate()?;
        self.send(to, OutgoingContent::Image { image: &image }).await
    }

    pub async fn send_interactive_buttons(
        &self,
        to: &str,
        params: InteractiveButtons,
    ) -> Result<MessagesResponse, Error> {
        let interactive = params.to_wire();
        self.send(to, OutgoingContent::Interactive { interactive }).await
    }

    pub async fn send_interactive_list(
        &self,
        to: &str,
        params: InteractiveList,
    ) -> Result<MessagesResponse, Error> {
        let interactive = params.to_wire();
        self.send(to, OutgoingContent::Interactive { interactive }).await
    }

    /// Sends a message with a button that opens a flow.
    ///
    /// The customer's submission arrives later as a
    /// [`FlowReply`](crate::notification::FlowReply) carrying the `flow_token`.
    pub async fn send_interactive_flow(
        &self,
        to: &str,
        params: InteractiveFlow,
    ) -> Result<MessagesResponse, Error> {
        params.parameters.validate()?;
        let interactive = params.to_wire();
        self.send(to, OutgoingContent::Interactive { interactive }).await
    }

    pub async fn send_interactive_cta_url(
        &self,
        to: &str,
        params: InteractiveCtaUrl,
    ) -> Result<MessagesResponse, Error> {
        params.parameters.validate()?;
        let interactive = params.to_wire();
        self.send(to, OutgoingContent::Interactive { interactive }).await
    }

    async fn send(&self, to: &str, content: OutgoingContent<'_>) -> Result<MessagesResponse, Error> {
        let url = self.url(&self.inner.phone_number_id, Some("messages"));
        debug!(to, "sending message");

        let request = self
            .inner
            .http
            .post(url)
            .json(&OutgoingMessage::new(to, content));
        execute_request(request).await
    }

    /// Looks up a media object, including its short-lived download URL.
    pub async fn get_media(&self, media_id: &str) -> Result<MediaInfo, Error> {
        if media_id.is_empty() {
            return Err(Error::validation("media ID cannot be empty"));
        }
        debug!(media_id, "fetching media info");
        execute_request(self.inner.http.get(self.url(media_id, None))).await
    }

    /// Streams the content behind a media URL obtained from [`get_media`](Self::get_media).
    ///
    /// Nothing is sent until the stream is polled.
    ///
    /// # Example
    /// ```rust,no_run
    /// use futures::TryStreamExt;
    /// # use whatsapp_webhook_rs::Client;
    /// # async fn example(client: Client) -> Result<(), whatsapp_webhook_rs::Error> {
    /// let info = client.get_media("1234567890").await?;
    /// let mut file = tokio::fs::File::create("download.bin").await?;
    /// let mut stream = std::pin::pin!(client.download_media(&info.url));
    /// while let Some(chunk) = stream.try_next().await? {
    ///     tokio::io::AsyncWriteExt::write_all(&mut file, &chunk).await?;
    /// }
    /// # Ok(()) }
    /// ```
    pub fn download_media(&self, url: &str) -> impl Stream<Item = Result<Bytes, Error>> + Send + 'static {
        debug!("downloading media");
        media_stream(self.inner.http.get(url))
    }

    /// Downloads the content behind a media URL into memory.
    pub async fn download_media_bytes(&self, url: &str) -> Result<Vec<u8>, Error> {
        let mut stream = pin!(self.download_media(url));
        let mut bytes = Vec::new();
        while let Some(chunk) = stream.try_next().await? {
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }

    /// Resolves `media_id` and returns its info with a stream over its content.
    ///
    /// The lookup happens here; the download starts when the stream is polled.
    pub async fn get_and_download_media(
        &self,
        media_id: &str,
    ) -> Result<(MediaInfo, impl Stream<Item = Result<Bytes, Error>> + Send + 'static), Error> {
        let info = self.get_media(media_id).await?;
        let stream = self.download_media(&info.url);
        Ok((info, stream))
    }

    /// Resolves `media_id` and downloads its content.
    pub async fn get_and_download_media_bytes(
        &self,
        media_id: &str,
    ) -> Result<(MediaInfo, Vec<u8>), Error> {
        let info = self.get_media(media_id).await?;
        let bytes = self.download_media_bytes(&info.url).await?;
        Ok((info, bytes))
    }

    /// Uploads media for later use in outbound messages.
    ///
    /// # Example
    /// ```rust,no_run
    /// # use whatsapp_webhook_rs::{media::UploadMedia, message::Image, Client};
    /// # async fn example(client: Client) -> Result<(), whatsapp_webhook_rs::Error> {
    /// let bytes = tokio::fs::read("banner.png").await?;
    /// let uploaded = client
    ///     .upload_media(UploadMedia::new(bytes, "banner.png", "image/png"))
    ///     .await?;
    /// client.send_image("16505551234", Image::with_id(uploaded.id)).await?;
    /// # Ok(()) }
    /// ```
    pub async fn upload_media(&self, upload: UploadMedia) -> Result<UploadMediaResponse, Error> {
        upload.validate()?;
        debug!(
            filename = upload.filename(),
            mime_type = upload.mime_type(),
            size = upload.len(),
            "uploading media"
        );

        let form = upload_form(upload)?;
        let url = self.url(&self.inner.phone_number_id, Some("media"));
        execute_request(self.inner.http.post(url).multipart(form)).await
    }

    /// Reads `path` and uploads it under its file name.
    pub async fn upload_media_from_file(
        &self,
        path: impl AsRef<Path>,
        mime_type: impl Into<Cow<'static, str>>,
    ) -> Result<UploadMediaResponse, Error> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let bytes = tokio::fs::read(path).await?;
        self.upload_media(UploadMedia::new(bytes, filename, mime_type))
            .await
    }

    pub async fn delete_media(&self, media_id: &str) -> Result<DeleteMediaResponse, Error> {
        if media_id.is_empty() {
            return Err(Error::validation("media ID cannot be empty"));
        }
        debug!(media_id, "deleting media");
        execute_request(self.inner.http.delete(self.url(media_id, None))).await
    }

    fn url(&self, node: &str, edge: Option<&str>) -> String {
        let mut url = format!(
            "{}/{}/{}",
            self.inner.base_url, self.inner.api_version, node
        );
        if let Some(edge) = edge {
            url.push('/');
            url.push_str(edge);
        }
        url
    }
}

/// Builder for [`Client`].
#[derive(Debug)]
pub struct ClientBuilder {
    http: HttpClientBuilder,
    base_url: String,
    api_version: String,
    access_token: Option<AccessToken>,
    phone_number_id: Option<String>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            http: HttpClientBuilder::new(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_version: DEFAULT_API_VERSION.to_owned(),
            access_token: None,
            phone_number_id: None,
        }
    }
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the Graph API host, e.g. to point at a mock server.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    /// Sets the Graph API version (e.g. `"v21.0"`). The `v` prefix is optional.
    pub fn api_version(mut self, version: &str) -> Self {
        self.api_version = format!("v{}", version.trim_start_matches('v'));
        self
    }

    /// Sets the request timeout for all API calls.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.http = self.http.timeout(duration);
        self
    }

    pub fn access_token(mut self, token: impl Into<AccessToken>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// The business phone number messages are sent from.
    pub fn phone_number_id(mut self, id: impl Into<String>) -> Self {
        self.phone_number_id = Some(id.into());
        self
    }

    /// Fails when the access token or phone number ID is missing or empty.
    pub fn build(self) -> Result<Client, Error> {
        let token = match self.access_token {
            Some(AccessToken(token)) if !token.is_empty() => token,
            _ => return Err(Error::validation("access token is required")),
        };
        let phone_number_id = match self.phone_number_id {
            Some(id) if !id.is_empty() => id,
            _ => return Err(Error::validation("phone number ID is required")),
        };

        let mut auth: HeaderValue = format!("Bearer {token}")
            .parse()
            .map_err(|err| Error::validation(format!("invalid access token: {err}")))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            HeaderValue::from_static(USER_AGENT),
        );
        headers.insert(reqwest::header::AUTHORIZATION, auth);

        let http = self.http.default_headers(headers).build()?;
        Ok(Client {
            inner: Arc::new(InnerClient {
                http,
                base_url: self.base_url,
                api_version: self.api_version,
                phone_number_id,
            }),
        })
    }
}
