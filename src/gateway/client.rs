//! Message façade: one operation per message type.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Settings;
use crate::payload::{
    AnyPayload, ButtonBody, Envelope, HeaderType, ImageBody, ListBody, ListRow, MediaType,
    MediaUpload, Payload, ProductBody, Report, TextBody, Validate,
};
use crate::time::{Sleeper, TokioSleeper};
use crate::transport::{AccessToken, HttpClient, RetryingTransport};

use super::{GatewayError, PlatformReply, mask_recipient};

/// Path of the JSON message endpoint.
pub const MESSAGE_PATH: &str = "/message";

/// Path of the multipart media endpoint.
pub const MEDIA_PATH: &str = "/message/media";

/// A list row given either as a bare title or as a full row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListItem {
    /// Title only
    Title(String),
    /// Title plus optional description
    Row(ListRow),
}

impl From<ListItem> for ListRow {
    fn from(item: ListItem) -> Self {
        match item {
            ListItem::Title(title) => Self::titled(title),
            ListItem::Row(row) => row,
        }
    }
}

impl From<&str> for ListItem {
    fn from(title: &str) -> Self {
        Self::Title(title.to_string())
    }
}

impl From<ListRow> for ListItem {
    fn from(row: ListRow) -> Self {
        Self::Row(row)
    }
}

/// Outbound messaging client.
///
/// Each operation merges the configured envelope with the caller's fields,
/// validates the result, and sends it through a [`RetryingTransport`].
/// Invalid payloads fail before any network call.
///
/// # Type Parameters
///
/// - `H`: The HTTP client implementation
/// - `S`: The sleeper used for backoff delays (defaults to [`TokioSleeper`])
#[derive(Debug)]
pub struct Gateway<H, S = TokioSleeper> {
    transport: RetryingTransport<H, S>,
    token: AccessToken,
    platform: String,
    sender: String,
    channel: Option<String>,
}

impl<H> Gateway<H, TokioSleeper> {
    /// Creates a gateway from validated settings.
    #[must_use]
    pub fn new(client: H, settings: &Settings) -> Self {
        let transport = RetryingTransport::new(client, settings.base_url.clone())
            .with_timeout(settings.request_timeout)
            .with_retry_policy(settings.retry_policy());

        Self {
            transport,
            token: settings.access_token.clone(),
            platform: settings.platform.clone(),
            sender: settings.sender.clone(),
            channel: settings.channel.clone(),
        }
    }
}

impl<H, S> Gateway<H, S> {
    /// Replaces the backoff sleeper.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> Gateway<H, S2> {
        Gateway {
            transport: self.transport.with_sleeper(sleeper),
            token: self.token,
            platform: self.platform,
            sender: self.sender,
            channel: self.channel,
        }
    }

    /// The underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &RetryingTransport<H, S> {
        &self.transport
    }

    /// Builds the envelope for a recipient.
    #[must_use]
    pub fn envelope(&self, to: &str) -> Envelope {
        Envelope {
            platform: self.platform.clone(),
            from: self.sender.clone(),
            to: to.to_string(),
            channel: self.channel.clone(),
        }
    }
}

impl<H: HttpClient, S: Sleeper> Gateway<H, S> {
    /// Sends a plain text message.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] for empty text and
    /// [`GatewayError::Transport`] if the platform call fails.
    #[tracing::instrument(skip_all, fields(to = %mask_recipient(to)))]
    pub async fn send_text(&self, to: &str, text: &str) -> Result<PlatformReply, GatewayError> {
        let payload = Payload::new(self.envelope(to), TextBody::new(text))?;
        self.post_message(&payload).await
    }

    /// Sends an interactive list. Bare titles become `{title}` rows.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] unless there are 1 to 10 rows
    /// with valid lengths, and [`GatewayError::Transport`] if the platform
    /// call fails.
    #[tracing::instrument(skip_all, fields(to = %mask_recipient(to)))]
    pub async fn send_list(
        &self,
        to: &str,
        text: &str,
        list_title: &str,
        items: Vec<ListItem>,
    ) -> Result<PlatformReply, GatewayError> {
        let rows = items.into_iter().map(ListRow::from).collect();
        let payload = Payload::new(self.envelope(to), ListBody::new(text, list_title, rows))?;
        self.post_message(&payload).await
    }

    /// Sends reply buttons.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] unless there are 1 to 3 labels,
    /// unique ignoring case and surrounding whitespace, and
    /// [`GatewayError::Transport`] if the platform call fails.
    #[tracing::instrument(skip_all, fields(to = %mask_recipient(to)))]
    pub async fn send_button(
        &self,
        to: &str,
        text: &str,
        buttons: Vec<String>,
        header_type: Option<HeaderType>,
        header: Option<String>,
        footer: Option<String>,
    ) -> Result<PlatformReply, GatewayError> {
        let body = ButtonBody::new(text, buttons)
            .with_header(header_type, header)
            .with_footer(footer);
        let payload = Payload::new(self.envelope(to), body)?;
        self.post_message(&payload).await
    }

    /// Sends an image by URL.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] if `media_url` is not a URL and
    /// [`GatewayError::Transport`] if the platform call fails.
    #[tracing::instrument(skip_all, fields(to = %mask_recipient(to)))]
    pub async fn send_image(
        &self,
        to: &str,
        media_url: &str,
        text: Option<String>,
    ) -> Result<PlatformReply, GatewayError> {
        self.image(to, media_url, text).await
    }

    /// Alias of [`send_image`](Self::send_image).
    ///
    /// # Errors
    ///
    /// Same as [`send_image`](Self::send_image).
    #[tracing::instrument(skip_all, fields(to = %mask_recipient(to)))]
    pub async fn send_image_url(
        &self,
        to: &str,
        media_url: &str,
        text: Option<String>,
    ) -> Result<PlatformReply, GatewayError> {
        self.image(to, media_url, text).await
    }

    /// Sends one image message per URL, in order.
    ///
    /// Every URL is validated before the first send. Sending stops at the
    /// first failure; messages already sent are not undone.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] for an empty list or any invalid
    /// URL (nothing is sent then), otherwise the error of the first send
    /// that failed.
    #[tracing::instrument(skip_all, fields(to = %mask_recipient(to), count = media_urls.len()))]
    pub async fn send_image_url_list(
        &self,
        to: &str,
        media_urls: &[String],
    ) -> Result<Vec<PlatformReply>, GatewayError> {
        let mut report = Report::default();
        report.count("mediaUrls", media_urls.len(), 1..=usize::MAX);

        let mut payloads = Vec::with_capacity(media_urls.len());
        for (index, url) in media_urls.iter().enumerate() {
            match Payload::new(self.envelope(to), ImageBody::new(url, None)) {
                Ok(payload) => payloads.push(payload),
                Err(e) => report.nest(&format!("mediaUrls[{index}]"), e),
            }
        }
        report.finish()?;

        let mut replies = Vec::with_capacity(payloads.len());
        for (index, payload) in payloads.iter().enumerate() {
            tracing::debug!(index, "Sending image {} of {}", index + 1, payloads.len());
            replies.push(self.post_message(payload).await?);
        }
        Ok(replies)
    }

    /// Uploads a local image.
    ///
    /// # Errors
    ///
    /// See [`send_file`](Self::send_file).
    pub async fn send_image_file(
        &self,
        to: &str,
        path: &Path,
        text: Option<String>,
    ) -> Result<PlatformReply, GatewayError> {
        self.send_file(to, path, MediaType::Image, text).await
    }

    /// Uploads a local video.
    ///
    /// # Errors
    ///
    /// See [`send_file`](Self::send_file).
    pub async fn send_video_file(
        &self,
        to: &str,
        path: &Path,
        text: Option<String>,
    ) -> Result<PlatformReply, GatewayError> {
        self.send_file(to, path, MediaType::Video, text).await
    }

    /// Uploads a local audio clip.
    ///
    /// # Errors
    ///
    /// See [`send_file`](Self::send_file).
    pub async fn send_audio_file(
        &self,
        to: &str,
        path: &Path,
        text: Option<String>,
    ) -> Result<PlatformReply, GatewayError> {
        self.send_file(to, path, MediaType::Audio, text).await
    }

    /// Uploads a local document.
    ///
    /// # Errors
    ///
    /// See [`send_file`](Self::send_file).
    pub async fn send_document_file(
        &self,
        to: &str,
        path: &Path,
        text: Option<String>,
    ) -> Result<PlatformReply, GatewayError> {
        self.send_file(to, path, MediaType::Document, text).await
    }

    /// Uploads a local file as a multipart message.
    ///
    /// The file is read once, before the first attempt; retries resend the
    /// same bytes.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::FileRead`] if the file cannot be read,
    /// [`GatewayError::Validation`] if the envelope or file name is invalid,
    /// and [`GatewayError::Transport`] if the platform call fails.
    #[tracing::instrument(skip_all, fields(to = %mask_recipient(to), media_type = %media_type))]
    pub async fn send_file(
        &self,
        to: &str,
        path: &Path,
        media_type: MediaType,
        text: Option<String>,
    ) -> Result<PlatformReply, GatewayError> {
        let content = tokio::fs::read(path)
            .await
            .map_err(|source| GatewayError::FileRead {
                path: path.to_path_buf(),
                source,
            })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        tracing::debug!(file_name = %file_name, bytes = content.len(), "File loaded");

        let upload = MediaUpload {
            envelope: self.envelope(to),
            media_type,
            file_name,
            content,
            text,
        };
        upload.validate()?;

        let delivery = self
            .transport
            .post_multipart(MEDIA_PATH, upload.into_form(), &self.token)
            .await?;
        Ok(accepted(delivery.into()))
    }

    /// Sends a catalog product.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] if either identifier is empty and
    /// [`GatewayError::Transport`] if the platform call fails.
    #[tracing::instrument(skip_all, fields(to = %mask_recipient(to)))]
    pub async fn send_product(
        &self,
        to: &str,
        catalog_id: &str,
        product_id: &str,
        text: Option<String>,
        footer: Option<String>,
    ) -> Result<PlatformReply, GatewayError> {
        let body = ProductBody::new(catalog_id, product_id, text, footer);
        let payload = Payload::new(self.envelope(to), body)?;
        self.post_message(&payload).await
    }

    /// Sends a free-form payload.
    ///
    /// The caller's object is laid over the envelope (caller keys win) and
    /// resolved against every known shape in a fixed order.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] if no shape accepts the payload
    /// and [`GatewayError::Transport`] if the platform call fails.
    #[tracing::instrument(skip_all, fields(to = %mask_recipient(to)))]
    pub async fn send_raw(&self, to: &str, payload: Value) -> Result<PlatformReply, GatewayError> {
        let payload = AnyPayload::resolve_with_envelope(&self.envelope(to), payload)?;
        tracing::debug!(kind = payload.kind(), "Payload resolved");
        self.post_message(&payload).await
    }

    async fn image(
        &self,
        to: &str,
        media_url: &str,
        text: Option<String>,
    ) -> Result<PlatformReply, GatewayError> {
        let payload = Payload::new(self.envelope(to), ImageBody::new(media_url, text))?;
        self.post_message(&payload).await
    }

    async fn post_message<T: Serialize + ?Sized>(
        &self,
        payload: &T,
    ) -> Result<PlatformReply, GatewayError> {
        let delivery = self
            .transport
            .post_json(MESSAGE_PATH, payload, &self.token)
            .await?;
        Ok(accepted(delivery.into()))
    }
}

fn accepted(reply: PlatformReply) -> PlatformReply {
    tracing::info!(
        message_id = reply.message_id().unwrap_or("-"),
        status = reply.status().unwrap_or("-"),
        "Message accepted"
    );
    reply
}
