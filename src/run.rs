//! Application execution logic.
//!
//! This module maps one send subcommand onto the matching gateway
//! operation and renders the platform reply as JSON.

use serde_json::Value;
use thiserror::Error;

use bmp_gateway::config::{SendCommand, Settings};
use bmp_gateway::gateway::{Gateway, GatewayError, ListItem, PlatformReply};
use bmp_gateway::payload::{ListRow, MediaType};
use bmp_gateway::time::Sleeper;
use bmp_gateway::transport::{HttpClient, ReqwestClient};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for one send.
#[derive(Debug, Error)]
pub enum RunError {
    /// The `--payload` argument is not valid JSON.
    #[error("Invalid --payload JSON: {0}")]
    InvalidPayload(#[source] serde_json::Error),

    /// The gateway rejected or failed the send.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The reply could not be rendered.
    #[error("Failed to render reply: {0}")]
    Render(#[source] serde_json::Error),
}

/// Executes one send against the real platform.
///
/// # Errors
///
/// Returns [`RunError`] if the payload is invalid or the send fails.
pub async fn execute(settings: &Settings, command: &SendCommand) -> Result<String, RunError> {
    let gateway = Gateway::new(ReqwestClient::new(), settings);
    let reply = dispatch(&gateway, command).await?;

    serde_json::to_string_pretty(&reply).map_err(RunError::Render)
}

/// Runs the gateway operation matching `command`.
async fn dispatch<H, S>(gateway: &Gateway<H, S>, command: &SendCommand) -> Result<Value, RunError>
where
    H: HttpClient,
    S: Sleeper,
{
    let reply = match command {
        SendCommand::SendText { to, text } => gateway.send_text(to, text).await?,
        SendCommand::SendList {
            to,
            text,
            list_title,
            rows,
        } => {
            let items = rows.iter().map(String::as_str).map(parse_row).collect();
            gateway.send_list(to, text, list_title, items).await?
        }
        SendCommand::SendButton {
            to,
            text,
            buttons,
            header_type,
            header,
            footer,
        } => {
            gateway
                .send_button(
                    to,
                    text,
                    buttons.clone(),
                    *header_type,
                    header.clone(),
                    footer.clone(),
                )
                .await?
        }
        SendCommand::SendImage {
            to,
            media_url,
            text,
        } => gateway.send_image(to, media_url, text.clone()).await?,
        SendCommand::SendImageList { to, media_urls } => {
            let replies = gateway.send_image_url_list(to, media_urls).await?;
            return Ok(Value::Array(
                replies.into_iter().map(PlatformReply::into_value).collect(),
            ));
        }
        SendCommand::SendFile {
            to,
            path,
            media_type,
            text,
        } => send_file(gateway, to, path, *media_type, text.clone()).await?,
        SendCommand::SendProduct {
            to,
            catalog_id,
            product_id,
            text,
            footer,
        } => {
            gateway
                .send_product(to, catalog_id, product_id, text.clone(), footer.clone())
                .await?
        }
        SendCommand::SendRaw { to, payload } => {
            let payload: Value = serde_json::from_str(payload).map_err(RunError::InvalidPayload)?;
            gateway.send_raw(to, payload).await?
        }
    };

    Ok(reply.into_value())
}

async fn send_file<H: HttpClient, S: Sleeper>(
    gateway: &Gateway<H, S>,
    to: &str,
    path: &std::path::Path,
    media_type: MediaType,
    text: Option<String>,
) -> Result<PlatformReply, GatewayError> {
    match media_type {
        MediaType::Image => gateway.send_image_file(to, path, text).await,
        MediaType::Video => gateway.send_video_file(to, path, text).await,
        MediaType::Audio => gateway.send_audio_file(to, path, text).await,
        MediaType::Document => gateway.send_document_file(to, path, text).await,
    }
}

/// Parses `Title` or `Title|Description` into a list item.
fn parse_row(raw: &str) -> ListItem {
    match raw.split_once('|') {
        Some((title, description)) => ListItem::Row(ListRow {
            title: title.trim().to_string(),
            description: Some(description.trim().to_string()),
        }),
        None => ListItem::Title(raw.trim().to_string()),
    }
}
