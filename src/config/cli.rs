//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.
//! Every connection option falls back to its environment variable.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::payload::{HeaderType, MediaType};

/// BMP Gateway: outbound business-messaging client
///
/// Sends text, interactive, media and catalog messages to the BMP
/// platform with bounded retries.
#[derive(Debug, Parser)]
#[command(name = "bmp-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Platform API base URL
    #[arg(long = "base-url", env = "BMP_API_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Platform access token (a leading "Bearer " is accepted)
    #[arg(
        long = "access-token",
        env = "BMP_ACCESS_TOKEN",
        hide_env_values = true,
        global = true
    )]
    pub access_token: Option<String>,

    /// Sender MSISDN
    #[arg(long, env = "BMP_SENDER_MSISDN", global = true)]
    pub sender: Option<String>,

    /// Platform identifier (e.g. WA)
    #[arg(long, env = "BMP_PLATFORM", global = true)]
    pub platform: Option<String>,

    /// Channel identifier
    #[arg(long, env = "BMP_CHANNEL", global = true)]
    pub channel: Option<String>,

    /// Per-attempt request timeout in milliseconds
    #[arg(long = "timeout-ms", env = "REQUEST_TIMEOUT_MS", global = true)]
    pub timeout_ms: Option<u64>,

    /// Maximum number of attempts per send
    #[arg(long = "retry-max", env = "RETRY_MAX_ATTEMPTS", global = true)]
    pub retry_max: Option<u32>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long = "log-level", env = "LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Listen port for the network-exposed variant
    #[arg(long, env = "PORT", global = true)]
    pub port: Option<u16>,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,
}

/// Subcommands for bmp-gateway
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "bmp-gateway.toml")]
        output: PathBuf,
    },

    /// Message sends (need a valid configuration)
    #[command(flatten)]
    Send(SendCommand),
}

/// One message send, mapped onto a gateway operation.
#[derive(Debug, Subcommand)]
pub enum SendCommand {
    /// Send a plain text message
    SendText {
        /// Recipient MSISDN
        #[arg(long)]
        to: String,
        /// Message text
        #[arg(long)]
        text: String,
    },

    /// Send an interactive list
    SendList {
        /// Recipient MSISDN
        #[arg(long)]
        to: String,
        /// Intro text
        #[arg(long)]
        text: String,
        /// Title of the selection sheet
        #[arg(long = "list-title")]
        list_title: String,
        /// Row as 'Title' or 'Title|Description' (repeatable)
        #[arg(long = "row", value_name = "TITLE[|DESCRIPTION]", required = true)]
        rows: Vec<String>,
    },

    /// Send reply buttons
    SendButton {
        /// Recipient MSISDN
        #[arg(long)]
        to: String,
        /// Message text
        #[arg(long)]
        text: String,
        /// Button label (repeatable, 1 to 3)
        #[arg(long = "button", value_name = "LABEL", required = true)]
        buttons: Vec<String>,
        /// Header kind
        #[arg(long = "header-type", value_enum)]
        header_type: Option<HeaderType>,
        /// Header text or image URL
        #[arg(long)]
        header: Option<String>,
        /// Footer text
        #[arg(long)]
        footer: Option<String>,
    },

    /// Send an image by URL
    SendImage {
        /// Recipient MSISDN
        #[arg(long)]
        to: String,
        /// Public image URL
        #[arg(long = "media-url")]
        media_url: String,
        /// Caption
        #[arg(long)]
        text: Option<String>,
    },

    /// Send several images by URL, one message each, in order
    SendImageList {
        /// Recipient MSISDN
        #[arg(long)]
        to: String,
        /// Public image URL (repeatable)
        #[arg(long = "media-url", value_name = "URL", required = true)]
        media_urls: Vec<String>,
    },

    /// Upload and send a local file
    SendFile {
        /// Recipient MSISDN
        #[arg(long)]
        to: String,
        /// Path of the file to upload
        #[arg(long)]
        path: PathBuf,
        /// Media kind
        #[arg(long = "media-type", value_enum)]
        media_type: MediaType,
        /// Caption
        #[arg(long)]
        text: Option<String>,
    },

    /// Send a catalog product
    SendProduct {
        /// Recipient MSISDN
        #[arg(long)]
        to: String,
        /// Catalog identifier
        #[arg(long = "catalog-id")]
        catalog_id: String,
        /// Product identifier
        #[arg(long = "product-id")]
        product_id: String,
        /// Intro text
        #[arg(long)]
        text: Option<String>,
        /// Footer text
        #[arg(long)]
        footer: Option<String>,
    },

    /// Send a raw JSON payload, resolved against every known shape
    SendRaw {
        /// Recipient MSISDN
        #[arg(long)]
        to: String,
        /// JSON object with the message fields
        #[arg(long)]
        payload: String,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Command::Init { .. })
    }
}
