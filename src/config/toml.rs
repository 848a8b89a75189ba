//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments and environment variables.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Platform connection section
    #[serde(default)]
    pub platform: PlatformSection,

    /// HTTP behaviour section
    #[serde(default)]
    pub http: HttpSection,

    /// Logging section
    #[serde(default)]
    pub log: LogSection,

    /// Server section
    #[serde(default)]
    pub server: ServerSection,
}

/// Platform connection section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlatformSection {
    /// API base URL
    pub base_url: Option<String>,

    /// Access token
    pub access_token: Option<String>,

    /// Sender MSISDN
    pub sender: Option<String>,

    /// Platform identifier
    pub platform: Option<String>,

    /// Channel identifier
    pub channel: Option<String>,
}

/// HTTP behaviour section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpSection {
    /// Per-attempt timeout in milliseconds
    pub timeout_ms: Option<u64>,

    /// Maximum number of attempts per send
    pub max_attempts: Option<u32>,
}

/// Logging section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogSection {
    /// Level filter
    pub level: Option<String>,
}

/// Server section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    /// Listen port
    pub port: Option<u16>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# BMP Gateway Configuration File
# Every value can also be given on the command line or through the
# environment variable named next to it. Command line wins, then
# environment, then this file.

[platform]
# API base URL (required) [BMP_API_BASE_URL]
# base_url = "https://bmp.example.com/api/v1"

# Access token, with or without a "Bearer " prefix (required) [BMP_ACCESS_TOKEN]
# access_token = "your-token-here"

# Sender MSISDN, at least 5 characters (required) [BMP_SENDER_MSISDN]
# sender = "6287854171391"

# Platform identifier (required) [BMP_PLATFORM]
# platform = "WA"

# Channel identifier (optional) [BMP_CHANNEL]
# channel = "business"

[http]
# Per-attempt timeout in milliseconds (default: 15000) [REQUEST_TIMEOUT_MS]
# timeout_ms = 15000

# Maximum attempts per send, 0 behaves like 1 (default: 3) [RETRY_MAX_ATTEMPTS]
# max_attempts = 3

[log]
# off, error, warn, info, debug or trace (default: info) [LOG_LEVEL]
# RUST_LOG directives take precedence when set.
level = "info"

[server]
# Listen port for the network-exposed variant (default: 3000) [PORT]
# port = 3000
"#
    .to_string()
}
