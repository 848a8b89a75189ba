//! Validated settings after merging CLI, environment and TOML sources.
//!
//! This module contains the final, validated configuration that is passed
//! to the gateway. All validation is performed during construction.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use tracing::level_filters::LevelFilter;
use url::Url;

use crate::transport::{AccessToken, RetryPolicy};

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Fully validated settings ready for use by the gateway.
///
/// Constructed once at startup and shared by reference; nothing mutates it
/// afterwards.
///
/// # Construction
///
/// Use [`Settings::from_raw`] to create from CLI args (with environment
/// fallbacks already applied by clap) and an optional TOML config. Every
/// invalid field is reported, not just the first.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Platform API base URL
    pub base_url: Url,

    /// Access token, already stripped of any `Bearer ` prefix
    pub access_token: AccessToken,

    /// Sender MSISDN
    pub sender: String,

    /// Platform identifier
    pub platform: String,

    /// Channel identifier, if configured
    pub channel: Option<String>,

    /// Per-attempt request timeout
    pub request_timeout: Duration,

    /// Maximum number of attempts per send
    pub max_attempts: u32,

    /// Log level filter
    pub log_level: LevelFilter,

    /// Listen port for the network-exposed variant
    pub port: u16,
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Settings {{ base_url: {}, access_token: {}, sender: {}, platform: {}, channel: {}, \
             timeout: {}ms, max_attempts: {}, log_level: {}, port: {} }}",
            self.base_url,
            self.access_token,
            self.sender,
            self.platform,
            self.channel.as_deref().unwrap_or("none"),
            self.request_timeout.as_millis(),
            self.max_attempts,
            self.log_level,
            self.port,
        )
    }
}

impl Settings {
    /// Creates validated settings from CLI arguments and optional TOML config.
    ///
    /// CLI arguments (and their environment fallbacks) take precedence over
    /// TOML config values, which take precedence over built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns every problem found, folded with [`ConfigError::collect`]:
    /// - Required fields are missing (`base_url`, `access_token`, `sender`, `platform`)
    /// - URL is invalid
    /// - Sender is shorter than 5 characters
    /// - Channel is empty
    /// - Timeout or port is zero
    /// - Log level is unknown
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let base_url = Self::resolve_base_url(cli, toml);
        let access_token = Self::resolve_access_token(cli, toml);
        let sender = Self::resolve_sender(cli, toml);
        let platform = Self::resolve_platform(cli, toml);
        let channel = Self::resolve_channel(cli, toml);
        let request_timeout = Self::resolve_timeout(cli, toml);
        let max_attempts = Self::resolve_max_attempts(cli, toml);
        let log_level = Self::resolve_log_level(cli, toml);
        let port = Self::resolve_port(cli, toml);

        match (
            base_url,
            access_token,
            sender,
            platform,
            channel,
            request_timeout,
            log_level,
            port,
        ) {
            (
                Ok(base_url),
                Ok(access_token),
                Ok(sender),
                Ok(platform),
                Ok(channel),
                Ok(request_timeout),
                Ok(log_level),
                Ok(port),
            ) => Ok(Self {
                base_url,
                access_token,
                sender,
                platform,
                channel,
                request_timeout,
                max_attempts,
                log_level,
                port,
            }),
            (
                base_url,
                access_token,
                sender,
                platform,
                channel,
                request_timeout,
                log_level,
                port,
            ) => Err(ConfigError::collect([
                base_url.err(),
                access_token.err(),
                sender.err(),
                platform.err(),
                channel.err(),
                request_timeout.err(),
                log_level.err(),
                port.err(),
            ])),
        }
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    /// Retry policy derived from `max_attempts`, default backoff otherwise.
    #[must_use]
    pub const fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new().with_max_attempts(self.max_attempts)
    }

    fn resolve_base_url(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Url, ConfigError> {
        let url_str = cli
            .base_url
            .as_deref()
            .or_else(|| toml.and_then(|t| t.platform.base_url.as_deref()))
            .ok_or_else(|| {
                ConfigError::missing(
                    field::BASE_URL,
                    "Use --base-url, BMP_API_BASE_URL or set platform.base_url in config file",
                )
            })?;

        Url::parse(url_str).map_err(|e| ConfigError::InvalidUrl {
            url: url_str.to_string(),
            reason: e.to_string(),
        })
    }

    fn resolve_access_token(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<AccessToken, ConfigError> {
        let raw = cli
            .access_token
            .as_deref()
            .or_else(|| toml.and_then(|t| t.platform.access_token.as_deref()))
            .ok_or_else(|| {
                ConfigError::missing(
                    field::ACCESS_TOKEN,
                    "Use --access-token, BMP_ACCESS_TOKEN or set platform.access_token in config file",
                )
            })?;

        let token = AccessToken::new(raw);
        if token.is_empty() {
            return Err(ConfigError::invalid(field::ACCESS_TOKEN, "must not be empty"));
        }
        Ok(token)
    }

    fn resolve_sender(cli: &Cli, toml: Option<&TomlConfig>) -> Result<String, ConfigError> {
        let sender = cli
            .sender
            .as_deref()
            .or_else(|| toml.and_then(|t| t.platform.sender.as_deref()))
            .ok_or_else(|| {
                ConfigError::missing(
                    field::SENDER,
                    "Use --sender, BMP_SENDER_MSISDN or set platform.sender in config file",
                )
            })?;

        if sender.chars().count() < defaults::SENDER_MIN_LEN {
            return Err(ConfigError::invalid(
                field::SENDER,
                format!("must be at least {} characters", defaults::SENDER_MIN_LEN),
            ));
        }
        Ok(sender.to_string())
    }

    fn resolve_platform(cli: &Cli, toml: Option<&TomlConfig>) -> Result<String, ConfigError> {
        let platform = cli
            .platform
            .as_deref()
            .or_else(|| toml.and_then(|t| t.platform.platform.as_deref()))
            .ok_or_else(|| {
                ConfigError::missing(
                    field::PLATFORM,
                    "Use --platform, BMP_PLATFORM or set platform.platform in config file",
                )
            })?;

        if platform.trim().is_empty() {
            return Err(ConfigError::invalid(field::PLATFORM, "must not be empty"));
        }
        Ok(platform.to_string())
    }

    fn resolve_channel(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Option<String>, ConfigError> {
        let channel = cli
            .channel
            .as_deref()
            .or_else(|| toml.and_then(|t| t.platform.channel.as_deref()));

        match channel {
            Some(c) if c.trim().is_empty() => Err(ConfigError::invalid(
                field::CHANNEL,
                "must not be empty when given",
            )),
            other => Ok(other.map(ToString::to_string)),
        }
    }

    fn resolve_timeout(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Duration, ConfigError> {
        // Priority: CLI/env > TOML > default
        let millis = cli
            .timeout_ms
            .or_else(|| toml.and_then(|t| t.http.timeout_ms))
            .unwrap_or(defaults::REQUEST_TIMEOUT_MS);

        if millis == 0 {
            return Err(ConfigError::invalid(field::TIMEOUT, "must be greater than 0"));
        }

        Ok(Duration::from_millis(millis))
    }

    /// Zero is accepted and means a single attempt.
    fn resolve_max_attempts(cli: &Cli, toml: Option<&TomlConfig>) -> u32 {
        cli.retry_max
            .or_else(|| toml.and_then(|t| t.http.max_attempts))
            .unwrap_or(defaults::RETRY_MAX_ATTEMPTS)
            .max(RetryPolicy::MIN_MAX_ATTEMPTS)
    }

    fn resolve_log_level(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<LevelFilter, ConfigError> {
        let level = cli
            .log_level
            .as_deref()
            .or_else(|| toml.and_then(|t| t.log.level.as_deref()))
            .unwrap_or(defaults::LOG_LEVEL);

        level
            .trim()
            .parse::<LevelFilter>()
            .map_err(|_| ConfigError::InvalidLogLevel {
                value: level.to_string(),
            })
    }

    fn resolve_port(cli: &Cli, toml: Option<&TomlConfig>) -> Result<u16, ConfigError> {
        let port = cli
            .port
            .or_else(|| toml.and_then(|t| t.server.port))
            .unwrap_or(defaults::PORT);

        if port == 0 {
            return Err(ConfigError::invalid(field::PORT, "must be greater than 0"));
        }

        Ok(port)
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
