//! Startup configuration failures.

use std::fmt::Write as _;
use std::path::PathBuf;

use thiserror::Error;

/// Why the gateway refused to start.
///
/// Field problems are gathered into [`ConfigError::Multiple`] so one run
/// reports all of them.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The `--config` file could not be opened.
    #[error("Failed to read config file '{}': {source}", path.display())]
    FileRead {
        /// File given by `--config`
        path: PathBuf,
        /// I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The `--config` file is not valid for the expected sections.
    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// `init` could not write the template.
    #[error("Failed to write config file '{}': {source}", path.display())]
    FileWrite {
        /// Target of `init --output`
        path: PathBuf,
        /// I/O failure
        #[source]
        source: std::io::Error,
    },

    /// No source provided a required value.
    #[error("Missing required field: {field}. {hint}")]
    MissingRequired {
        /// One of the [`field`] names
        field: &'static str,
        /// Flag or variable that would provide it
        hint: &'static str,
    },

    /// The base URL does not parse.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// Value as given
        url: String,
        /// Parser message
        reason: String,
    },

    /// A value is present but out of range or malformed.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// One of the [`field`] names
        field: &'static str,
        /// What the value must satisfy
        reason: String,
    },

    /// Log level that cannot be parsed as a level filter.
    #[error("Invalid log level '{value}': expected off, error, warn, info, debug or trace")]
    InvalidLogLevel {
        /// Value as given
        value: String,
    },

    /// Several fields are invalid at once.
    #[error("{} configuration errors:{}", .0.len(), list(.0))]
    Multiple(Vec<ConfigError>),
}

/// Field names carried by [`ConfigError::MissingRequired`] and
/// [`ConfigError::InvalidValue`]; they match the TOML keys.
pub mod field {
    /// The platform API base URL.
    pub const BASE_URL: &str = "base_url";
    /// The platform access token.
    pub const ACCESS_TOKEN: &str = "access_token";
    /// The sender MSISDN.
    pub const SENDER: &str = "sender";
    /// The platform identifier.
    pub const PLATFORM: &str = "platform";
    /// The optional channel.
    pub const CHANNEL: &str = "channel";
    /// The per-attempt request timeout.
    pub const TIMEOUT: &str = "timeout_ms";
    /// The listen port.
    pub const PORT: &str = "port";
}

impl ConfigError {
    /// Shorthand for [`ConfigError::MissingRequired`].
    #[must_use]
    pub const fn missing(field: &'static str, hint: &'static str) -> Self {
        Self::MissingRequired { field, hint }
    }

    /// Creates an `InvalidValue` error.
    #[must_use]
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }

    /// Folds several errors into one.
    ///
    /// A single error is returned as-is; more than one becomes [`Multiple`](Self::Multiple).
    #[must_use]
    pub fn collect(errors: impl IntoIterator<Item = Option<Self>>) -> Self {
        let mut errors: Vec<Self> = errors.into_iter().flatten().collect();
        if errors.len() == 1 {
            errors.remove(0)
        } else {
            Self::Multiple(errors)
        }
    }

    /// Returns the individual errors (one for non-aggregate errors).
    #[must_use]
    pub fn errors(&self) -> Vec<&Self> {
        match self {
            Self::Multiple(errors) => errors.iter().collect(),
            other => vec![other],
        }
    }

    /// Returns true if this error (or any aggregated one) concerns `name`.
    #[must_use]
    pub fn concerns(&self, name: &str) -> bool {
        self.errors().into_iter().any(|e| match e {
            Self::MissingRequired { field, .. } | Self::InvalidValue { field, .. } => {
                *field == name
            }
            Self::InvalidUrl { .. } => name == field::BASE_URL,
            Self::InvalidLogLevel { .. } => name == "log_level",
            _ => false,
        })
    }
}

fn list(errors: &[ConfigError]) -> String {
    let mut out = String::new();
    for error in errors {
        let _ = write!(out, "\n  - {error}");
    }
    out
}
