//! Configuration layer for the BMP gateway.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated settings ([`Settings`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments**
//! 2. **Environment variables** (`BMP_API_BASE_URL`, `BMP_ACCESS_TOKEN`,
//!    `BMP_SENDER_MSISDN`, `BMP_PLATFORM`, `BMP_CHANNEL`, `REQUEST_TIMEOUT_MS`,
//!    `RETRY_MAX_ATTEMPTS`, `LOG_LEVEL`, `PORT`)
//! 3. **TOML config file**
//! 4. **Built-in defaults**
//!
//! Validation reports every invalid field at once through
//! [`ConfigError::Multiple`].

mod cli;
pub mod defaults;
mod error;
mod settings;
mod toml;

#[cfg(test)]
mod toml_tests;

pub use cli::{Cli, Command, SendCommand};
pub use error::{ConfigError, field};
pub use settings::{Settings, write_default_config};
pub use toml::{TomlConfig, default_config_template};
