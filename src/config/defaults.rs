//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

/// Default per-attempt request timeout in milliseconds.
pub const REQUEST_TIMEOUT_MS: u64 = 15_000;

/// Default maximum number of attempts per send.
pub const RETRY_MAX_ATTEMPTS: u32 = 3;

/// Default log level.
pub const LOG_LEVEL: &str = "info";

/// Default listen port for the network-exposed variant.
pub const PORT: u16 = 3000;

/// Minimum length of the sender MSISDN.
pub const SENDER_MIN_LEN: usize = crate::payload::Envelope::MSISDN_MIN_LEN;
