//! Message façade over the retrying transport.
//!
//! This module provides:
//! - [`Gateway`]: one operation per message type, built from [`Settings`](crate::config::Settings)
//! - [`PlatformReply`]: the platform's reply body, returned unchanged
//! - [`GatewayError`]: validation, transport and file failures
//! - [`mask_recipient`]: recipient masking for log output

mod client;
mod error;
mod mask;
mod reply;


pub use client::{Gateway, ListItem, MEDIA_PATH, MESSAGE_PATH};
pub use error::GatewayError;
pub use mask::mask_recipient;
pub use reply::PlatformReply;
