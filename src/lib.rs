//! BMP Gateway: outbound business-messaging client
//!
//! A library for sending validated text, interactive, media and catalog
//! messages to the BMP platform over HTTP with bounded, backed-off retries.

pub mod config;
pub mod gateway;
pub mod payload;
pub mod time;
pub mod transport;

#[cfg(test)]
mod test_fixtures;
