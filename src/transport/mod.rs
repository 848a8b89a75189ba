//! Transport layer for the messaging platform API.
//!
//! This module provides types and traits for:
//! - Building HTTP requests ([`HttpRequest`], [`MultipartForm`])
//! - Handling HTTP responses ([`HttpResponse`])
//! - Abstracting HTTP clients ([`HttpClient`])
//! - Production HTTP client implementation ([`ReqwestClient`])
//! - Bearer credentials ([`AccessToken`])
//! - Sending with bounded retries ([`RetryingTransport`], [`RetryPolicy`])

mod auth;
mod client;
mod error;
mod http;
mod retry;
mod sender;

#[cfg(test)]
mod client_tests;
#[cfg(test)]
mod sender_tests;

pub use auth::AccessToken;
pub use client::ReqwestClient;
pub use error::{AttemptError, HttpError, TransportError};
pub use self::http::{FilePart, HttpClient, HttpRequest, HttpResponse, MultipartForm, RequestBody};
pub use retry::RetryPolicy;
pub use sender::{DEFAULT_TIMEOUT, Delivery, IsRetryable, RetryingTransport};
