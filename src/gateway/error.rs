//! Error type surfaced by the message façade.

use std::path::PathBuf;

use thiserror::Error;

use crate::payload::ValidationError;
use crate::transport::TransportError;

/// Failure of one façade operation.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The payload broke its schema; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The platform call failed after all permitted attempts.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The file for a multipart send could not be read; nothing was sent.
    #[error("Failed to read '{}': {source}", path.display())]
    FileRead {
        /// Path that was requested
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl GatewayError {
    /// Returns the validation error, if this is one.
    #[must_use]
    pub const fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the transport error, if this is one.
    #[must_use]
    pub const fn as_transport(&self) -> Option<&TransportError> {
        match self {
            Self::Transport(e) => Some(e),
            _ => None,
        }
    }
}
