//! Outgoing message payloads.
//!
//! This module provides:
//! - [`Envelope`]: routing fields merged into every message
//! - Message bodies ([`TextBody`], [`ListBody`], [`ButtonBody`], ...) wrapped in [`Payload`]
//! - [`Validate`]: structural rules checked before anything is sent
//! - [`AnyPayload`]: ordered resolution of free-form JSON into a known shape
//! - [`MediaUpload`]: file-bearing messages sent as multipart forms

mod envelope;
pub mod literal;
mod media;
mod message;
mod resolve;
mod validate;


pub use envelope::Envelope;
pub use media::{MediaType, MediaUpload};
pub use message::{
    ButtonBody, CarouselBody, CarouselElement, ElementKind, HeaderType, ImageBody, ListBody,
    ListRow, Nullable, Payload, ProductBody, TemplateBody, TextBody,
};
pub use resolve::AnyPayload;
pub use validate::{Report, Validate, ValidationError, Violation};
