//! File uploads sent as multipart forms.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Envelope, Report, Validate};
use crate::transport::{FilePart, MultipartForm};

/// Kind of media carried by an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// Still image
    Image,
    /// Video clip
    Video,
    /// Audio clip
    Audio,
    /// Any other document
    Document,
}

impl MediaType {
    /// Wire value of the `mediaType` form field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Document => "document",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A buffered file plus routing fields, ready for `/message/media`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaUpload {
    /// Routing envelope
    pub envelope: Envelope,
    /// Media kind
    pub media_type: MediaType,
    /// File name reported to the platform
    pub file_name: String,
    /// File content
    pub content: Vec<u8>,
    /// Optional caption; empty captions are not sent
    pub text: Option<String>,
}

impl MediaUpload {
    /// Builds the multipart form.
    ///
    /// Field order: `file`, `from`, `to`, `platform`, `channel`,
    /// `mediaType`, `text`.
    #[must_use]
    pub fn into_form(self) -> MultipartForm {
        let Self {
            envelope,
            media_type,
            file_name,
            content,
            text,
        } = self;

        let mut form = MultipartForm::new(FilePart {
            field: "file".to_string(),
            file_name,
            content,
        })
        .text("from", envelope.from)
        .text("to", envelope.to)
        .text("platform", envelope.platform);

        if let Some(channel) = envelope.channel {
            form = form.text("channel", channel);
        }
        form = form.text("mediaType", media_type.as_str());
        match text {
            Some(text) if !text.is_empty() => form.text("text", text),
            _ => form,
        }
    }
}

impl Validate for MediaUpload {
    fn check(&self, report: &mut Report) {
        self.envelope.check(report);
        report.length("fileName", &self.file_name, 1..=usize::MAX);
    }
}
