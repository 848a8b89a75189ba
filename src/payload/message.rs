//! Message bodies and their structural rules.
//!
//! Every body is strict: unknown fields are rejected on deserialization
//! and fixed-value fields are encoded as [`literal`](super::literal) types.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::literal;
use super::{Envelope, Report, Validate, ValidationError};

/// Upper bound for "no upper bound" length checks.
const UNBOUNDED: usize = usize::MAX;

/// A complete outgoing payload: envelope fields followed by body fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payload<B> {
    /// Routing envelope
    #[serde(flatten)]
    pub envelope: Envelope,
    /// Variant-specific fields
    #[serde(flatten)]
    pub body: B,
}

impl<B: Validate> Payload<B> {
    /// Wraps `body` in `envelope` and validates the result.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] listing every broken rule.
    pub fn new(envelope: Envelope, body: B) -> Result<Self, ValidationError> {
        let payload = Self { envelope, body };
        payload.validate()?;
        Ok(payload)
    }
}

impl<B: Validate> Validate for Payload<B> {
    fn check(&self, report: &mut Report) {
        self.envelope.check(report);
        self.body.check(report);
    }
}

/// Plain text message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextBody {
    #[serde(rename = "type")]
    kind: literal::Text,
    /// Message text
    pub text: String,
}

impl TextBody {
    /// Creates a text body.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            kind: literal::Text,
            text: text.into(),
        }
    }
}

impl Validate for TextBody {
    fn check(&self, report: &mut Report) {
        report.length("text", &self.text, 1..=UNBOUNDED);
    }
}

/// One selectable row of a list message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListRow {
    /// Row title, at most 24 characters
    pub title: String,
    /// Optional description, at most 72 characters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ListRow {
    /// Creates a row with a title only.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }
}

impl From<&str> for ListRow {
    fn from(title: &str) -> Self {
        Self::titled(title)
    }
}

impl From<String> for ListRow {
    fn from(title: String) -> Self {
        Self::titled(title)
    }
}

impl Validate for ListRow {
    fn check(&self, report: &mut Report) {
        report.length("title", &self.title, 1..=24);
        report.optional_length("description", self.description.as_deref(), 0..=72);
    }
}

/// Interactive list message (1 to 10 rows).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ListBody {
    #[serde(rename = "type")]
    kind: literal::List,
    /// Intro text shown above the list
    pub text: String,
    /// Title of the selection sheet
    pub list_title: String,
    /// Selectable rows
    pub list_data: Vec<ListRow>,
}

impl ListBody {
    /// Creates a list body.
    #[must_use]
    pub fn new(text: impl Into<String>, list_title: impl Into<String>, rows: Vec<ListRow>) -> Self {
        Self {
            kind: literal::List,
            text: text.into(),
            list_title: list_title.into(),
            list_data: rows,
        }
    }
}

impl Validate for ListBody {
    fn check(&self, report: &mut Report) {
        report.length("text", &self.text, 1..=1024);
        report.length("listTitle", &self.list_title, 1..=20);
        report.count("listData", self.list_data.len(), 1..=10);
        for (i, row) in self.list_data.iter().enumerate() {
            report.scoped(&format!("listData[{i}]"), |r| row.check(r));
        }
    }
}

/// Header kind for button messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HeaderType {
    /// `header` holds text
    Text,
    /// `header` holds an image URL
    Image,
}

/// Interactive reply-button message (1 to 3 unique buttons).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ButtonBody {
    #[serde(rename = "type")]
    kind: literal::Button,
    /// Message text shown above the buttons
    pub text: String,
    /// Button labels
    pub buttons: Vec<String>,
    /// Header kind
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_type: Option<HeaderType>,
    /// Header text or image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    /// Footer text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
}

impl ButtonBody {
    /// Creates a button body without header or footer.
    #[must_use]
    pub fn new(text: impl Into<String>, buttons: Vec<String>) -> Self {
        Self {
            kind: literal::Button,
            text: text.into(),
            buttons,
            header_type: None,
            header: None,
            footer: None,
        }
    }

    /// Sets the header.
    #[must_use]
    pub fn with_header(mut self, header_type: Option<HeaderType>, header: Option<String>) -> Self {
        self.header_type = header_type;
        self.header = header;
        self
    }

    /// Sets the footer.
    #[must_use]
    pub fn with_footer(mut self, footer: Option<String>) -> Self {
        self.footer = footer;
        self
    }
}

impl Validate for ButtonBody {
    fn check(&self, report: &mut Report) {
        report.length("text", &self.text, 1..=1024);
        report.count("buttons", self.buttons.len(), 1..=3);
        for (i, label) in self.buttons.iter().enumerate() {
            report.length(&format!("buttons[{i}]"), label, 1..=20);
        }

        let distinct: HashSet<String> = self
            .buttons
            .iter()
            .map(|label| label.trim().to_lowercase())
            .collect();
        if distinct.len() != self.buttons.len() {
            report.push("buttons", "labels must be unique (case-insensitive)");
        }

        report.optional_length("header", self.header.as_deref(), 1..=2048);
        report.optional_length("footer", self.footer.as_deref(), 1..=60);
    }
}

/// Image sent by URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ImageBody {
    #[serde(rename = "type")]
    kind: literal::Media,
    media_type: literal::Image,
    /// Publicly reachable image URL
    pub media_url: String,
    /// Optional caption
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ImageBody {
    /// Creates an image body.
    #[must_use]
    pub fn new(media_url: impl Into<String>, text: Option<String>) -> Self {
        Self {
            kind: literal::Media,
            media_type: literal::Image,
            media_url: media_url.into(),
            text,
        }
    }
}

impl Validate for ImageBody {
    fn check(&self, report: &mut Report) {
        report.url("mediaUrl", &self.media_url);
    }
}

/// Single catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProductBody {
    #[serde(rename = "type")]
    kind: literal::Product,
    /// Catalog identifier
    pub catalog_id: String,
    /// Product identifier within the catalog
    pub product_id: String,
    /// Optional intro text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Optional footer text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
}

impl ProductBody {
    /// Creates a product body.
    #[must_use]
    pub fn new(
        catalog_id: impl Into<String>,
        product_id: impl Into<String>,
        text: Option<String>,
        footer: Option<String>,
    ) -> Self {
        Self {
            kind: literal::Product,
            catalog_id: catalog_id.into(),
            product_id: product_id.into(),
            text,
            footer,
        }
    }
}

impl Validate for ProductBody {
    fn check(&self, report: &mut Report) {
        report.length("catalogId", &self.catalog_id, 1..=UNBOUNDED);
        report.length("productId", &self.product_id, 1..=UNBOUNDED);
    }
}

/// Booking data template (no parameters).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TemplateBody {
    #[serde(rename = "type")]
    kind: literal::Template,
    template_lang: literal::English,
    template_name: literal::BookingData,
    header_type: literal::TextHeader,
}

impl Validate for TemplateBody {
    fn check(&self, _report: &mut Report) {}
}

/// Kind of a carousel card element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// Card header
    Header,
    /// Card body
    Body,
}

/// An optional field that remembers an explicit `null`.
///
/// `None` means absent and is skipped on output; `Some(None)` is written
/// back as `null`.
pub type Nullable<T> = Option<Option<T>>;

fn present<'de, D, T>(deserializer: D) -> Result<Nullable<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// One element of a carousel card.
///
/// Optional fields are forwarded exactly as given, `null` included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CarouselElement {
    /// Header or body
    #[serde(rename = "type")]
    pub kind: ElementKind,
    /// Header format (e.g. `IMAGE`)
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub format: Nullable<String>,
    /// Header media URL
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub media_url: Nullable<String>,
    /// Body text
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub text: Nullable<String>,
    /// Template parameters
    pub parameters: Vec<serde_json::Value>,
    /// Card buttons
    pub buttons: Vec<serde_json::Value>,
    /// Link target for URL buttons
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub url: Nullable<String>,
    /// Phone number for call buttons
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub phone_number: Nullable<String>,
}

impl Validate for CarouselElement {
    fn check(&self, report: &mut Report) {
        if let Some(Some(media_url)) = &self.media_url {
            report.url("media_url", media_url);
        }
    }
}

/// Carousel template; `N` pins the template name and thus the card count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CarouselBody<N> {
    #[serde(rename = "type")]
    kind: literal::Template,
    template_lang: literal::English,
    template_name: N,
    header_type: literal::TextHeader,
    /// Cards, each a header/body element pair
    pub template_carousel_cards: Vec<[CarouselElement; 2]>,
    /// Template-level parameters
    pub template_data: Vec<serde_json::Value>,
    /// Button parameters per card
    pub template_button: Vec<Vec<serde_json::Value>>,
}

impl<N: Default> CarouselBody<N> {
    /// Creates a carousel body.
    #[must_use]
    pub fn new(
        cards: Vec<[CarouselElement; 2]>,
        template_data: Vec<serde_json::Value>,
        template_button: Vec<Vec<serde_json::Value>>,
    ) -> Self {
        Self {
            kind: literal::Template,
            template_lang: literal::English,
            template_name: N::default(),
            header_type: literal::TextHeader,
            template_carousel_cards: cards,
            template_data,
            template_button,
        }
    }
}

impl<N> Validate for CarouselBody<N> {
    fn check(&self, report: &mut Report) {
        report.count(
            "templateCarouselCards",
            self.template_carousel_cards.len(),
            1..=UNBOUNDED,
        );
        for (i, card) in self.template_carousel_cards.iter().enumerate() {
            for (j, element) in card.iter().enumerate() {
                report.scoped(&format!("templateCarouselCards[{i}][{j}]"), |r| element.check(r));
            }
        }
    }
}
