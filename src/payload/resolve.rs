//! Ordered resolution of free-form JSON into a concrete payload shape.
//!
//! The template shapes all carry `type = "template"`, so no single tag picks
//! the variant. Candidates are tried in a fixed order and the first one that
//! both deserializes strictly and passes its rules wins.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::literal;
use super::message::{
    ButtonBody, CarouselBody, ImageBody, ListBody, Payload, ProductBody, TemplateBody, TextBody,
};
use super::{Envelope, Report, Validate, ValidationError};

/// Any payload the platform accepts on the JSON endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnyPayload {
    /// `type = "text"`
    Text(Payload<TextBody>),
    /// `type = "list"`
    List(Payload<ListBody>),
    /// `type = "button"`
    Button(Payload<ButtonBody>),
    /// `type = "media"`, image by URL
    Image(Payload<ImageBody>),
    /// `type = "product"`
    Product(Payload<ProductBody>),
    /// Booking data template
    Template(Payload<TemplateBody>),
    /// Five-card carousel template
    Carousel5(Payload<CarouselBody<literal::Carousel5>>),
    /// Four-card carousel template
    Carousel4(Payload<CarouselBody<literal::Carousel4>>),
    /// Three-card carousel template
    Carousel3(Payload<CarouselBody<literal::Carousel3>>),
    /// Two-card carousel template
    Carousel2(Payload<CarouselBody<literal::Carousel2>>),
}

/// Tries each candidate in order, returning the first match.
macro_rules! first_match {
    ($envelope:expr, $body:expr, $report:expr; $($name:literal => $variant:ident),+ $(,)?) => {
        $(
            if let Some(payload) = candidate($name, $envelope, $body, $report) {
                return Ok(Self::$variant(payload));
            }
        )+
    };
}

impl AnyPayload {
    /// Resolves a complete payload object (envelope fields included).
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the value is not an object, the
    /// envelope is malformed, or no candidate shape accepts it. In the last
    /// case the violations of every candidate are reported, scoped by the
    /// candidate name.
    pub fn resolve(value: Value) -> Result<Self, ValidationError> {
        let Value::Object(mut body) = value else {
            return Err(ValidationError::single("payload", "must be a JSON object"));
        };

        let mut envelope_fields = Map::new();
        for key in Envelope::FIELDS {
            if let Some(v) = body.remove(key) {
                envelope_fields.insert(key.to_string(), v);
            }
        }
        let envelope: Envelope = serde_json::from_value(Value::Object(envelope_fields))
            .map_err(|e| ValidationError::single("envelope", e.to_string()))?;

        let mut report = Report::default();
        first_match! {
            &envelope, &body, &mut report;
            "text" => Text,
            "list" => List,
            "button" => Button,
            "image" => Image,
            "product" => Product,
            "template" => Template,
            "carousel5" => Carousel5,
            "carousel4" => Carousel4,
            "carousel3" => Carousel3,
            "carousel2" => Carousel2,
        }

        match report.finish() {
            Err(e) => Err(e),
            Ok(()) => Err(ValidationError::single("payload", "matches no known shape")),
        }
    }

    /// Merges `envelope` under the caller's object and resolves the result.
    ///
    /// Keys present in `value` override the envelope's.
    ///
    /// # Errors
    ///
    /// Same as [`resolve`](Self::resolve).
    pub fn resolve_with_envelope(envelope: &Envelope, value: Value) -> Result<Self, ValidationError> {
        let Value::Object(caller) = value else {
            return Err(ValidationError::single("payload", "must be a JSON object"));
        };
        let mut merged = envelope.to_map();
        merged.extend(caller);
        Self::resolve(Value::Object(merged))
    }

    /// Name of the resolved shape.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::List(_) => "list",
            Self::Button(_) => "button",
            Self::Image(_) => "image",
            Self::Product(_) => "product",
            Self::Template(_) => "template",
            Self::Carousel5(_) => "carousel5",
            Self::Carousel4(_) => "carousel4",
            Self::Carousel3(_) => "carousel3",
            Self::Carousel2(_) => "carousel2",
        }
    }

    /// The routing envelope of the resolved payload.
    #[must_use]
    pub const fn envelope(&self) -> &Envelope {
        match self {
            Self::Text(p) => &p.envelope,
            Self::List(p) => &p.envelope,
            Self::Button(p) => &p.envelope,
            Self::Image(p) => &p.envelope,
            Self::Product(p) => &p.envelope,
            Self::Template(p) => &p.envelope,
            Self::Carousel5(p) => &p.envelope,
            Self::Carousel4(p) => &p.envelope,
            Self::Carousel3(p) => &p.envelope,
            Self::Carousel2(p) => &p.envelope,
        }
    }
}

fn candidate<B>(
    name: &str,
    envelope: &Envelope,
    body: &Map<String, Value>,
    report: &mut Report,
) -> Option<Payload<B>>
where
    B: DeserializeOwned + Validate,
{
    let body = match serde_json::from_value::<B>(Value::Object(body.clone())) {
        Ok(body) => body,
        Err(e) => {
            report.push(name, e.to_string());
            return None;
        }
    };

    let payload = Payload {
        envelope: envelope.clone(),
        body,
    };
    match payload.validate() {
        Ok(()) => Some(payload),
        Err(e) => {
            report.nest(name, e);
            None
        }
    }
}
