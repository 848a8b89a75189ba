//! Platform reply wrapper.

use serde::Serialize;
use serde_json::Value;

use crate::transport::Delivery;

/// The platform's JSON reply, returned unchanged.
///
/// Typically `{"status": "...", "messageId": "..."}` plus any other keys the
/// platform adds. An unparsable body is an empty object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PlatformReply(Value);

impl PlatformReply {
    /// Wraps a reply body.
    #[must_use]
    pub const fn new(body: Value) -> Self {
        Self(body)
    }

    /// The `messageId` field, if it is a string.
    #[must_use]
    pub fn message_id(&self) -> Option<&str> {
        self.0.get("messageId").and_then(Value::as_str)
    }

    /// The `status` field, if it is a string.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.0.get("status").and_then(Value::as_str)
    }

    /// The whole body.
    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consumes the reply, returning the body.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Delivery> for PlatformReply {
    fn from(delivery: Delivery) -> Self {
        Self(delivery.data)
    }
}
