//! Routing fields shared by every outgoing message.

use serde::{Deserialize, Serialize};

use super::{Report, Validate};

/// Common routing envelope merged into every payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Envelope {
    /// Platform identifier (e.g. `WA`)
    pub platform: String,
    /// Sender MSISDN
    pub from: String,
    /// Recipient MSISDN
    pub to: String,
    /// Channel, present only when configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

impl Envelope {
    /// Field names owned by the envelope.
    pub const FIELDS: [&'static str; 4] = ["platform", "from", "to", "channel"];

    /// Shortest accepted MSISDN.
    pub const MSISDN_MIN_LEN: usize = 5;

    /// Builds the JSON object form of the envelope.
    #[must_use]
    pub fn to_map(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut map = serde_json::Map::new();
        map.insert("platform".into(), self.platform.clone().into());
        map.insert("from".into(), self.from.clone().into());
        map.insert("to".into(), self.to.clone().into());
        if let Some(channel) = &self.channel {
            map.insert("channel".into(), channel.clone().into());
        }
        map
    }
}

impl Validate for Envelope {
    fn check(&self, report: &mut Report) {
        report.length("platform", &self.platform, 1..=usize::MAX);
        report.length("from", &self.from, 1..=usize::MAX);
        report.length("to", &self.to, Self::MSISDN_MIN_LEN..=usize::MAX);
    }
}
