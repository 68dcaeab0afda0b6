// ── Access point domain type ──

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::FieldOrigin;

/// A managed access point, keyed by `serial_number`.
///
/// Owns its radios. Edits go back to the controller as a full PUT of the
/// reconstructed record (see [`crate::normalize::access_point_payload`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessPoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hardware_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub software_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_count: Option<i64>,
    /// Seconds since boot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub radios: Vec<Radio>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,

    #[serde(skip)]
    pub origin: FieldOrigin,
}

impl AccessPoint {
    pub fn radio(&self, index: i64) -> Option<&Radio> {
        self.radios.iter().find(|r| r.radio_index == Some(index))
    }

    pub fn radio_mut(&mut self, index: i64) -> Option<&mut Radio> {
        self.radios.iter_mut().find(|r| r.radio_index == Some(index))
    }

    /// Whether the controller reports this AP as connected.
    pub fn is_online(&self) -> bool {
        self.status.as_deref().is_some_and(|s| {
            matches!(
                s.to_ascii_lowercase().as_str(),
                "inservice" | "in_service" | "online" | "connected" | "up" | "active"
            )
        })
    }
}

/// One radio of an access point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Radio {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radio_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radio_index: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_state: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_smart_rf: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub req_channel: Option<ReqChannel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_max_power: Option<i64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,

    #[serde(skip)]
    pub origin: FieldOrigin,
}

/// Requested channel: automatic selection or a fixed channel number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReqChannel {
    Auto,
    Channel(u32),
}

impl ReqChannel {
    /// `"auto"` in any case, a channel number, or a numeric string.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_u64().and_then(|c| u32::try_from(c).ok()).map(Self::Channel),
            Value::String(s) if s.trim().eq_ignore_ascii_case("auto") => Some(Self::Auto),
            Value::String(s) => s.trim().parse().ok().map(Self::Channel),
            _ => None,
        }
    }
}

impl fmt::Display for ReqChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Channel(c) => write!(f, "{c}"),
        }
    }
}

impl Serialize for ReqChannel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Auto => serializer.serialize_str("auto"),
            Self::Channel(c) => serializer.serialize_u32(*c),
        }
    }
}

impl<'de> Deserialize<'de> for ReqChannel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid channel: {value}")))
    }
}
