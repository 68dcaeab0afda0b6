// ── Service (WLAN / SSID) domain type ──

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString};

use super::FieldOrigin;

/// A configured wireless network, keyed by `id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_topology: Option<String>,
    /// SSID broadcast suppressed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captive_portal: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captive_portal_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aaa_policy_id: Option<String>,
    /// `None` means an open network.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacy: Option<Security>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,

    #[serde(skip)]
    pub origin: FieldOrigin,
}

impl Service {
    pub fn security_mode(&self) -> SecurityMode {
        self.privacy
            .as_ref()
            .map_or(SecurityMode::Open, Security::mode)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(false)
    }
}

/// Security configuration element.
///
/// Serialized in the controller's own shape: a single-key object naming the
/// element, e.g. `{"WpaPskElement": {...}}`. Element fields are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Security {
    #[serde(rename = "WpaPskElement")]
    Psk(Map<String, Value>),
    #[serde(rename = "WpaEnterpriseElement")]
    Enterprise(Map<String, Value>),
    #[serde(rename = "WpaSaeElement")]
    Sae(Map<String, Value>),
}

impl Security {
    /// Element keys in lookup order.
    pub const ELEMENT_KEYS: [&'static str; 3] =
        ["WpaPskElement", "WpaEnterpriseElement", "WpaSaeElement"];

    /// Build from an element key and its body. Non-object bodies are rejected.
    pub fn from_element(key: &str, body: &Value) -> Option<Self> {
        let fields = body.as_object()?.clone();
        match key {
            "WpaPskElement" => Some(Self::Psk(fields)),
            "WpaEnterpriseElement" => Some(Self::Enterprise(fields)),
            "WpaSaeElement" => Some(Self::Sae(fields)),
            _ => None,
        }
    }

    /// First element found in `container`, in [`ELEMENT_KEYS`](Self::ELEMENT_KEYS) order.
    pub fn find_in(container: &Map<String, Value>) -> Option<(&'static str, Self)> {
        Self::ELEMENT_KEYS.iter().find_map(|key| {
            container
                .get(*key)
                .and_then(|body| Self::from_element(key, body))
                .map(|sec| (*key, sec))
        })
    }

    pub fn element_key(&self) -> &'static str {
        match self {
            Self::Psk(_) => "WpaPskElement",
            Self::Enterprise(_) => "WpaEnterpriseElement",
            Self::Sae(_) => "WpaSaeElement",
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        match self {
            Self::Psk(m) | Self::Enterprise(m) | Self::Sae(m) => m,
        }
    }

    pub fn mode(&self) -> SecurityMode {
        match self {
            Self::Psk(_) => SecurityMode::Psk,
            Self::Enterprise(_) => SecurityMode::Enterprise,
            Self::Sae(_) => SecurityMode::Sae,
        }
    }
}

/// Flat security classification for display and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum SecurityMode {
    #[strum(serialize = "open")]
    Open,
    #[strum(serialize = "wpa-psk")]
    Psk,
    #[strum(serialize = "wpa-enterprise")]
    Enterprise,
    #[strum(serialize = "wpa3-sae")]
    Sae,
}
