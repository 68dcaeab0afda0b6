// ── Station (wireless client) domain type ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A client device associated with an access point.
///
/// Keyed by `mac_address`. Rebuilt from scratch on every poll.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv6_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    // Association
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ap_name: Option<String>,
    /// Opportunistic join key; the AP may not exist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ap_serial: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan: Option<i64>,

    // Radio
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radio_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rss: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snr: Option<i64>,

    // Traffic counters. `in`/`rx` and `out`/`tx` are the same counters
    // under two naming schemes; both spellings are populated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_bytes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_bytes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rx_bytes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_bytes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_packets: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_packets: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rx_packets: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_packets: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_seen: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<DateTime<Utc>>,

    /// Raw keys with no canonical counterpart, unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Station {
    /// Best label for display: host name, then IP, then MAC.
    pub fn label(&self) -> &str {
        self.host_name
            .as_deref()
            .or(self.ip_address.as_deref())
            .or(self.mac_address.as_deref())
            .unwrap_or("-")
    }

    /// Combined traffic in both directions, when either counter is known.
    pub fn total_bytes(&self) -> Option<i64> {
        match (self.rx_bytes, self.tx_bytes) {
            (None, None) => None,
            (rx, tx) => Some(rx.unwrap_or(0).saturating_add(tx.unwrap_or(0))),
        }
    }
}
