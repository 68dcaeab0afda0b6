// ── Site domain type ──

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// Access points assigned to this site (if reported).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ap_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub switch_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_count: Option<i64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
