// ── Service normalization ──
//
// The security element may sit at the top level of the service object or
// under `privacy`. Both collapse into the canonical `privacy` field; the
// nested form wins when both are present.

use serde_json::Value;

use super::resolve::FieldReader;
use crate::model::{Security, Service};

const ID: &[&str] = &["id", "serviceId", "_id"];
const SERVICE_NAME: &[&str] = &["serviceName", "name", "ssid"];
const SSID: &[&str] = &["ssid", "serviceName", "name"];
const STATUS: &[&str] = &["status", "serviceStatus"];
const ENABLED: &[&str] = &["enabled", "isEnabled"];
const VLAN: &[&str] = &["vlan", "vlanId", "vlanTag"];
const DEFAULT_TOPOLOGY: &[&str] = &["defaultTopology", "topologyId"];
const HIDDEN: &[&str] = &["suppressSsid", "hidden", "hideSsid"];
const CAPTIVE_PORTAL: &[&str] = &["enableCaptivePortal", "captivePortal", "captivePortalEnabled"];
const CAPTIVE_PORTAL_TYPE: &[&str] = &["captivePortalType", "portalType"];
const AAA_POLICY_ID: &[&str] = &["aaaPolicyId", "aaaPolicy"];

/// Normalize one raw service record.
pub fn normalize_service(raw: &Value) -> Service {
    let mut r = FieldReader::new(raw);

    let status = r.string("status", STATUS);
    let enabled = r
        .boolean("enabled", ENABLED)
        .or_else(|| status.as_deref().and_then(enabled_from_status));

    let mut service = Service {
        id: r.string("id", ID),
        service_name: r.string("serviceName", SERVICE_NAME),
        ssid: r.string("ssid", SSID),
        status,
        enabled,
        vlan: r.integer("vlan", VLAN),
        default_topology: r.string("defaultTopology", DEFAULT_TOPOLOGY),
        hidden: r.boolean("hidden", HIDDEN),
        captive_portal: r.boolean("captivePortal", CAPTIVE_PORTAL),
        captive_portal_type: r.string("captivePortalType", CAPTIVE_PORTAL_TYPE),
        aaa_policy_id: r.string("aaaPolicyId", AAA_POLICY_ID),
        privacy: resolve_privacy(&mut r),
        ..Service::default()
    };

    let (extra, mut origin) = r.finish();
    service.extra = extra;
    origin.remember(&service, &service.extra);
    service.origin = origin;
    service
}

/// Nested `privacy.<Element>` first, then a top-level `<Element>`.
fn resolve_privacy(r: &mut FieldReader<'_>) -> Option<Security> {
    r.claim("privacy");
    for key in Security::ELEMENT_KEYS {
        r.claim(key);
    }

    if let Some((_, sec)) = r
        .get("privacy")
        .and_then(Value::as_object)
        .and_then(Security::find_in)
    {
        r.note_origin("privacy", "privacy");
        return Some(sec);
    }

    let found = Security::ELEMENT_KEYS.iter().find_map(|key| {
        r.get(key)
            .and_then(|body| Security::from_element(key, body))
            .map(|sec| (*key, sec))
    });
    match found {
        Some((key, sec)) => {
            r.note_origin("privacy", key);
            Some(sec)
        }
        None => {
            // An explicit `privacy` key (usually `null`) still belongs to the record.
            if r.get("privacy").is_some() {
                r.note_origin("privacy", "privacy");
            }
            None
        }
    }
}

fn enabled_from_status(status: &str) -> Option<bool> {
    match status.to_ascii_lowercase().as_str() {
        "enabled" | "enable" | "active" | "up" | "on" => Some(true),
        "disabled" | "disable" | "inactive" | "down" | "off" => Some(false),
        _ => None,
    }
}
