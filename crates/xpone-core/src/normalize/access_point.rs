// ── Access point normalization ──

use serde_json::Value;

use super::resolve::FieldReader;
use crate::model::{AccessPoint, Radio, ReqChannel};

const SERIAL_NUMBER: &[&str] = &["serialNumber", "serial", "apSerialNumber", "sn"];
const DISPLAY_NAME: &[&str] = &["displayName", "apName", "name", "hostname"];
const HARDWARE_TYPE: &[&str] = &["hardwareType", "model", "platformName", "apModel"];
const SITE_ID: &[&str] = &["siteId", "siteID"];
const SITE_NAME: &[&str] = &["siteName", "site"];
const LOCATION: &[&str] = &["location", "locationName", "hostSite"];
const SOFTWARE_VERSION: &[&str] = &["softwareVersion", "firmwareVersion", "firmware", "swVersion"];
const IP_ADDRESS: &[&str] = &["ipAddress", "ip", "apIpAddress"];
const MAC_ADDRESS: &[&str] = &["macAddress", "mac", "baseMac", "ethMac"];
const STATUS: &[&str] = &["status", "connectionState", "state", "operationalStatus"];
const CLIENT_COUNT: &[&str] = &["clientCount", "numClients", "stationCount", "connectedClients"];
const UPTIME: &[&str] = &["uptime", "sysUptime"];
const RADIOS: &[&str] = &["radios", "radioList"];

const RADIO_NAME: &[&str] = &["radioName", "name"];
const RADIO_INDEX: &[&str] = &["radioIndex", "index", "radioId"];
const ADMIN_STATE: &[&str] = &["adminState", "enabled"];
const MODE: &[&str] = &["mode", "radioMode"];
const CHANNEL_WIDTH: &[&str] = &["channelwidth", "channelWidth", "chWidth"];
const USE_SMART_RF: &[&str] = &["useSmartRf", "smartRf"];
const REQ_CHANNEL: &[&str] = &["reqChannel", "requestedChannel", "channel"];
const TX_MAX_POWER: &[&str] = &["txMaxPower", "maxTxPower", "maxTxPwr"];

/// Normalize one raw access point record, including its radios.
pub fn normalize_access_point(raw: &Value) -> AccessPoint {
    let mut r = FieldReader::new(raw);

    let mut ap = AccessPoint {
        serial_number: r.string("serialNumber", SERIAL_NUMBER),
        display_name: r.string("displayName", DISPLAY_NAME),
        hardware_type: r.string("hardwareType", HARDWARE_TYPE),
        site_id: r.string("siteId", SITE_ID),
        site_name: r.string("siteName", SITE_NAME),
        location: r.string("location", LOCATION),
        software_version: r.string("softwareVersion", SOFTWARE_VERSION),
        ip_address: r.string("ipAddress", IP_ADDRESS),
        mac_address: r.string("macAddress", MAC_ADDRESS),
        status: r.string("status", STATUS),
        client_count: r.integer("clientCount", CLIENT_COUNT),
        uptime: r.integer("uptime", UPTIME),
        radios: r
            .value("radios", RADIOS)
            .and_then(Value::as_array)
            .map(|items| items.iter().map(normalize_radio).collect())
            .unwrap_or_default(),
        ..AccessPoint::default()
    };

    let (extra, mut origin) = r.finish();
    ap.extra = extra;
    origin.remember(&ap, &ap.extra);
    ap.origin = origin;
    ap
}

/// Normalize one radio sub-record.
pub fn normalize_radio(raw: &Value) -> Radio {
    let mut r = FieldReader::new(raw);

    let mut radio = Radio {
        radio_name: r.string("radioName", RADIO_NAME),
        radio_index: r.integer("radioIndex", RADIO_INDEX),
        admin_state: r.boolean("adminState", ADMIN_STATE),
        mode: r.string("mode", MODE),
        channel_width: r.string("channelWidth", CHANNEL_WIDTH),
        use_smart_rf: r.boolean("useSmartRf", USE_SMART_RF),
        req_channel: r.value("reqChannel", REQ_CHANNEL).and_then(ReqChannel::from_value),
        tx_max_power: r.integer("txMaxPower", TX_MAX_POWER),
        ..Radio::default()
    };

    let (extra, mut origin) = r.finish();
    radio.extra = extra;
    origin.remember(&radio, &radio.extra);
    radio.origin = origin;
    radio
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn serial_synonyms_resolve() {
        for key in ["serialNumber", "serial", "apSerialNumber", "sn"] {
            let ap = normalize_access_point(&json!({ key: "1234" }));
            assert_eq!(ap.serial_number.as_deref(), Some("1234"), "synonym {key}");
        }
    }

    #[test]
    fn display_name_precedence() {
        let ap = normalize_access_point(&json!({ "hostname": "h", "name": "n", "apName": "a" }));
        assert_eq!(ap.display_name.as_deref(), Some("a"));
    }

    #[test]
    fn radios_normalize_from_radio_list() {
        let ap = normalize_access_point(&json!({
            "serialNumber": "1234",
            "radioList": [
                { "name": "radio1", "index": 1, "enabled": "true", "channel": "auto",
                  "chWidth": "20MHz", "maxTxPwr": 0 },
                { "radioName": "radio2", "radioIndex": 2, "adminState": false,
                  "reqChannel": 36, "smartRf": true, "txPower": 18 },
            ],
        }));

        assert_eq!(ap.radios.len(), 2);
        let r1 = &ap.radios[0];
        assert_eq!(r1.radio_name.as_deref(), Some("radio1"));
        assert_eq!(r1.radio_index, Some(1));
        assert_eq!(r1.admin_state, Some(true));
        assert_eq!(r1.req_channel, Some(ReqChannel::Auto));
        assert_eq!(r1.channel_width.as_deref(), Some("20MHz"));
        assert_eq!(r1.tx_max_power, Some(0));

        let r2 = ap.radio(2).cloned().unwrap_or_default();
        assert_eq!(r2.req_channel, Some(ReqChannel::Channel(36)));
        assert_eq!(r2.use_smart_rf, Some(true));
        assert_eq!(r2.extra.get("txPower"), Some(&json!(18)));
        assert!(!ap.extra.contains_key("radios"));
        assert!(ap.extra.contains_key("radioList"));
    }

    #[test]
    fn client_count_keeps_zero() {
        let ap = normalize_access_point(&json!({ "clientCount": 0, "numClients": 9 }));
        assert_eq!(ap.client_count, Some(0));
    }

    #[test]
    fn passthrough_and_origin() {
        let ap = normalize_access_point(&json!({
            "serial": "S1",
            "apName": "Lobby",
            "features": ["ble"],
        }));
        assert_eq!(ap.extra.get("features"), Some(&json!(["ble"])));
        assert_eq!(ap.origin.source("displayName"), Some("apName"));
        assert_eq!(ap.origin.source("serialNumber"), Some("serial"));
    }

    #[test]
    fn non_array_radios_are_empty() {
        let ap = normalize_access_point(&json!({ "radios": { "radio1": {} } }));
        assert!(ap.radios.is_empty());
    }
}
