// ── Station normalization ──

use serde_json::Value;

use super::resolve::FieldReader;
use crate::model::Station;

const MAC_ADDRESS: &[&str] = &["macAddress", "mac", "clientMac", "stationMac"];
const IP_ADDRESS: &[&str] = &["ipAddress", "ip", "ipv4Address", "clientIp"];
const IPV6_ADDRESS: &[&str] = &["ipv6Address", "ipv6", "ipV6Address"];
const HOST_NAME: &[&str] = &["hostName", "hostname", "deviceName", "name"];
const DEVICE_TYPE: &[&str] = &["deviceType", "deviceCategory", "osType", "deviceFamily"];
const MANUFACTURER: &[&str] = &["manufacturer", "vendor", "oui"];
const USERNAME: &[&str] = &["username", "userName", "user"];
const AP_NAME: &[&str] = &["apName", "apDisplayName", "accessPointName", "apHostname"];
const AP_SERIAL: &[&str] = &["apSerial", "apSerialNumber", "apSn", "accessPointSerial"];
const SITE_ID: &[&str] = &["siteId", "siteID"];
const SITE_NAME: &[&str] = &["siteName", "site", "locationName"];
const SERVICE_NAME: &[&str] = &["serviceName", "ssid", "essid", "networkName"];
const SSID: &[&str] = &["ssid", "essid", "serviceName"];
const ROLE: &[&str] = &["role", "roleName", "policyName"];
const BAND: &[&str] = &["band", "radioBand", "frequencyBand"];
const PROTOCOL: &[&str] = &["protocol", "radioProtocol", "wirelessProtocol"];
const STATUS: &[&str] = &["status", "connectionStatus", "state"];
const VLAN: &[&str] = &["vlan", "vlanId", "vlanTag"];
const RADIO_ID: &[&str] = &["radioId", "radioIndex", "radio"];
const CHANNEL: &[&str] = &["channel", "radioChannel", "apChannel"];
const RSS: &[&str] = &["rss", "rssi", "signalStrength", "signal"];
const SNR: &[&str] = &["snr", "signalToNoise"];
const IN_BYTES: &[&str] = &["inBytes", "rxBytes", "bytesReceived"];
const OUT_BYTES: &[&str] = &["outBytes", "txBytes", "bytesSent"];
const RX_BYTES: &[&str] = &["rxBytes", "inBytes", "bytesReceived"];
const TX_BYTES: &[&str] = &["txBytes", "outBytes", "bytesSent"];
const IN_PACKETS: &[&str] = &["inPackets", "rxPackets", "packetsReceived"];
const OUT_PACKETS: &[&str] = &["outPackets", "txPackets", "packetsSent"];
const RX_PACKETS: &[&str] = &["rxPackets", "inPackets", "packetsReceived"];
const TX_PACKETS: &[&str] = &["txPackets", "outPackets", "packetsSent"];
const FIRST_SEEN: &[&str] = &["firstSeen", "connectedSince", "associationTime"];
const LAST_SEEN: &[&str] = &["lastSeen", "lastSeenTime", "timestamp"];

/// Normalize one raw station record.
pub fn normalize_station(raw: &Value) -> Station {
    let mut r = FieldReader::new(raw);

    let mut station = Station {
        mac_address: r.string("macAddress", MAC_ADDRESS),
        ip_address: r.string("ipAddress", IP_ADDRESS),
        ipv6_address: r.string("ipv6Address", IPV6_ADDRESS),
        host_name: r.string("hostName", HOST_NAME),
        device_type: r.string("deviceType", DEVICE_TYPE),
        manufacturer: r.string("manufacturer", MANUFACTURER),
        username: r.string("username", USERNAME),
        ap_name: r.string("apName", AP_NAME),
        ap_serial: r.string("apSerial", AP_SERIAL),
        site_id: r.string("siteId", SITE_ID),
        site_name: r.string("siteName", SITE_NAME),
        service_name: r.string("serviceName", SERVICE_NAME),
        ssid: r.string("ssid", SSID),
        role: r.string("role", ROLE),
        vlan: r.integer("vlan", VLAN),
        band: r.string("band", BAND),
        protocol: r.string("protocol", PROTOCOL),
        status: r.string("status", STATUS),
        radio_id: r.integer("radioId", RADIO_ID),
        channel: r.integer("channel", CHANNEL),
        rss: r.integer("rss", RSS),
        snr: r.integer("snr", SNR),
        in_bytes: r.integer("inBytes", IN_BYTES),
        out_bytes: r.integer("outBytes", OUT_BYTES),
        rx_bytes: r.integer("rxBytes", RX_BYTES),
        tx_bytes: r.integer("txBytes", TX_BYTES),
        in_packets: r.integer("inPackets", IN_PACKETS),
        out_packets: r.integer("outPackets", OUT_PACKETS),
        rx_packets: r.integer("rxPackets", RX_PACKETS),
        tx_packets: r.integer("txPackets", TX_PACKETS),
        first_seen: r.timestamp("firstSeen", FIRST_SEEN),
        last_seen: r.timestamp("lastSeen", LAST_SEEN),
        ..Station::default()
    };

    let (extra, _) = r.finish();
    station.extra = extra;
    station
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn each_ap_serial_synonym_resolves() {
        for key in ["apSerial", "apSerialNumber", "apSn", "accessPointSerial"] {
            let s = normalize_station(&json!({ key: "SN-42" }));
            assert_eq!(s.ap_serial.as_deref(), Some("SN-42"), "synonym {key}");
        }
    }

    #[test]
    fn ap_name_wins_over_display_name() {
        let s = normalize_station(&json!({ "apDisplayName": "Hall", "apName": "Lobby" }));
        assert_eq!(s.ap_name.as_deref(), Some("Lobby"));
    }

    #[test]
    fn zero_is_kept_for_numeric_fields() {
        let s = normalize_station(&json!({ "vlan": 0, "channel": 0, "rss": 0, "vlanId": 10 }));
        assert_eq!(s.vlan, Some(0));
        assert_eq!(s.channel, Some(0));
        assert_eq!(s.rss, Some(0));
    }

    #[test]
    fn rx_tx_counters_fill_in_out() {
        let s = normalize_station(&json!({ "macAddress": "AA:BB", "rxBytes": 100, "txBytes": 50 }));
        assert_eq!(s.mac_address.as_deref(), Some("AA:BB"));
        assert_eq!(s.in_bytes, Some(100));
        assert_eq!(s.out_bytes, Some(50));
        assert_eq!(s.rx_bytes, Some(100));
        assert_eq!(s.tx_bytes, Some(50));
    }

    #[test]
    fn unmapped_keys_pass_through_unchanged() {
        let raw = json!({
            "mac": "AA:BB",
            "dot1xState": { "state": "authorized" },
            "tags": ["a", "b"],
            "score": 0,
        });
        let s = normalize_station(&raw);
        assert_eq!(s.extra.get("dot1xState"), raw.get("dot1xState"));
        assert_eq!(s.extra.get("tags"), raw.get("tags"));
        assert_eq!(s.extra.get("score"), Some(&json!(0)));
        assert_eq!(s.extra.get("mac"), Some(&json!("AA:BB")));
    }

    #[test]
    fn canonical_value_overrides_raw_key() {
        let raw = json!({ "macAddress": "", "mac": "AA:BB" });
        let value = serde_json::to_value(normalize_station(&raw)).ok();
        assert_eq!(
            value.as_ref().and_then(|v| v.get("macAddress")),
            Some(&json!("AA:BB"))
        );
    }

    #[test]
    fn falsy_strings_fall_through_but_numbers_stringify() {
        let s = normalize_station(&json!({ "hostName": "", "hostname": 0, "deviceName": 17 }));
        assert_eq!(s.host_name.as_deref(), Some("17"));
    }

    #[test]
    fn timestamps_resolve_from_synonyms() {
        let s = normalize_station(&json!({
            "connectedSince": 1_700_000_000_000_i64,
            "lastSeenTime": "2023-11-14T22:13:20Z",
        }));
        assert!(s.first_seen.is_some());
        assert_eq!(s.first_seen, s.last_seen);
    }

    #[test]
    fn non_object_yields_empty_record() {
        assert_eq!(normalize_station(&json!("AA:BB")), Station::default());
        assert_eq!(normalize_station(&Value::Null), Station::default());
    }
}
