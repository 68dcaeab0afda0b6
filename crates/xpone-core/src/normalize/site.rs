// ── Site normalization ──

use serde_json::Value;

use super::resolve::FieldReader;
use crate::model::Site;

const ID: &[&str] = &["id", "siteId", "_id"];
const SITE_NAME: &[&str] = &["siteName", "name", "displayName"];
const LOCATION: &[&str] = &["location", "address", "siteAddress"];
const COUNTRY: &[&str] = &["country", "countryCode", "countryName"];
const TIMEZONE: &[&str] = &["timezone", "timeZone"];
const AP_COUNT: &[&str] = &["apCount", "accessPointCount", "numAps", "totalAps"];
const SWITCH_COUNT: &[&str] = &["switchCount", "numSwitches", "totalSwitches"];
const CLIENT_COUNT: &[&str] = &["clientCount", "stationCount", "numClients", "totalClients"];

/// Normalize one raw site record.
pub fn normalize_site(raw: &Value) -> Site {
    let mut r = FieldReader::new(raw);

    let mut site = Site {
        id: r.string("id", ID),
        site_name: r.string("siteName", SITE_NAME),
        location: r.string("location", LOCATION),
        country: r.string("country", COUNTRY),
        timezone: r.string("timezone", TIMEZONE),
        ap_count: r.integer("apCount", AP_COUNT),
        switch_count: r.integer("switchCount", SWITCH_COUNT),
        client_count: r.integer("clientCount", CLIENT_COUNT),
        ..Site::default()
    };

    let (extra, _) = r.finish();
    site.extra = extra;
    site
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn site_synonyms_resolve() {
        let site = normalize_site(&json!({
            "siteId": "abc",
            "displayName": "HQ",
            "address": "1 Main St",
            "countryCode": "US",
            "timeZone": "America/New_York",
            "numAps": "12",
            "totalSwitches": 0,
            "stationCount": 140,
        }));
        assert_eq!(site.id.as_deref(), Some("abc"));
        assert_eq!(site.site_name.as_deref(), Some("HQ"));
        assert_eq!(site.location.as_deref(), Some("1 Main St"));
        assert_eq!(site.country.as_deref(), Some("US"));
        assert_eq!(site.timezone.as_deref(), Some("America/New_York"));
        assert_eq!(site.ap_count, Some(12));
        assert_eq!(site.switch_count, Some(0));
        assert_eq!(site.client_count, Some(140));
    }

    #[test]
    fn name_precedence_and_passthrough() {
        let site = normalize_site(&json!({
            "name": "Branch",
            "displayName": "Branch Office",
            "treeNode": { "depth": 2 },
        }));
        assert_eq!(site.site_name.as_deref(), Some("Branch"));
        assert_eq!(site.extra.get("treeNode"), Some(&json!({ "depth": 2 })));
        assert_eq!(site.extra.get("displayName"), Some(&json!("Branch Office")));
    }
}
