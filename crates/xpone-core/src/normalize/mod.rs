// ── Raw API records to canonical domain types ──
//
// Controller firmware versions disagree on field names for the same data.
// Each `normalize_*` function resolves every canonical field from an ordered
// synonym list and keeps the remaining raw keys as `extra`. All functions
// are pure and infallible: unusable input yields an empty record, and the
// plural forms yield an empty `Vec` for anything that is not an array.

mod access_point;
mod payload;
mod resolve;
mod service;
mod site;
mod station;

use serde_json::Value;

use crate::model::{AccessPoint, Service, Site, Station};

pub use access_point::{normalize_access_point, normalize_radio};
pub use payload::{access_point_payload, service_payload};
pub use service::normalize_service;
pub use site::normalize_site;
pub use station::normalize_station;

fn normalize_all<T>(raw: &Value, normalize: fn(&Value) -> T) -> Vec<T> {
    raw.as_array()
        .map(|items| items.iter().map(normalize).collect())
        .unwrap_or_default()
}

pub fn normalize_stations(raw: &Value) -> Vec<Station> {
    normalize_all(raw, normalize_station)
}

pub fn normalize_access_points(raw: &Value) -> Vec<AccessPoint> {
    normalize_all(raw, normalize_access_point)
}

pub fn normalize_services(raw: &Value) -> Vec<Service> {
    normalize_all(raw, normalize_service)
}

pub fn normalize_sites(raw: &Value) -> Vec<Site> {
    normalize_all(raw, normalize_site)
}
