// ── Canonical records back to controller payloads ──
//
// A write is a full PUT of the record. Canonical fields are emitted under
// the raw key they were originally read from, so the controller sees its
// own spelling; passthrough keys are emitted unchanged.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::model::{AccessPoint, FieldOrigin, Radio, Service};

fn to_object<T: Serialize>(record: &T) -> Map<String, Value> {
    match serde_json::to_value(record) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// Move canonical keys back to their origin keys, except those in `skip`.
///
/// Several canonical fields can share one raw key (`serviceName` and
/// `ssid` both read from `name`). The edited one wins; an unedited group
/// writes its value back as read. Derived fields that nobody edited are
/// dropped, since the controller never sent them.
fn relabel(
    mut map: Map<String, Value>,
    origin: &FieldOrigin,
    skip: &[&str],
) -> Map<String, Value> {
    for canonical in origin.derived() {
        if !skip.contains(&canonical) && !origin.is_edited(canonical, map.get(canonical)) {
            map.remove(canonical);
        }
    }

    let mut by_source: BTreeMap<&str, Vec<(&str, Option<Value>)>> = BTreeMap::new();
    for (canonical, source) in origin.sources() {
        if skip.contains(&canonical) {
            continue;
        }
        let current = map.remove(canonical);
        by_source.entry(source).or_default().push((canonical, current));
    }

    for (source, fields) in by_source {
        let edited = fields
            .iter()
            .find(|(canonical, current)| origin.is_edited(canonical, current.as_ref()));
        match edited {
            Some((_, Some(value))) => {
                map.insert(source.to_owned(), value.clone());
            }
            Some((_, None)) => {
                map.remove(source);
            }
            None => {
                // Unusable raw values resolve to nothing; leave the raw key alone.
                if let Some(value) = fields.iter().find_map(|(_, v)| v.clone()) {
                    map.insert(source.to_owned(), value);
                }
            }
        }
    }
    map
}

fn radio_payload(radio: &Radio) -> Value {
    Value::Object(relabel(to_object(radio), &radio.origin, &[]))
}

/// Reconstruct the `PUT v1/aps/{serial}` body for `ap`.
pub fn access_point_payload(ap: &AccessPoint) -> Value {
    let mut map = relabel(to_object(ap), &ap.origin, &["radios"]);

    if !ap.radios.is_empty() {
        map.remove("radios");
        let key = ap.origin.source("radios").unwrap_or("radios");
        let radios = ap.radios.iter().map(radio_payload).collect();
        map.insert(key.to_owned(), Value::Array(radios));
    }

    Value::Object(map)
}

/// Reconstruct the `PUT v1/services/{id}` body for `service`.
///
/// A security element that arrived at the top level goes back there. A
/// network made open is sent as an explicit `"privacy": null`; one that
/// never carried a `privacy` key gets none.
pub fn service_payload(service: &Service) -> Value {
    let mut map = relabel(to_object(service), &service.origin, &["privacy"]);

    match (&service.privacy, service.origin.source("privacy")) {
        (None, None) => {}
        (None, Some(_)) => {
            map.insert("privacy".into(), Value::Null);
        }
        (Some(sec), Some(source)) if source != "privacy" => {
            map.remove("privacy");
            map.insert(
                sec.element_key().to_owned(),
                Value::Object(sec.fields().clone()),
            );
        }
        (Some(_), _) => {}
    }

    Value::Object(map)
}
