// ── Field resolution over raw JSON objects ──
//
// Two resolution rules, chosen per canonical field kind:
//
// - logical-or (strings): first candidate that is present and truthy wins.
//   null, "", 0 and false are skipped.
// - nullish (numbers, bools, timestamps): first candidate that is present
//   and not null wins, even when its value turns out to be unusable.
//
// Every canonical name the reader resolves is remembered, so the leftover
// raw keys can be carried through as `extra` without a second list of
// field names to keep in sync.

use std::collections::BTreeSet;
use std::num::FpCategory;

use chrono::{DateTime, Utc};
use serde_json::{Map, Number, Value};

use crate::model::FieldOrigin;

pub(crate) struct FieldReader<'a> {
    raw: Option<&'a Map<String, Value>>,
    claimed: BTreeSet<&'static str>,
    origin: FieldOrigin,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(raw: &'a Value) -> Self {
        Self {
            raw: raw.as_object(),
            claimed: BTreeSet::new(),
            origin: FieldOrigin::default(),
        }
    }

    pub(crate) fn get(&self, key: &str) -> Option<&'a Value> {
        self.raw.and_then(|map| map.get(key))
    }

    /// Mark `key` as consumed so it is not passed through as extra.
    pub(crate) fn claim(&mut self, key: &'static str) {
        self.claimed.insert(key);
    }

    /// Record that `canonical` was read from `source`.
    pub(crate) fn note_origin(&mut self, canonical: &'static str, source: &'static str) {
        self.origin.record(canonical, source);
    }

    /// First present, non-null candidate.
    fn nullish(&mut self, canonical: &'static str, keys: &[&'static str]) -> Option<&'a Value> {
        self.claim(canonical);
        let (key, value) = keys
            .iter()
            .find_map(|k| self.get(k).filter(|v| !v.is_null()).map(|v| (*k, v)))?;
        self.note_origin(canonical, key);
        Some(value)
    }

    /// Logical-or string resolution.
    pub(crate) fn string(
        &mut self,
        canonical: &'static str,
        keys: &[&'static str],
    ) -> Option<String> {
        self.claim(canonical);
        let (key, value) = keys
            .iter()
            .find_map(|k| self.get(k).and_then(truthy_string).map(|v| (*k, v)))?;
        self.note_origin(canonical, key);
        Some(value)
    }

    /// Nullish integer resolution. A non-numeric winner resolves to `None`.
    pub(crate) fn integer(
        &mut self,
        canonical: &'static str,
        keys: &[&'static str],
    ) -> Option<i64> {
        self.nullish(canonical, keys).and_then(as_integer)
    }

    /// Nullish bool resolution; accepts `"true"`/`"false"` strings.
    pub(crate) fn boolean(
        &mut self,
        canonical: &'static str,
        keys: &[&'static str],
    ) -> Option<bool> {
        self.nullish(canonical, keys).and_then(as_bool)
    }

    /// Nullish timestamp resolution: epoch milliseconds or RFC 3339.
    pub(crate) fn timestamp(
        &mut self,
        canonical: &'static str,
        keys: &[&'static str],
    ) -> Option<DateTime<Utc>> {
        self.nullish(canonical, keys).and_then(as_timestamp)
    }

    /// Nullish resolution returning the raw winning value.
    pub(crate) fn value(
        &mut self,
        canonical: &'static str,
        keys: &[&'static str],
    ) -> Option<&'a Value> {
        self.nullish(canonical, keys)
    }

    /// Raw keys that are not claimed canonical names, unchanged.
    pub(crate) fn finish(self) -> (Map<String, Value>, FieldOrigin) {
        let extra = self
            .raw
            .map(|map| {
                map.iter()
                    .filter(|(k, _)| !self.claimed.contains(k.as_str()))
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default();
        (extra, self.origin)
    }
}

// ── Value coercions ──────────────────────────────────────────────────

fn is_zero(n: &Number) -> bool {
    n.as_f64()
        .is_some_and(|f| matches!(f.classify(), FpCategory::Zero))
}

/// JS-style truthiness, stringified. Objects and arrays never qualify.
pub(crate) fn truthy_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if !is_zero(n) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_owned()),
        _ => None,
    }
}

pub(crate) fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().and_then(|u| i64::try_from(u).ok())),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

pub(crate) fn as_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    if let Some(millis) = as_integer(value) {
        return DateTime::from_timestamp_millis(millis);
    }
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn logical_or_skips_falsy_values() {
        let raw = json!({ "a": "", "b": 0, "c": false, "d": null, "e": "win" });
        let mut r = FieldReader::new(&raw);
        assert_eq!(r.string("x", &["a", "b", "c", "d", "e"]).as_deref(), Some("win"));
    }

    #[test]
    fn logical_or_stringifies_numbers_and_true() {
        let raw = json!({ "n": 42, "t": true, "o": { "k": 1 } });
        let mut r = FieldReader::new(&raw);
        assert_eq!(r.string("x", &["o", "n"]).as_deref(), Some("42"));
        assert_eq!(r.string("y", &["t"]).as_deref(), Some("true"));
    }

    #[test]
    fn nullish_keeps_zero_and_stops_at_first_present() {
        let raw = json!({ "a": null, "b": 0, "c": 5 });
        let mut r = FieldReader::new(&raw);
        assert_eq!(r.integer("x", &["a", "b", "c"]), Some(0));

        let raw = json!({ "a": "n/a", "b": 7 });
        let mut r = FieldReader::new(&raw);
        assert_eq!(r.integer("x", &["a", "b"]), None);
    }

    #[test]
    fn numeric_strings_and_bool_strings_parse() {
        let raw = json!({ "n": " 36 ", "b": "FALSE" });
        let mut r = FieldReader::new(&raw);
        assert_eq!(r.integer("x", &["n"]), Some(36));
        assert_eq!(r.boolean("y", &["b"]), Some(false));
    }

    #[test]
    fn timestamps_accept_millis_and_rfc3339() {
        let from_millis = as_timestamp(&json!(1_700_000_000_000_i64));
        let from_text = as_timestamp(&json!("2023-11-14T22:13:20Z"));
        assert!(from_millis.is_some());
        assert_eq!(from_millis, from_text);
        assert_eq!(as_timestamp(&json!("yesterday")), None);
    }

    #[test]
    fn finish_drops_claimed_names_and_records_origin() {
        let raw = json!({ "mac": "AA", "macAddress": "", "other": 1 });
        let mut r = FieldReader::new(&raw);
        let mac = r.string("macAddress", &["macAddress", "mac"]);
        let (extra, origin) = r.finish();

        assert_eq!(mac.as_deref(), Some("AA"));
        assert_eq!(origin.source("macAddress"), Some("mac"));
        assert!(!extra.contains_key("macAddress"));
        assert_eq!(extra.get("mac"), Some(&json!("AA")));
        assert_eq!(extra.get("other"), Some(&json!(1)));
    }

    #[test]
    fn non_object_input_reads_nothing() {
        let raw = json!([1, 2, 3]);
        let mut r = FieldReader::new(&raw);
        assert_eq!(r.string("x", &["0"]), None);
        let (extra, _) = r.finish();
        assert!(extra.is_empty());
    }
}
