// ── Canonical domain types ──
//
// Records produced by `crate::normalize`. Every record keeps the raw keys
// that are not canonical field names in a flattened `extra` map, so a
// serialized record is the raw object with canonical fields laid over it.

pub mod access_point;
pub mod passthrough;
pub mod service;
pub mod site;
pub mod station;

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

pub use access_point::{AccessPoint, Radio, ReqChannel};
pub use passthrough::{AaaPolicy, ClassOfService, Role, Topology};
pub use service::{Security, SecurityMode, Service};
pub use site::Site;
pub use station::Station;

/// Which raw key each canonical field was resolved from, and the value
/// each canonical field had when the record was normalized.
///
/// Write-back payloads use it to put edited values under the key the
/// controller sent, instead of introducing a second spelling, and to leave
/// out values that were derived rather than sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldOrigin {
    sources: BTreeMap<&'static str, &'static str>,
    resolved: Map<String, Value>,
}

impl FieldOrigin {
    pub(crate) fn record(&mut self, canonical: &'static str, source: &'static str) {
        self.sources.insert(canonical, source);
    }

    /// Snapshot the canonical fields of a freshly normalized `record`.
    /// Keys in `extra` are raw passthrough, not canonical.
    pub(crate) fn remember<T: Serialize>(&mut self, record: &T, extra: &Map<String, Value>) {
        if let Ok(Value::Object(map)) = serde_json::to_value(record) {
            self.resolved = map
                .into_iter()
                .filter(|(k, _)| !extra.contains_key(k))
                .collect();
        }
    }

    /// Raw key `canonical` was read from, if it was resolved at all.
    pub fn source(&self, canonical: &str) -> Option<&'static str> {
        self.sources.get(canonical).copied()
    }

    /// Every resolved `(canonical, raw key)` pair.
    pub fn sources(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.sources.iter().map(|(c, s)| (*c, *s))
    }

    /// Whether `current` differs from the value `canonical` had at
    /// normalization.
    pub fn is_edited(&self, canonical: &str, current: Option<&Value>) -> bool {
        self.resolved.get(canonical) != current
    }

    /// Canonical fields that held a value at normalization without being
    /// read from any raw key, i.e. values derived from other fields.
    pub fn derived(&self) -> impl Iterator<Item = &str> + '_ {
        self.resolved
            .keys()
            .map(String::as_str)
            .filter(|k| !self.sources.contains_key(k))
    }
}
