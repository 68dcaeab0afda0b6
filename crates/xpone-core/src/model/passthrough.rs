// ── Passthrough configuration records ──
//
// Roles, classes of service, topologies and AAA policies are consumed
// verbatim. Each is a typed wrapper over the raw object with a couple of
// convenience accessors; nothing is renamed or defaulted.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

macro_rules! passthrough_record {
    ($(#[$meta:meta])* $name:ident, name_keys = [$($key:literal),+ $(,)?]) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Map<String, Value>);

        impl $name {
            /// Wrap a raw record. Non-objects become an empty record.
            pub fn from_raw(raw: &Value) -> Self {
                Self(raw.as_object().cloned().unwrap_or_default())
            }

            pub fn id(&self) -> Option<&str> {
                self.0.get("id").and_then(Value::as_str)
            }

            pub fn name(&self) -> Option<&str> {
                [$($key),+]
                    .iter()
                    .find_map(|k| self.0.get(*k).and_then(Value::as_str))
                    .filter(|s| !s.is_empty())
            }

            pub fn get(&self, key: &str) -> Option<&Value> {
                self.0.get(key)
            }

            pub fn into_inner(self) -> Map<String, Value> {
                self.0
            }
        }
    };
}

passthrough_record!(
    /// Access-control role (firewall and policy rules for matching clients).
    Role,
    name_keys = ["name", "roleName"]
);

passthrough_record!(
    /// Class of service (QoS marking and rate limits).
    ClassOfService,
    name_keys = ["cosName", "name"]
);

passthrough_record!(
    /// Network topology (VLAN definition).
    Topology,
    name_keys = ["name", "topologyName"]
);

passthrough_record!(
    /// RADIUS / AAA server policy.
    AaaPolicy,
    name_keys = ["name", "policyName"]
);
