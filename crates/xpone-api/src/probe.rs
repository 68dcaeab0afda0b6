// Capability probing
//
// Controller firmware exposes the same logical data under different
// versioned paths. A `Capability` lists the candidate paths in preference
// order, each with a parser that decides whether the body is usable.
// `PlatformClient::probe` walks the table and returns the first hit.

use std::time::Duration;

use reqwest::Method;
use serde_json::{Map, Value};
use tracing::debug;

use crate::client::PlatformClient;
use crate::error::Error;

/// Per-candidate timeout for probes. Kept short: a miss should fall
/// through to the next path quickly.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// One candidate path and the parser that accepts its body.
#[derive(Debug, Clone)]
pub struct Candidate<T> {
    pub path: String,
    pub parser: fn(&Value) -> Option<T>,
}

impl<T> Candidate<T> {
    pub fn new(path: impl Into<String>, parser: fn(&Value) -> Option<T>) -> Self {
        Self {
            path: path.into(),
            parser,
        }
    }
}

/// A logical capability and the ordered paths that may serve it.
#[derive(Debug, Clone)]
pub struct Capability<T> {
    pub name: String,
    pub candidates: Vec<Candidate<T>>,
    pub timeout: Duration,
    /// Analytics/report family: exhaustion is reported as
    /// [`Error::SuppressedAnalytics`] instead of `CapabilityUnavailable`.
    pub analytics: bool,
}

/// The value produced by a successful probe and the path that served it.
#[derive(Debug, Clone, PartialEq)]
pub struct Probed<T> {
    pub value: T,
    pub path: String,
}

/// Accept any list response (bare or wrapped array).
pub fn parse_list(value: &Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items.clone()),
        Value::Object(map) => ["data", "items", "results", "list"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array))
            .cloned(),
        _ => None,
    }
}

/// Accept a non-empty JSON object.
pub fn parse_object(value: &Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) if !map.is_empty() => Some(map.clone()),
        _ => None,
    }
}

impl<T> Capability<T> {
    pub fn new(name: impl Into<String>, candidates: Vec<Candidate<T>>) -> Self {
        Self {
            name: name.into(),
            candidates,
            timeout: PROBE_TIMEOUT,
            analytics: false,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn analytics(mut self) -> Self {
        self.analytics = true;
        self
    }
}

// ── Predefined capabilities ──────────────────────────────────────────

/// Site list: `v3/sites`, then `v1/sites`.
pub fn sites() -> Capability<Vec<Value>> {
    Capability::new(
        "sites",
        vec![
            Candidate::new("v3/sites", parse_list),
            Candidate::new("v1/sites", parse_list),
        ],
    )
}

/// Controller-wide dashboard summary.
pub fn dashboard() -> Capability<Map<String, Value>> {
    Capability::new(
        "dashboard",
        vec![
            Candidate::new("v1/report/dashboard", parse_object),
            Candidate::new("v1/dashboard", parse_object),
            Candidate::new("v3/dashboard", parse_object),
        ],
    )
    .analytics()
}

/// Per-site report.
pub fn site_report(site_id: &str) -> Capability<Map<String, Value>> {
    let id = encode_segment(site_id);
    Capability::new(
        format!("site report ({site_id})"),
        vec![
            Candidate::new(format!("v1/report/sites/{id}"), parse_object),
            Candidate::new(format!("v3/sites/{id}/report"), parse_object),
        ],
    )
    .analytics()
}

/// Per-AP report.
pub fn ap_report(serial: &str) -> Capability<Map<String, Value>> {
    let serial_seg = encode_segment(serial);
    Capability::new(
        format!("ap report ({serial})"),
        vec![
            Candidate::new(format!("v1/report/aps/{serial_seg}"), parse_object),
            Candidate::new(format!("v1/aps/{serial_seg}/report"), parse_object),
        ],
    )
    .analytics()
}

/// Percent-encode a data-derived path segment.
fn encode_segment(raw: &str) -> String {
    url::form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

impl PlatformClient {
    /// Try each candidate of `capability` in order.
    ///
    /// A candidate is skipped on a non-2xx status, a transport failure or
    /// timeout, or a body its parser rejects. Session expiry aborts the
    /// probe immediately.
    pub async fn probe<T>(&self, capability: &Capability<T>) -> Result<Probed<T>, Error> {
        for candidate in &capability.candidates {
            let resp = match self
                .request(Method::GET, &candidate.path, None, Some(capability.timeout))
                .await
            {
                Ok(resp) => resp,
                Err(e) if e.is_auth_expired() => return Err(e),
                Err(e) => {
                    debug!(
                        capability = %capability.name,
                        path = %candidate.path,
                        error = %e,
                        "probe failed"
                    );
                    continue;
                }
            };

            if !resp.ok() {
                debug!(
                    capability = %capability.name,
                    path = %candidate.path,
                    status = resp.status(),
                    "probe miss"
                );
                continue;
            }

            let Ok(body) = resp.value() else {
                debug!(capability = %capability.name, path = %candidate.path, "unparseable body");
                continue;
            };

            if let Some(value) = (candidate.parser)(&body) {
                debug!(capability = %capability.name, path = %candidate.path, "probe hit");
                return Ok(Probed {
                    value,
                    path: candidate.path.clone(),
                });
            }
        }

        if capability.analytics {
            debug!(capability = %capability.name, "analytics capability unavailable");
            Err(Error::SuppressedAnalytics {
                capability: capability.name.clone(),
            })
        } else {
            Err(Error::CapabilityUnavailable {
                capability: capability.name.clone(),
                tried: capability.candidates.len(),
            })
        }
    }
}
