// Management API resource endpoints
//
// Collections come back as raw JSON values: the shapes vary by firmware and
// are reconciled by the normalization layer in `xpone-core`, not here.

use serde_json::Value;
use tracing::debug;

use crate::client::PlatformClient;
use crate::error::Error;

/// Pull the record array out of a list response.
///
/// Accepts a bare array or an object wrapping one under `data`, `items`,
/// `results`, or `list`. Anything else yields an empty list.
pub fn extract_list(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(mut map) => ["data", "items", "results", "list"]
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

impl PlatformClient {
    async fn list(&self, path: &str) -> Result<Vec<Value>, Error> {
        let url = self.url(path)?;
        let value = self.get_value(url).await?;
        let items = extract_list(value);
        debug!(path, count = items.len(), "listed records");
        Ok(items)
    }

    // ── Collections ──────────────────────────────────────────────────

    /// `GET v3/sites`
    pub async fn get_sites(&self) -> Result<Vec<Value>, Error> {
        self.list("v3/sites").await
    }

    /// `GET v1/aps`
    pub async fn get_access_points(&self) -> Result<Vec<Value>, Error> {
        self.list("v1/aps").await
    }

    /// `GET v1/services`
    pub async fn get_services(&self) -> Result<Vec<Value>, Error> {
        self.list("v1/services").await
    }

    /// `GET v1/roles`
    pub async fn get_roles(&self) -> Result<Vec<Value>, Error> {
        self.list("v1/roles").await
    }

    /// `GET v1/stations`
    pub async fn get_stations(&self) -> Result<Vec<Value>, Error> {
        self.list("v1/stations").await
    }

    /// `GET v1/cos`
    pub async fn get_class_of_service(&self) -> Result<Vec<Value>, Error> {
        self.list("v1/cos").await
    }

    /// `GET v1/topologies`
    pub async fn get_topologies(&self) -> Result<Vec<Value>, Error> {
        self.list("v1/topologies").await
    }

    /// `GET v1/aaapolicy`
    pub async fn get_aaa_policies(&self) -> Result<Vec<Value>, Error> {
        self.list("v1/aaapolicy").await
    }

    // ── Single records ───────────────────────────────────────────────

    /// `GET v1/aps/{serial}`
    pub async fn get_access_point(&self, serial: &str) -> Result<Value, Error> {
        let url = self.url_from_segments(&["v1", "aps", serial])?;
        debug!(serial, "fetching access point");
        self.get_value(url).await
    }

    /// Replace an access point's configuration.
    ///
    /// `PUT v1/aps/{serial}` with the full record as body.
    pub async fn update_access_point(&self, serial: &str, body: &Value) -> Result<Value, Error> {
        let url = self.url_from_segments(&["v1", "aps", serial])?;
        debug!(serial, "updating access point");
        self.put_value(url, body).await
    }

    /// `GET v1/services/{id}`
    pub async fn get_service(&self, id: &str) -> Result<Value, Error> {
        let url = self.url_from_segments(&["v1", "services", id])?;
        debug!(id, "fetching service");
        self.get_value(url).await
    }

    /// Replace a service's configuration.
    ///
    /// `PUT v1/services/{id}` with the full record as body.
    pub async fn update_service(&self, id: &str, body: &Value) -> Result<Value, Error> {
        let url = self.url_from_segments(&["v1", "services", id])?;
        debug!(id, "updating service");
        self.put_value(url, body).await
    }

    /// `GET v3/sites/{id}`
    pub async fn get_site(&self, id: &str) -> Result<Value, Error> {
        let url = self.url_from_segments(&["v3", "sites", id])?;
        debug!(id, "fetching site");
        self.get_value(url).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn bare_array_is_the_list() {
        assert_eq!(extract_list(json!([{"a": 1}, {"a": 2}])).len(), 2);
    }

    #[test]
    fn wrapped_arrays_are_unwrapped() {
        for key in ["data", "items", "results", "list"] {
            let items = extract_list(json!({ key: [1, 2, 3], "total": 3 }));
            assert_eq!(items.len(), 3, "wrapper key {key}");
        }
    }

    #[test]
    fn other_shapes_are_empty() {
        assert!(extract_list(Value::Null).is_empty());
        assert!(extract_list(json!({"data": {"not": "a list"}})).is_empty());
        assert!(extract_list(json!("aps")).is_empty());
    }
}
