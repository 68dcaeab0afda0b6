// ── Persisted client preferences ──
//
// A key/value store of JSON values behind a pluggable backend, with an
// in-memory cache in front. Typed accessors cover the general preferences
// and per-table column state. Last writer wins.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString};
use tracing::{debug, warn};

use crate::columns::{ColumnDef, TableState};
use crate::error::CoreError;

const PREFERENCES_KEY: &str = "preferences";

/// Storage for preference values.
pub trait PreferenceBackend: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<Value>, CoreError>;
    fn store(&self, key: &str, value: &Value) -> Result<(), CoreError>;
    fn remove(&self, key: &str) -> Result<(), CoreError>;
}

// ── Backends ─────────────────────────────────────────────────────────

/// Process-local backend; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: DashMap<String, Value>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceBackend for MemoryBackend {
    fn load(&self, key: &str) -> Result<Option<Value>, CoreError> {
        Ok(self.entries.get(key).map(|v| v.clone()))
    }

    fn store(&self, key: &str, value: &Value) -> Result<(), CoreError> {
        self.entries.insert(key.to_owned(), value.clone());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// All keys in one JSON object on disk. Every write rewrites the file.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<Map<String, Value>, CoreError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(storage_error(&self.path, &e)),
        };
        if text.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str(&text) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => {
                warn!(path = %self.path.display(), "settings file is not a JSON object, ignoring");
                Ok(Map::new())
            }
            Err(e) => Err(storage_error(&self.path, &e)),
        }
    }

    fn write_document(&self, doc: &Map<String, Value>) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| storage_error(parent, &e))?;
        }
        let text = serde_json::to_string_pretty(doc).map_err(|e| storage_error(&self.path, &e))?;
        std::fs::write(&self.path, text).map_err(|e| storage_error(&self.path, &e))
    }

    fn update(&self, edit: impl FnOnce(&mut Map<String, Value>)) -> Result<(), CoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut doc = self.read_document()?;
        edit(&mut doc);
        self.write_document(&doc)
    }
}

fn storage_error(path: &Path, err: &dyn std::fmt::Display) -> CoreError {
    CoreError::Storage {
        message: format!("{}: {err}", path.display()),
    }
}

impl PreferenceBackend for FileBackend {
    fn load(&self, key: &str) -> Result<Option<Value>, CoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read_document()?.remove(key))
    }

    fn store(&self, key: &str, value: &Value) -> Result<(), CoreError> {
        self.update(|doc| {
            doc.insert(key.to_owned(), value.clone());
        })
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        self.update(|doc| {
            doc.remove(key);
        })
    }
}

// ── Typed preferences ────────────────────────────────────────────────

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub theme: Theme,
    pub sidebar_collapsed: bool,
    pub notifications_enabled: bool,
    /// Dashboard auto-refresh period, in seconds. 0 disables it.
    pub refresh_interval_secs: u64,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            sidebar_collapsed: false,
            notifications_enabled: true,
            refresh_interval_secs: 30,
        }
    }
}

// ── Settings service ─────────────────────────────────────────────────

/// Cached, typed access to a [`PreferenceBackend`].
pub struct Settings<B> {
    backend: B,
    cache: DashMap<String, Option<Value>>,
}

impl<B: PreferenceBackend> Settings<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            cache: DashMap::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Raw value for `key`, read through the cache.
    pub fn get_raw(&self, key: &str) -> Result<Option<Value>, CoreError> {
        if let Some(hit) = self.cache.get(key) {
            return Ok(hit.clone());
        }
        let value = self.backend.load(key)?;
        self.cache.insert(key.to_owned(), value.clone());
        Ok(value)
    }

    /// Write through to the backend, then update the cache.
    pub fn set_raw(&self, key: &str, value: Value) -> Result<(), CoreError> {
        self.backend.store(key, &value)?;
        self.cache.insert(key.to_owned(), Some(value));
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<(), CoreError> {
        self.backend.remove(key)?;
        self.cache.insert(key.to_owned(), None);
        Ok(())
    }

    /// Typed read. A stored value of the wrong shape is logged and treated
    /// as absent.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CoreError> {
        let Some(value) = self.get_raw(key)? else {
            return Ok(None);
        };
        match serde_json::from_value(value) {
            Ok(typed) => Ok(Some(typed)),
            Err(e) => {
                warn!(key, error = %e, "ignoring malformed setting");
                Ok(None)
            }
        }
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CoreError> {
        let value = serde_json::to_value(value).map_err(|e| CoreError::Storage {
            message: format!("{key}: {e}"),
        })?;
        self.set_raw(key, value)
    }

    /// Drop cached values so the next read hits the backend.
    pub fn invalidate(&self) {
        self.cache.clear();
    }

    // ── Preferences ──────────────────────────────────────────────────

    pub fn preferences(&self) -> Result<Preferences, CoreError> {
        Ok(self.get(PREFERENCES_KEY)?.unwrap_or_default())
    }

    pub fn set_preferences(&self, prefs: &Preferences) -> Result<(), CoreError> {
        self.set(PREFERENCES_KEY, prefs)
    }

    /// Read-modify-write of the preferences document.
    pub fn update_preferences(
        &self,
        edit: impl FnOnce(&mut Preferences),
    ) -> Result<Preferences, CoreError> {
        let mut prefs = self.preferences()?;
        edit(&mut prefs);
        self.set_preferences(&prefs)?;
        Ok(prefs)
    }

    // ── Table state ──────────────────────────────────────────────────

    /// Column state for `table_id`, reconciled against `columns`.
    ///
    /// Falls back to the legacy keys on first read; anything found there is
    /// written under the current key and the legacy keys are removed.
    pub fn table_state(
        &self,
        table_id: &str,
        columns: &[ColumnDef],
    ) -> Result<TableState, CoreError> {
        let key = table_key(table_id);
        let mut state = match self.get::<TableState>(&key)? {
            Some(state) => state,
            None => match self.migrate_legacy(table_id, columns)? {
                Some(state) => {
                    self.set(&key, &state)?;
                    state
                }
                None => TableState::defaults(columns),
            },
        };
        state.reconcile(columns);
        Ok(state)
    }

    pub fn save_table_state(&self, table_id: &str, state: &TableState) -> Result<(), CoreError> {
        self.set(&table_key(table_id), state)
    }

    pub fn reset_table_state(&self, table_id: &str) -> Result<(), CoreError> {
        self.remove(&table_key(table_id))
    }

    fn migrate_legacy(
        &self,
        table_id: &str,
        columns: &[ColumnDef],
    ) -> Result<Option<TableState>, CoreError> {
        let visible_key = format!("{table_id}_visible_columns");
        let columns_key = format!("{table_id}-columns");

        let visible = self.get_raw(&visible_key)?;
        let configs = self.get_raw(&columns_key)?;
        if visible.is_none() && configs.is_none() {
            return Ok(None);
        }

        let mut state = TableState::defaults(columns);
        if let Some(Value::Array(entries)) = &configs {
            apply_legacy_column_configs(&mut state, entries);
        }
        if let Some(Value::Array(ids)) = &visible {
            state.visible_columns = ids
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect();
        }

        debug!(table_id, "migrated legacy column settings");
        self.remove(&visible_key)?;
        self.remove(&columns_key)?;
        Ok(Some(state))
    }
}

fn table_key(table_id: &str) -> String {
    format!("table.{table_id}")
}

/// Legacy `<tableId>-columns` entries: `[{"id", "visible", "width", "pinned"}]`
/// in display order.
fn apply_legacy_column_configs(state: &mut TableState, entries: &[Value]) {
    let mut order = Vec::new();
    let mut visible = Vec::new();
    for entry in entries {
        let Some(id) = entry.get("id").and_then(Value::as_str) else {
            continue;
        };
        order.push(id.to_owned());
        if entry.get("visible").and_then(Value::as_bool).unwrap_or(true) {
            visible.push(id.to_owned());
        }
        if let Some(width) = entry
            .get("width")
            .and_then(Value::as_u64)
            .and_then(|w| u32::try_from(w).ok())
        {
            state.set_width(id, width);
        }
        if entry.get("pinned").and_then(Value::as_bool).unwrap_or(false) {
            state.pinned_columns.push(id.to_owned());
        }
    }
    if !order.is_empty() {
        state.column_order = order;
        state.visible_columns = visible;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    const COLUMNS: &[ColumnDef] = &[
        ColumnDef::new("name", "Name"),
        ColumnDef::new("ip", "IP Address"),
        ColumnDef::new("ssid", "SSID").hidden(),
    ];

    #[test]
    fn preferences_default_when_missing_or_malformed() {
        let settings = Settings::new(MemoryBackend::new());
        assert_eq!(settings.preferences().unwrap(), Preferences::default());

        settings.set_raw(PREFERENCES_KEY, json!("dark")).unwrap();
        assert_eq!(settings.preferences().unwrap(), Preferences::default());
    }

    #[test]
    fn preferences_round_trip_through_backend() {
        let settings = Settings::new(MemoryBackend::new());
        settings
            .update_preferences(|p| {
                p.theme = Theme::Dark;
                p.sidebar_collapsed = true;
            })
            .unwrap();

        let stored = settings.backend().load(PREFERENCES_KEY).unwrap().unwrap();
        assert_eq!(stored["theme"], json!("dark"));
        assert_eq!(stored["sidebarCollapsed"], json!(true));
        assert_eq!("LIGHT".parse::<Theme>().unwrap(), Theme::Light);
    }

    #[test]
    fn table_state_defaults_then_persists() {
        let settings = Settings::new(MemoryBackend::new());
        let mut state = settings.table_state("aps", COLUMNS).unwrap();
        assert_eq!(state.visible_in_order(), vec!["name", "ip"]);

        state.toggle_column("ssid");
        settings.save_table_state("aps", &state).unwrap();
        assert!(settings.backend().load("table.aps").unwrap().is_some());

        let reloaded = settings.table_state("aps", COLUMNS).unwrap();
        assert_eq!(reloaded.visible_in_order(), vec!["name", "ip", "ssid"]);
    }

    #[test]
    fn legacy_visible_columns_key_is_migrated() {
        let backend = MemoryBackend::new();
        backend
            .store("clients_visible_columns", &json!(["ip", "ssid"]))
            .unwrap();
        let settings = Settings::new(backend);

        let state = settings.table_state("clients", COLUMNS).unwrap();
        assert_eq!(state.visible_in_order(), vec!["ip", "ssid"]);
        assert!(settings.backend().load("clients_visible_columns").unwrap().is_none());
        assert!(settings.backend().load("table.clients").unwrap().is_some());
    }

    #[test]
    fn legacy_column_configs_are_migrated() {
        let backend = MemoryBackend::new();
        backend
            .store(
                "aps-columns",
                &json!([
                    { "id": "ssid", "visible": true, "width": 20 },
                    { "id": "name", "visible": true, "pinned": true },
                    { "id": "ip", "visible": false, "width": 200 },
                ]),
            )
            .unwrap();
        let settings = Settings::new(backend);

        let state = settings.table_state("aps", COLUMNS).unwrap();
        assert_eq!(state.column_order, vec!["ssid", "name", "ip"]);
        assert_eq!(state.visible_in_order(), vec!["name", "ssid"]);
        assert_eq!(state.width("ssid"), Some(40));
        assert_eq!(state.width("ip"), Some(200));
        assert!(settings.backend().load("aps-columns").unwrap().is_none());
    }

    #[test]
    fn file_backend_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let settings = Settings::new(FileBackend::new(&path));
        settings
            .update_preferences(|p| p.refresh_interval_secs = 60)
            .unwrap();
        settings.set("custom", &json!({ "a": 1 })).unwrap();

        let reopened = Settings::new(FileBackend::new(&path));
        assert_eq!(reopened.preferences().unwrap().refresh_interval_secs, 60);
        assert_eq!(reopened.get::<Value>("custom").unwrap(), Some(json!({ "a": 1 })));

        reopened.remove("custom").unwrap();
        assert_eq!(FileBackend::new(&path).load("custom").unwrap(), None);
    }

    #[test]
    fn corrupt_settings_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = FileBackend::new(&path).load("preferences").unwrap_err();
        assert!(matches!(err, CoreError::Storage { .. }));
    }
}
