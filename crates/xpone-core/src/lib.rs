//! Normalization layer and shared client services between `xpone-api` and
//! its consumers.
//!
//! - **[`normalize`]**: pure functions that turn raw controller JSON, whose
//!   field names drift between firmware releases, into canonical records.
//!   Unknown keys survive in each record's `extra` map, and
//!   [`access_point_payload`] / [`service_payload`] rebuild the vendor shape
//!   for writes.
//!
//! - **[`Dashboard`]**: facade over one controller. Cached, normalized
//!   reads; writes; concurrent snapshots that tolerate partial failure; and
//!   a latest-wins refresh published on a `watch` channel.
//!
//! - **[`Settings`]**: persisted preferences and per-table column state
//!   behind a pluggable [`PreferenceBackend`].
//!
//! - **[`codes`]**: IEEE 802.11 reason and status code descriptions.

pub mod cache;
pub mod codes;
pub mod columns;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod latest;
pub mod model;
pub mod normalize;
pub mod settings;

// ── Primary re-exports ──────────────────────────────────────────────
pub use cache::TtlCache;
pub use columns::{ColumnDef, TableState};
pub use config::ClientConfig;
pub use dashboard::{
    Dashboard, DashboardSnapshot, DashboardSummary, DerivedSummary, FetchFailure, RadioUpdate,
};
pub use error::{CoreError, ErrorClass};
pub use latest::{LatestGuard, Ticket};
pub use settings::{FileBackend, MemoryBackend, PreferenceBackend, Preferences, Settings, Theme};

pub use model::{
    AaaPolicy, AccessPoint, ClassOfService, FieldOrigin, Radio, ReqChannel, Role, Security,
    SecurityMode, Service, Site, Station, Topology,
};
pub use normalize::{
    access_point_payload, normalize_access_point, normalize_access_points, normalize_service,
    normalize_services, normalize_site, normalize_sites, normalize_station, normalize_stations,
    service_payload,
};

// Re-export the API types consumers need to build a `ClientConfig`.
pub use xpone_api::{ApiBase, Credentials, TlsMode};
