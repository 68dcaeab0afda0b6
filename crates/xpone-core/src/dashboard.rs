// ── Dashboard facade ──
//
// The one entry point consumers use. Every collection read goes through the
// TTL cache and the normalizer; writes rebuild the vendor payload from the
// canonical record. Background refreshes publish whole snapshots on a watch
// channel, and a newer refresh always supersedes an older one.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use xpone_api::{PlatformClient, probe};

use crate::cache::TtlCache;
use crate::config::ClientConfig;
use crate::error::{CoreError, ErrorClass};
use crate::latest::LatestGuard;
use crate::model::{
    AaaPolicy, AccessPoint, ClassOfService, ReqChannel, Role, Service, Site, Station, Topology,
};
use crate::normalize::{
    access_point_payload, normalize_access_point, normalize_service, normalize_site,
    normalize_station, service_payload,
};

// Cache keys, one per list endpoint.
const STATIONS: &str = "stations";
const ACCESS_POINTS: &str = "access_points";
const SERVICES: &str = "services";
const SITES: &str = "sites";
const ROLES: &str = "roles";
const CLASS_OF_SERVICE: &str = "class_of_service";
const TOPOLOGIES: &str = "topologies";
const AAA_POLICIES: &str = "aaa_policies";

// ── Snapshot ─────────────────────────────────────────────────────────

/// A collection that could not be fetched during a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchFailure {
    pub collection: &'static str,
    pub class: String,
    pub message: String,
}

/// Everything the dashboard shows, fetched together.
///
/// A collection whose fetch failed is empty and has a matching entry in
/// `failures`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub stations: Vec<Station>,
    pub access_points: Vec<AccessPoint>,
    pub services: Vec<Service>,
    pub sites: Vec<Site>,
    pub failures: Vec<FetchFailure>,
    pub fetched_at: DateTime<Utc>,
}

impl DashboardSnapshot {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Keep the items of a successful fetch; log and record a failed one.
fn settle<T>(
    collection: &'static str,
    result: Result<Vec<T>, CoreError>,
    failures: &mut Vec<FetchFailure>,
) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(e) => {
            let class = e.class();
            if class == ErrorClass::EndpointUnavailable {
                debug!("{collection}: not available, treating as empty");
            } else {
                warn!("{collection}: {e}, treating as empty");
            }
            failures.push(FetchFailure {
                collection,
                class: class.to_string(),
                message: e.to_string(),
            });
            Vec::new()
        }
    }
}

// ── Summary ──────────────────────────────────────────────────────────

/// Counts computed locally when the controller has no dashboard report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedSummary {
    pub access_points: usize,
    pub access_points_online: usize,
    pub access_points_by_status: BTreeMap<String, usize>,
    pub clients: usize,
    pub clients_by_band: BTreeMap<String, usize>,
    pub services: usize,
    pub sites: usize,
}

impl DerivedSummary {
    pub fn from_snapshot(snapshot: &DashboardSnapshot) -> Self {
        let mut by_status = BTreeMap::new();
        for ap in &snapshot.access_points {
            let status = ap.status.clone().unwrap_or_else(|| "unknown".into());
            *by_status.entry(status).or_insert(0) += 1;
        }

        let mut by_band = BTreeMap::new();
        for station in &snapshot.stations {
            let band = station
                .band
                .as_deref()
                .map_or("unknown", str::trim)
                .to_owned();
            *by_band.entry(band).or_insert(0) += 1;
        }

        Self {
            access_points: snapshot.access_points.len(),
            access_points_online: snapshot
                .access_points
                .iter()
                .filter(|ap| ap.is_online())
                .count(),
            access_points_by_status: by_status,
            clients: snapshot.stations.len(),
            clients_by_band: by_band,
            services: snapshot.services.len(),
            sites: snapshot.sites.len(),
        }
    }
}

/// Dashboard summary: the controller's own report when it has one,
/// otherwise counts derived from a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "camelCase")]
pub enum DashboardSummary {
    Controller {
        path: String,
        report: Map<String, Value>,
    },
    Derived(DerivedSummary),
}

// ── Radio edits ──────────────────────────────────────────────────────

/// Fields of one radio to change. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RadioUpdate {
    pub admin_state: Option<bool>,
    pub mode: Option<String>,
    pub channel_width: Option<String>,
    pub use_smart_rf: Option<bool>,
    pub req_channel: Option<ReqChannel>,
    pub tx_max_power: Option<i64>,
}

// ── Dashboard ────────────────────────────────────────────────────────

/// Cheaply cloneable handle over one controller connection.
#[derive(Clone)]
pub struct Dashboard {
    inner: Arc<DashboardInner>,
}

struct DashboardInner {
    client: Arc<PlatformClient>,
    cache: TtlCache<Arc<Vec<Value>>>,
    guard: LatestGuard,
    snapshot: watch::Sender<Arc<DashboardSnapshot>>,
}

impl Dashboard {
    /// Wrap an existing client. `cache_ttl` bounds how stale list reads get.
    pub fn new(client: Arc<PlatformClient>, cache_ttl: Duration) -> Self {
        let (snapshot, _) = watch::channel(Arc::new(DashboardSnapshot::default()));
        Self {
            inner: Arc::new(DashboardInner {
                client,
                cache: TtlCache::new(cache_ttl),
                guard: LatestGuard::new(),
                snapshot,
            }),
        }
    }

    /// Build a client from `config` and log in when credentials are given.
    pub async fn connect(config: &ClientConfig) -> Result<Self, CoreError> {
        let client =
            PlatformClient::new(&config.controller, config.api_base, &config.transport())?;
        if let Some(credentials) = &config.credentials {
            client.login(credentials).await?;
            info!(controller = %config.controller, "logged in");
        }
        Ok(Self::new(Arc::new(client), config.cache_ttl))
    }

    pub fn client(&self) -> &PlatformClient {
        &self.inner.client
    }

    /// Drop every cached list so the next read hits the controller.
    pub fn invalidate(&self) {
        self.inner.cache.clear();
    }

    /// The cached raw list under `key`, or the result of `fetch` (which is
    /// only polled on a miss).
    ///
    /// A fetch overtaken by a refresh that began after it is returned to
    /// its caller but not cached.
    async fn cached(
        &self,
        key: &'static str,
        fetch: impl Future<Output = Result<Vec<Value>, xpone_api::Error>>,
    ) -> Result<Arc<Vec<Value>>, CoreError> {
        if let Some(hit) = self.inner.cache.get(key) {
            debug!(key, "cache hit");
            return Ok(hit);
        }
        let ticket = self.inner.guard.current();
        let items = Arc::new(fetch.await?);
        let stored = self
            .inner
            .guard
            .commit(ticket, Arc::clone(&items), |v| self.inner.cache.insert(key, v));
        if !stored {
            debug!(key, "superseded fetch not cached");
        }
        Ok(items)
    }

    // ── Collections ──────────────────────────────────────────────────

    pub async fn stations(&self) -> Result<Vec<Station>, CoreError> {
        let raw = self.cached(STATIONS, self.client().get_stations()).await?;
        Ok(raw.iter().map(normalize_station).collect())
    }

    pub async fn access_points(&self) -> Result<Vec<AccessPoint>, CoreError> {
        let raw = self
            .cached(ACCESS_POINTS, self.client().get_access_points())
            .await?;
        Ok(raw.iter().map(normalize_access_point).collect())
    }

    pub async fn services(&self) -> Result<Vec<Service>, CoreError> {
        let raw = self.cached(SERVICES, self.client().get_services()).await?;
        Ok(raw.iter().map(normalize_service).collect())
    }

    /// Sites, from whichever sites endpoint this firmware exposes.
    pub async fn sites(&self) -> Result<Vec<Site>, CoreError> {
        let fetch = async {
            let capability = probe::sites();
            self.client().probe(&capability).await.map(|p| p.value)
        };
        let raw = self.cached(SITES, fetch).await?;
        Ok(raw.iter().map(normalize_site).collect())
    }

    pub async fn roles(&self) -> Result<Vec<Role>, CoreError> {
        let raw = self.cached(ROLES, self.client().get_roles()).await?;
        Ok(raw.iter().map(Role::from_raw).collect())
    }

    pub async fn class_of_service(&self) -> Result<Vec<ClassOfService>, CoreError> {
        let raw = self
            .cached(CLASS_OF_SERVICE, self.client().get_class_of_service())
            .await?;
        Ok(raw.iter().map(ClassOfService::from_raw).collect())
    }

    pub async fn topologies(&self) -> Result<Vec<Topology>, CoreError> {
        let raw = self
            .cached(TOPOLOGIES, self.client().get_topologies())
            .await?;
        Ok(raw.iter().map(Topology::from_raw).collect())
    }

    pub async fn aaa_policies(&self) -> Result<Vec<AaaPolicy>, CoreError> {
        let raw = self
            .cached(AAA_POLICIES, self.client().get_aaa_policies())
            .await?;
        Ok(raw.iter().map(AaaPolicy::from_raw).collect())
    }

    // ── Single records ───────────────────────────────────────────────

    pub async fn access_point(&self, serial: &str) -> Result<AccessPoint, CoreError> {
        match self.client().get_access_point(serial).await {
            Ok(raw) => Ok(normalize_access_point(&raw)),
            Err(e) if e.is_not_found() => Err(CoreError::NotFound {
                entity_type: "access point",
                identifier: serial.to_owned(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn service(&self, id: &str) -> Result<Service, CoreError> {
        match self.client().get_service(id).await {
            Ok(raw) => Ok(normalize_service(&raw)),
            Err(e) if e.is_not_found() => Err(CoreError::NotFound {
                entity_type: "service",
                identifier: id.to_owned(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// PUT the access point back. Returns the controller's copy when it
    /// echoes one, otherwise the record as sent.
    pub async fn save_access_point(&self, ap: &AccessPoint) -> Result<AccessPoint, CoreError> {
        let serial = ap
            .serial_number
            .as_deref()
            .ok_or_else(|| CoreError::ValidationFailed {
                message: "access point has no serial number".into(),
            })?;
        let payload = access_point_payload(ap);
        let response = self
            .client()
            .update_access_point(serial, &payload)
            .await
            .map_err(CoreError::from_write)?;
        self.inner.cache.remove(ACCESS_POINTS);
        info!(serial, "access point saved");

        Ok(if response.is_object() {
            normalize_access_point(&response)
        } else {
            ap.clone()
        })
    }

    /// PUT the service back. Same response handling as
    /// [`save_access_point`](Self::save_access_point).
    pub async fn save_service(&self, service: &Service) -> Result<Service, CoreError> {
        let id = service
            .id
            .as_deref()
            .ok_or_else(|| CoreError::ValidationFailed {
                message: "service has no id".into(),
            })?;
        let payload = service_payload(service);
        let response = self
            .client()
            .update_service(id, &payload)
            .await
            .map_err(CoreError::from_write)?;
        self.inner.cache.remove(SERVICES);
        info!(id, "service saved");

        Ok(if response.is_object() {
            normalize_service(&response)
        } else {
            service.clone()
        })
    }

    /// Apply `update` to the radio with `index`. Nothing is sent until the
    /// access point is saved.
    pub fn set_radio(
        ap: &mut AccessPoint,
        index: i64,
        update: RadioUpdate,
    ) -> Result<(), CoreError> {
        let identifier = format!(
            "{}/{index}",
            ap.serial_number.as_deref().unwrap_or("unknown")
        );
        let radio = ap.radio_mut(index).ok_or(CoreError::NotFound {
            entity_type: "radio",
            identifier,
        })?;

        if let Some(channel) = update.req_channel {
            if matches!(channel, ReqChannel::Channel(0)) {
                return Err(CoreError::ValidationFailed {
                    message: "channel 0 is not valid; use auto".into(),
                });
            }
            radio.req_channel = Some(channel);
        }
        if let Some(state) = update.admin_state {
            radio.admin_state = Some(state);
        }
        if let Some(mode) = update.mode {
            radio.mode = Some(mode);
        }
        if let Some(width) = update.channel_width {
            radio.channel_width = Some(width);
        }
        if let Some(smart_rf) = update.use_smart_rf {
            radio.use_smart_rf = Some(smart_rf);
        }
        if let Some(power) = update.tx_max_power {
            radio.tx_max_power = Some(power);
        }
        Ok(())
    }

    /// The access point `station` is associated with, matched by serial
    /// first and then by name.
    pub fn station_access_point<'a>(
        station: &Station,
        access_points: &'a [AccessPoint],
    ) -> Option<&'a AccessPoint> {
        let by_serial = station.ap_serial.as_deref().and_then(|serial| {
            access_points
                .iter()
                .find(|ap| ap.serial_number.as_deref() == Some(serial))
        });
        by_serial.or_else(|| {
            let name = station.ap_name.as_deref()?;
            access_points
                .iter()
                .find(|ap| ap.display_name.as_deref() == Some(name))
        })
    }

    // ── Reports ──────────────────────────────────────────────────────

    /// Controller dashboard report, or a locally derived summary when no
    /// dashboard endpoint answers.
    pub async fn dashboard_summary(&self) -> Result<DashboardSummary, CoreError> {
        match self.client().probe(&probe::dashboard()).await {
            Ok(found) => {
                return Ok(DashboardSummary::Controller {
                    path: found.path,
                    report: found.value,
                });
            }
            Err(e) if e.is_auth_expired() => return Err(e.into()),
            Err(e) => debug!(error = %e, "no dashboard report, deriving summary"),
        }
        let snapshot = self.snapshot().await?;
        Ok(DashboardSummary::Derived(DerivedSummary::from_snapshot(
            &snapshot,
        )))
    }

    pub async fn site_report(
        &self,
        site_id: &str,
    ) -> Result<Option<Map<String, Value>>, CoreError> {
        self.report(&probe::site_report(site_id)).await
    }

    pub async fn access_point_report(
        &self,
        serial: &str,
    ) -> Result<Option<Map<String, Value>>, CoreError> {
        self.report(&probe::ap_report(serial)).await
    }

    /// Reports for every site with an id, fetched concurrently. Sites
    /// without a report are left out.
    pub async fn site_reports(&self, sites: &[Site]) -> Vec<(String, Map<String, Value>)> {
        let futs = sites.iter().filter_map(|s| s.id.clone()).map(|id| async move {
            match self.site_report(&id).await {
                Ok(Some(report)) => Some((id, report)),
                Ok(None) => None,
                Err(e) => {
                    warn!(site_id = %id, error = %e, "site report fetch failed");
                    None
                }
            }
        });
        futures_util::future::join_all(futs)
            .await
            .into_iter()
            .flatten()
            .collect()
    }

    /// Analytics reports are optional; a suppressed one is `None`.
    async fn report(
        &self,
        capability: &probe::Capability<Map<String, Value>>,
    ) -> Result<Option<Map<String, Value>>, CoreError> {
        match self.client().probe(capability).await {
            Ok(found) => Ok(Some(found.value)),
            Err(e) if e.is_suppressed() => {
                debug!(capability = %capability.name, "report suppressed");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    // ── Snapshot & refresh ───────────────────────────────────────────

    /// Fetch the four main collections concurrently. Individual failures
    /// leave their collection empty; only an expired session is an error.
    pub async fn snapshot(&self) -> Result<DashboardSnapshot, CoreError> {
        let (stations, access_points, services, sites) = tokio::join!(
            self.stations(),
            self.access_points(),
            self.services(),
            self.sites(),
        );

        let expired = [
            stations.as_ref().err(),
            access_points.as_ref().err(),
            services.as_ref().err(),
            sites.as_ref().err(),
        ]
        .into_iter()
        .flatten()
        .any(|e| e.class() == ErrorClass::SessionExpired);
        if expired {
            return Err(CoreError::SessionExpired);
        }

        let mut failures = Vec::new();
        Ok(DashboardSnapshot {
            stations: settle(STATIONS, stations, &mut failures),
            access_points: settle(ACCESS_POINTS, access_points, &mut failures),
            services: settle(SERVICES, services, &mut failures),
            sites: settle(SITES, sites, &mut failures),
            failures,
            fetched_at: Utc::now(),
        })
    }

    /// Fetch a fresh snapshot and publish it to subscribers.
    ///
    /// Returns `None` when a refresh started later has already superseded
    /// this one; its result is discarded.
    pub async fn refresh(&self) -> Result<Option<Arc<DashboardSnapshot>>, CoreError> {
        let ticket = self.inner.guard.begin();
        self.invalidate();
        let snapshot = Arc::new(self.snapshot().await?);

        let published = self
            .inner
            .guard
            .commit(ticket, Arc::clone(&snapshot), |s| {
                self.inner.snapshot.send_replace(s);
            });
        if !published {
            debug!("refresh superseded, result dropped");
            return Ok(None);
        }

        info!(
            stations = snapshot.stations.len(),
            access_points = snapshot.access_points.len(),
            services = snapshot.services.len(),
            sites = snapshot.sites.len(),
            failures = snapshot.failures.len(),
            "refresh complete"
        );
        Ok(Some(snapshot))
    }

    /// Latest published snapshot; starts out empty.
    pub fn subscribe(&self) -> watch::Receiver<Arc<DashboardSnapshot>> {
        self.inner.snapshot.subscribe()
    }

    /// Refresh every `period` until `cancel` fires. A zero period spawns
    /// nothing.
    pub fn spawn_auto_refresh(
        &self,
        period: Duration,
        cancel: CancellationToken,
    ) -> Option<JoinHandle<()>> {
        if period.is_zero() {
            return None;
        }
        let dashboard = self.clone();
        Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await;

            loop {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    _ = interval.tick() => {
                        if let Err(e) = dashboard.refresh().await {
                            warn!(error = %e, "periodic refresh failed");
                        }
                    }
                }
            }
            debug!("auto refresh stopped");
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn ap() -> AccessPoint {
        normalize_access_point(&json!({
            "serialNumber": "AP1",
            "apName": "lobby",
            "status": "InService",
            "radios": [
                { "radioIndex": 1, "channel": 36, "txMaxPower": 17 },
                { "radioIndex": 2, "channel": "auto" },
            ],
        }))
    }

    #[test]
    fn set_radio_edits_only_given_fields() {
        let mut ap = ap();
        Dashboard::set_radio(
            &mut ap,
            1,
            RadioUpdate {
                req_channel: Some(ReqChannel::Auto),
                admin_state: Some(false),
                ..RadioUpdate::default()
            },
        )
        .unwrap();

        let radio = ap.radio(1).unwrap();
        assert_eq!(radio.req_channel, Some(ReqChannel::Auto));
        assert_eq!(radio.admin_state, Some(false));
        assert_eq!(radio.tx_max_power, Some(17));
    }

    #[test]
    fn set_radio_rejects_unknown_index_and_channel_zero() {
        let mut ap = ap();
        let missing = Dashboard::set_radio(&mut ap, 9, RadioUpdate::default()).unwrap_err();
        assert!(matches!(missing, CoreError::NotFound { entity_type: "radio", .. }));

        let zero = RadioUpdate {
            req_channel: Some(ReqChannel::Channel(0)),
            ..RadioUpdate::default()
        };
        let err = Dashboard::set_radio(&mut ap, 2, zero).unwrap_err();
        assert_eq!(err.class(), ErrorClass::Validation);
    }

    #[test]
    fn settle_records_failures_and_empties_collection() {
        let mut failures = Vec::new();
        let kept = settle::<u8>("sites", Ok(vec![1, 2]), &mut failures);
        let lost = settle::<u8>(
            "roles",
            Err(CoreError::Timeout { timeout_secs: 5 }),
            &mut failures,
        );
        assert_eq!(kept, vec![1, 2]);
        assert!(lost.is_empty());
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].collection, "roles");
        assert_eq!(failures[0].class, "network");
    }

    #[test]
    fn derived_summary_counts_status_and_band() {
        let offline =
            normalize_access_point(&json!({ "serialNumber": "AP2", "status": "Critical" }));
        let snapshot = DashboardSnapshot {
            access_points: vec![ap(), offline],
            stations: vec![
                normalize_station(&json!({ "macAddress": "a", "band": "5 GHz" })),
                normalize_station(&json!({ "macAddress": "b", "band": "5 GHz" })),
                normalize_station(&json!({ "macAddress": "c" })),
            ],
            ..DashboardSnapshot::default()
        };

        let summary = DerivedSummary::from_snapshot(&snapshot);
        assert_eq!(summary.access_points, 2);
        assert_eq!(summary.access_points_online, 1);
        assert_eq!(summary.access_points_by_status.get("Critical"), Some(&1));
        assert_eq!(summary.clients, 3);
        assert_eq!(summary.clients_by_band.get("5 GHz"), Some(&2));
        assert_eq!(summary.clients_by_band.get("unknown"), Some(&1));
    }

    #[test]
    fn station_matches_access_point_by_serial_then_name() {
        let aps = vec![ap()];
        let by_serial = normalize_station(&json!({ "apSerial": "AP1" }));
        let by_name = normalize_station(&json!({ "apName": "lobby" }));
        let neither = normalize_station(&json!({ "apName": "attic" }));

        assert!(Dashboard::station_access_point(&by_serial, &aps).is_some());
        assert!(Dashboard::station_access_point(&by_name, &aps).is_some());
        assert!(Dashboard::station_access_point(&neither, &aps).is_none());
    }
}
