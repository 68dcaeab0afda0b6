//! Station (wireless client) command handlers.

use tabled::Tabled;
use xpone_core::{ColumnDef, Dashboard, Station};

use crate::cli::{GlobalOpts, StationsArgs, StationsCommand, TableName};
use crate::error::CliError;
use crate::output::{self, cell};

use super::{columns, util};

// ── Table row ───────────────────────────────────────────────────────

/// Same order as the `StationRow` fields.
pub const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("client", "Client"),
    ColumnDef::new("mac", "MAC"),
    ColumnDef::new("ip", "IP"),
    ColumnDef::new("ap", "AP"),
    ColumnDef::new("ssid", "SSID"),
    ColumnDef::new("band", "Band"),
    ColumnDef::new("rss", "RSS"),
    ColumnDef::new("bytes", "Bytes").hidden(),
];

#[derive(Tabled)]
struct StationRow {
    #[tabled(rename = "Client")]
    label: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "AP")]
    ap: String,
    #[tabled(rename = "SSID")]
    ssid: String,
    #[tabled(rename = "Band")]
    band: String,
    #[tabled(rename = "RSS")]
    rss: String,
    #[tabled(rename = "Bytes")]
    bytes: String,
}

impl From<&Station> for StationRow {
    fn from(s: &Station) -> Self {
        Self {
            label: s.label().to_owned(),
            mac: cell(s.mac_address.as_deref()),
            ip: cell(s.ip_address.as_deref()),
            ap: cell(s.ap_name.as_deref().or(s.ap_serial.as_deref())),
            ssid: cell(s.ssid.as_deref().or(s.service_name.as_deref())),
            band: cell(s.band.as_deref()),
            rss: s.rss.map_or_else(|| "-".into(), |r| format!("{r} dBm")),
            bytes: cell(s.total_bytes()),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    dashboard: &Dashboard,
    args: StationsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        StationsCommand::List(list) => {
            let stations = util::filter_and_limit(dashboard.stations().await?, &list);
            let view = columns::table_state(TableName::Stations)?;
            let out = output::render_list_in_view(
                &global.output,
                &stations,
                |s| StationRow::from(s),
                |s| s.mac_address.clone().unwrap_or_default(),
                COLUMNS,
                &view,
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
