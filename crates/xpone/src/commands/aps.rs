//! Access point command handlers.

use tabled::Tabled;
use xpone_core::{AccessPoint, ColumnDef, Dashboard};

use crate::cli::{ApsArgs, ApsCommand, GlobalOpts, TableName};
use crate::error::CliError;
use crate::output::{self, cell, detail_lines};

use super::{columns, util};

// ── Table row ───────────────────────────────────────────────────────

/// Same order as the `AccessPointRow` fields.
pub const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("name", "Name"),
    ColumnDef::new("serial", "Serial"),
    ColumnDef::new("model", "Model"),
    ColumnDef::new("ip", "IP"),
    ColumnDef::new("site", "Site"),
    ColumnDef::new("status", "Status").unpinnable(),
    ColumnDef::new("clients", "Clients"),
];

#[derive(Tabled)]
struct AccessPointRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Serial")]
    serial: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Site")]
    site: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Clients")]
    clients: String,
}

impl AccessPointRow {
    fn new(ap: &AccessPoint, color: bool) -> Self {
        let status = ap.status.as_deref().unwrap_or("unknown");
        Self {
            name: cell(ap.display_name.as_deref()),
            serial: cell(ap.serial_number.as_deref()),
            model: cell(ap.hardware_type.as_deref()),
            ip: cell(ap.ip_address.as_deref()),
            site: cell(ap.site_name.as_deref().or(ap.site_id.as_deref())),
            status: output::paint_status(status, ap.is_online(), color),
            clients: cell(ap.client_count),
        }
    }
}

fn format_uptime(secs: i64) -> String {
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else {
        format!("{hours}h {minutes}m")
    }
}

fn detail(ap: &AccessPoint, color: bool) -> String {
    let status = ap.status.as_deref().unwrap_or("unknown");
    let mut out = detail_lines(&[
        ("Name", cell(ap.display_name.as_deref())),
        ("Serial", cell(ap.serial_number.as_deref())),
        ("Model", cell(ap.hardware_type.as_deref())),
        ("Firmware", cell(ap.software_version.as_deref())),
        ("IP", cell(ap.ip_address.as_deref())),
        ("MAC", cell(ap.mac_address.as_deref())),
        ("Site", cell(ap.site_name.as_deref().or(ap.site_id.as_deref()))),
        ("Location", cell(ap.location.as_deref())),
        ("Status", output::paint_status(status, ap.is_online(), color)),
        ("Clients", cell(ap.client_count)),
        ("Uptime", ap.uptime.map_or_else(|| "-".into(), format_uptime)),
    ]);

    for radio in &ap.radios {
        let title = match (radio.radio_index, radio.radio_name.as_deref()) {
            (Some(i), Some(name)) => format!("Radio {i} ({name})"),
            (Some(i), None) => format!("Radio {i}"),
            (None, name) => format!("Radio {}", name.unwrap_or("?")),
        };
        out.push_str("\n\n");
        out.push_str(&output::heading(&title, color));
        out.push('\n');
        out.push_str(&detail_lines(&[
            (
                "  Enabled",
                cell(radio.admin_state.map(|on| if on { "yes" } else { "no" })),
            ),
            ("  Mode", cell(radio.mode.as_deref())),
            ("  Channel", cell(radio.req_channel)),
            ("  Width", cell(radio.channel_width.as_deref())),
            ("  Smart RF", cell(radio.use_smart_rf)),
            (
                "  Max power",
                radio
                    .tx_max_power
                    .map_or_else(|| "-".into(), |p| format!("{p} dBm")),
            ),
        ]));
    }
    out
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    dashboard: &Dashboard,
    args: ApsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    match args.command {
        ApsCommand::List(list) => {
            let aps = util::filter_and_limit(dashboard.access_points().await?, &list);
            let view = columns::table_state(TableName::Aps)?;
            let out = output::render_list_in_view(
                &global.output,
                &aps,
                |ap| AccessPointRow::new(ap, color),
                |ap| ap.serial_number.clone().unwrap_or_default(),
                COLUMNS,
                &view,
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
        ApsCommand::Get { serial } => {
            let ap = dashboard.access_point(&serial).await?;
            let out = output::render_single(
                &global.output,
                &ap,
                |ap| detail(ap, color),
                |ap| ap.serial_number.clone().unwrap_or_default(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use xpone_core::{Radio, ReqChannel};

    use super::*;

    #[test]
    fn uptime_is_compact() {
        assert_eq!(format_uptime(90_061), "1d 1h 1m");
        assert_eq!(format_uptime(3_660), "1h 1m");
    }

    #[test]
    fn detail_lists_each_radio() {
        let ap = AccessPoint {
            serial_number: Some("AP-1".into()),
            radios: vec![Radio {
                radio_index: Some(2),
                radio_name: Some("radio2".into()),
                req_channel: Some(ReqChannel::Channel(36)),
                ..Radio::default()
            }],
            ..AccessPoint::default()
        };
        let text = detail(&ap, false);
        assert!(text.contains("Radio 2 (radio2)"));
        assert!(text.contains("Channel    36"));
        assert!(text.contains("Status"));
    }
}
