//! Wireless service (SSID) command handlers.

use tabled::Tabled;
use xpone_core::{Dashboard, Service};

use crate::cli::{GlobalOpts, ServicesArgs, ServicesCommand};
use crate::error::CliError;
use crate::output::{self, cell};

use super::util;

#[derive(Tabled)]
struct ServiceRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "SSID")]
    ssid: String,
    #[tabled(rename = "Security")]
    security: String,
    #[tabled(rename = "VLAN")]
    vlan: String,
    #[tabled(rename = "Hidden")]
    hidden: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
}

impl ServiceRow {
    fn new(svc: &Service, color: bool) -> Self {
        let enabled = svc.is_enabled();
        Self {
            name: cell(svc.service_name.as_deref()),
            ssid: cell(svc.ssid.as_deref()),
            security: svc.security_mode().to_string(),
            vlan: cell(svc.vlan),
            hidden: cell(svc.hidden),
            enabled: output::paint_status(if enabled { "yes" } else { "no" }, enabled, color),
        }
    }
}

pub async fn handle(
    dashboard: &Dashboard,
    args: ServicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    match args.command {
        ServicesCommand::List(list) => {
            let services = util::filter_and_limit(dashboard.services().await?, &list);
            let out = output::render_list(
                &global.output,
                &services,
                |svc| ServiceRow::new(svc, color),
                |svc| svc.id.clone().unwrap_or_default(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
