//! Site command handlers.

use tabled::Tabled;
use xpone_core::{Dashboard, Site};

use crate::cli::{GlobalOpts, SitesArgs, SitesCommand};
use crate::error::CliError;
use crate::output::{self, cell};

use super::util;

#[derive(Tabled)]
struct SiteRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Country")]
    country: String,
    #[tabled(rename = "Time zone")]
    timezone: String,
    #[tabled(rename = "APs")]
    aps: String,
    #[tabled(rename = "Clients")]
    clients: String,
}

impl From<&Site> for SiteRow {
    fn from(s: &Site) -> Self {
        Self {
            id: cell(s.id.as_deref()),
            name: cell(s.site_name.as_deref()),
            country: cell(s.country.as_deref()),
            timezone: cell(s.timezone.as_deref()),
            aps: cell(s.ap_count),
            clients: cell(s.client_count),
        }
    }
}

pub async fn handle(
    dashboard: &Dashboard,
    args: SitesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SitesCommand::List(list) => {
            let sites = util::filter_and_limit(dashboard.sites().await?, &list);
            let out = output::render_list(
                &global.output,
                &sites,
                |s| SiteRow::from(s),
                |s| s.id.clone().unwrap_or_default(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
