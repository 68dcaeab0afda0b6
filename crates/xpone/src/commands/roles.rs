//! Role command handlers. Roles are passthrough records, so the table
//! shows only what every firmware release reports.

use tabled::Tabled;
use xpone_core::{Dashboard, Role};

use crate::cli::{GlobalOpts, RolesArgs, RolesCommand};
use crate::error::CliError;
use crate::output::{self, cell};

use super::util;

#[derive(Tabled)]
struct RoleRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Fields")]
    fields: usize,
}

impl From<&Role> for RoleRow {
    fn from(r: &Role) -> Self {
        Self {
            id: cell(r.id()),
            name: cell(r.name()),
            fields: r.0.len(),
        }
    }
}

pub async fn handle(
    dashboard: &Dashboard,
    args: RolesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        RolesCommand::List(list) => {
            let roles = util::filter_and_limit(dashboard.roles().await?, &list);
            let out = output::render_list(
                &global.output,
                &roles,
                |r| RoleRow::from(r),
                |r| r.id().unwrap_or_default().to_owned(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
