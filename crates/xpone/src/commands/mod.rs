//! Command dispatch: bridges CLI args -> `Dashboard` calls -> output formatting.

pub mod aps;
pub mod codes;
pub mod columns;
pub mod config_cmd;
pub mod roles;
pub mod services;
pub mod sites;
pub mod stations;
pub mod summary;
pub mod util;

use xpone_core::Dashboard;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a controller-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    dashboard: &Dashboard,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Stations(args) => stations::handle(dashboard, args, global).await,
        Command::Aps(args) => aps::handle(dashboard, args, global).await,
        Command::Services(args) => services::handle(dashboard, args, global).await,
        Command::Sites(args) => sites::handle(dashboard, args, global).await,
        Command::Roles(args) => roles::handle(dashboard, args, global).await,
        Command::Summary => summary::handle(dashboard, global).await,
        // Local commands never reach a controller.
        Command::Codes(args) => codes::handle(&args, global),
        Command::Columns(args) => columns::handle(&args, global),
        Command::Config(args) => config_cmd::handle(&args, global),
        Command::Completions(_) => Ok(()),
    }
}
