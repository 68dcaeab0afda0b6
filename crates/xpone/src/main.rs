mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use xpone_core::{ClientConfig, Dashboard};

use crate::cli::{Cli, Command};
use crate::error::{CliError, exit_code};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    let code = match run(cli).await {
        Ok(()) => exit_code::SUCCESS,
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            code
        }
    };
    std::process::exit(code);
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Local commands don't need a controller connection
        Command::Config(args) => commands::config_cmd::handle(&args, &cli.global),
        Command::Codes(args) => commands::codes::handle(&args, &cli.global),
        Command::Columns(args) => commands::columns::handle(&args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "xpone", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let client_config = build_client_config(&cli.global)?;
            let dashboard = Dashboard::connect(&client_config).await?;

            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &dashboard, &cli.global).await
        }
    }
}

/// Build a `ClientConfig` from the config file, profile, and CLI overrides.
fn build_client_config(global: &cli::GlobalOpts) -> Result<ClientConfig, CliError> {
    let cfg = config::load_config_or_default();
    let client_config = config::resolve_client_config(global, &cfg)?;
    tracing::debug!(
        controller = %client_config.controller,
        login = client_config.credentials.is_some(),
        "resolved controller configuration"
    );
    Ok(client_config)
}
