//! Clap derive structures for the `xpone` CLI.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// xpone -- inspect Extreme Platform ONE wireless controllers
#[derive(Debug, Parser)]
#[command(
    name = "xpone",
    version,
    about = "Inspect Extreme Platform ONE wireless networks from the command line",
    long_about = "Query access points, clients, services and sites on an Extreme\n\
        Platform ONE controller. Field names are normalized across firmware\n\
        releases, so output looks the same whichever API version answers.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Controller profile to use
    #[arg(long, short = 'p', env = "XPONE_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Controller URL (overrides profile)
    #[arg(long, short = 'c', env = "XPONE_CONTROLLER", global = true)]
    pub controller: Option<String>,

    /// Login user (overrides profile)
    #[arg(long, short = 'u', env = "XPONE_USERNAME", global = true)]
    pub username: Option<String>,

    /// Where the management API is mounted
    #[arg(long, env = "XPONE_API_BASE", global = true)]
    pub api_base: Option<ApiBaseArg>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "XPONE_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "XPONE_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "XPONE_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Shared enums ─────────────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ApiBaseArg {
    /// `/management`, for controllers reached directly
    Direct,
    /// `/api/management`, behind the reverse proxy
    Proxied,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Wireless clients
    #[command(alias = "clients", alias = "st")]
    Stations(StationsArgs),

    /// Access points
    #[command(alias = "ap")]
    Aps(ApsArgs),

    /// Wireless services (SSIDs)
    #[command(alias = "svc", alias = "ssids")]
    Services(ServicesArgs),

    /// Sites
    Sites(SitesArgs),

    /// Access-control roles
    Roles(RolesArgs),

    /// Controller dashboard summary
    Summary,

    /// Choose and arrange the columns of list tables
    Columns(ColumnsArgs),

    /// Look up IEEE 802.11 reason and status codes
    Codes(CodesArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared List Arguments ────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Keep rows where any text field contains this (case-insensitive)
    #[arg(long, short = 'f')]
    pub filter: Option<String>,

    /// Show at most this many rows
    #[arg(long, short = 'l')]
    pub limit: Option<usize>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  RESOURCES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct StationsArgs {
    #[command(subcommand)]
    pub command: StationsCommand,
}

#[derive(Debug, Subcommand)]
pub enum StationsCommand {
    /// List associated clients
    #[command(alias = "ls")]
    List(ListArgs),
}

#[derive(Debug, Args)]
pub struct ApsArgs {
    #[command(subcommand)]
    pub command: ApsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ApsCommand {
    /// List access points
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one access point with its radios
    Get {
        /// Serial number
        serial: String,
    },
}

#[derive(Debug, Args)]
pub struct ServicesArgs {
    #[command(subcommand)]
    pub command: ServicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ServicesCommand {
    /// List wireless services
    #[command(alias = "ls")]
    List(ListArgs),
}

#[derive(Debug, Args)]
pub struct SitesArgs {
    #[command(subcommand)]
    pub command: SitesCommand,
}

#[derive(Debug, Subcommand)]
pub enum SitesCommand {
    /// List sites
    #[command(alias = "ls")]
    List(ListArgs),
}

#[derive(Debug, Args)]
pub struct RolesArgs {
    #[command(subcommand)]
    pub command: RolesCommand,
}

#[derive(Debug, Subcommand)]
pub enum RolesCommand {
    /// List roles
    #[command(alias = "ls")]
    List(ListArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CODES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CodesArgs {
    #[command(subcommand)]
    pub command: CodesCommand,
}

#[derive(Debug, Subcommand)]
pub enum CodesCommand {
    /// Describe a deauthentication/disassociation reason code
    Reason {
        /// Reason code
        code: u16,
    },

    /// Describe an association/authentication status code
    Status {
        /// Status code
        code: u16,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COLUMNS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// List tables whose layout can be customized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TableName {
    Stations,
    Aps,
}

#[derive(Debug, Args)]
pub struct ColumnsArgs {
    /// Table to customize
    #[arg(value_enum)]
    pub table: TableName,

    #[command(subcommand)]
    pub command: Option<ColumnsCommand>,
}

#[derive(Debug, Subcommand)]
pub enum ColumnsCommand {
    /// Show the current layout (default)
    Show,

    /// Show a hidden column or hide a visible one
    Toggle {
        /// Column id, e.g. `bytes`
        column: String,
    },

    /// Move a column to a zero-based position
    Move {
        /// Column id
        column: String,
        /// Target position; past the end moves it last
        position: usize,
    },

    /// Keep a column at the left edge
    Pin {
        /// Column id
        column: String,
    },

    /// Release a pinned column
    Unpin {
        /// Column id
        column: String,
    },

    /// Restore the default layout
    Reset,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
