//! Clap derive structures for the `zyxctl` CLI.
//!
//! Also compiled by `build.rs` for man page generation, so this module may
//! only depend on `clap` and `clap_complete`.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// zyxctl -- read traffic counters and watch clients on a Zyxel router
#[derive(Debug, Parser)]
#[command(
    name = "zyxctl",
    version,
    about = "Query a Zyxel home router from the command line",
    long_about = "Logs in to a Zyxel router's web admin UI, reads WAN traffic\n\
        counters and the connected-client list, and watches for devices\n\
        joining or leaving the network.",
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
    /// Router profile to use
    #[arg(long, short = 'p', env = "ZYXCTL_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Router address, e.g. 192.168.0.1 (overrides profile)
    #[arg(long, short = 'H', env = "ZYXCTL_HOST", global = true)]
    pub host: Option<String>,

    /// Admin username (overrides profile)
    #[arg(long, short = 'u', env = "ZYXCTL_USERNAME", global = true)]
    pub username: Option<String>,

    /// Admin password (prefer the keyring: `zyxctl config set-password`)
    #[arg(long, env = "ZYXCTL_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "ZYXCTL_OUTPUT",
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

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "ZYXCTL_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

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

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in once and report whether the router accepted the credentials
    Login,

    /// Show WAN receive/transmit byte counters
    #[command(alias = "t")]
    Traffic,

    /// List connected clients
    #[command(alias = "cl")]
    Clients(ClientsArgs),

    /// Poll the client list and print connect/disconnect events
    #[command(alias = "w")]
    Watch(WatchArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Clients ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ClientsArgs {
    /// Only show clients on this medium
    #[arg(long, short = 'c')]
    pub connection: Option<ConnectionFilter>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ConnectionFilter {
    Wired,
    Wireless,
}

// ── Watch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Poll interval in milliseconds (defaults to the profile's, 10000)
    #[arg(long, short = 'i')]
    pub interval_ms: Option<u64>,

    /// Stop after this many poll cycles instead of running until Ctrl-C
    #[arg(long, short = 'n')]
    pub cycles: Option<u32>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,

    /// Show the effective configuration (passwords redacted)
    Show,

    /// Store a profile's password in the system keyring
    SetPassword,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
