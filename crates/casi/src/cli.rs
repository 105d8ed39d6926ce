//! Clap derive structures for the `casi` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// casi -- CLI for a CASIREST car-sharing account
#[derive(Debug, Parser)]
#[command(
    name = "casi",
    version,
    about = "Query car-sharing bookings with local caching and usage stats",
    long_about = "Command-line client for a CASIREST car-sharing account.\n\n\
        Fetches booking records for a date range, caches them as local JSON\n\
        snapshots, and derives distance, hours and projected costs against\n\
        the mid-class yearly plan. Runs an interactive menu when invoked\n\
        without a subcommand.",
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    /// The interactive menu runs when no subcommand is given.
    #[command(subcommand)]
    pub command: Option<Command>,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Account profile to use
    #[arg(long, short = 'p', env = "CASI_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Booking service base URL (overrides profile)
    #[arg(long, env = "CASI_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Output format
    #[arg(long, short = 'o', env = "CASI_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds
    #[arg(long, env = "CASI_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Directory for cache snapshots
    #[arg(long, env = "CASI_CACHE_DIR", global = true)]
    pub cache_dir: Option<PathBuf>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, ValueEnum)]
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
    /// Show bookings for a range (cache-first)
    #[command(alias = "d")]
    Data(RangeArgs),

    /// Show bookings for a range, refreshed from the service
    #[command(alias = "r")]
    Refresh(RangeArgs),

    /// Show usage statistics for a range
    #[command(alias = "s")]
    Stats(RangeArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Range Arguments ───────────────────────────────────────────

/// Date-range bounds shared by all query commands. Give both bounds
/// together, or neither for the trailing 12-month window.
#[derive(Debug, Default, Args)]
pub struct RangeArgs {
    /// Range start, YYYY-MM-DD
    #[arg(long)]
    pub from: Option<String>,

    /// Range end, YYYY-MM-DD
    #[arg(long)]
    pub to: Option<String>,
}

// ── Config Command ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactively create or update the active profile
    Init,

    /// Print the resolved configuration (secrets redacted)
    Show,

    /// Store a password in the system keyring
    SetPassword {
        /// Profile to store the password for
        #[arg(long, default_value = "default")]
        profile: String,
    },

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
