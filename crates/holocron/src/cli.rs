//! Clap derive structures for the `holocron` CLI.
//!
//! Only depends on clap and clap_complete so `build.rs` can include it for
//! man page generation.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// holocron -- browse the Star Wars character archive
#[derive(Debug, Parser)]
#[command(
    name = "holocron",
    version,
    about = "Browse the Star Wars character archive from the command line",
    long_about = "Browse the Star Wars character archive: page, sort and search the\n\
        character records served by swapi.tech.\n\n\
        Sorting is forwarded to the archive and then re-applied locally, so\n\
        numeric fields such as height and birth_year order correctly even\n\
        when the archive ignores the request.",
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
    /// Archive API root (overrides config)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Records per page when a command does not say
    #[arg(long, global = true, value_name = "N")]
    pub page_size: Option<u32>,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Extra attempts for transient failures
    #[arg(long, global = true, value_name = "N")]
    pub retries: Option<u32>,

    /// Output format (defaults to the configured one, then table)
    #[arg(long, short = 'o', global = true)]
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
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one name per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    #[default]
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortOrder {
    /// Ascending
    #[default]
    Asc,
    /// Descending
    Desc,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List one page of characters
    #[command(alias = "ls")]
    List(ListArgs),

    /// Search characters by name
    #[command(alias = "find")]
    Search(SearchArgs),

    /// Show a single character by archive id
    Get(GetArgs),

    /// Page through the archive interactively
    Browse(BrowseArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Paging Arguments ──────────────────────────────────────────

/// Paging and sort arguments shared by the listing commands.
#[derive(Debug, Clone, Args)]
pub struct PagingArgs {
    /// Page number (1-based)
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Records per page (overrides --page-size)
    #[arg(long, short = 'l')]
    pub limit: Option<u32>,

    /// Field to sort by (name, height, mass, birth_year, ...)
    #[arg(long, short = 's', value_name = "FIELD")]
    pub sort: Option<String>,

    /// Sort direction
    #[arg(long, value_enum, default_value = "asc")]
    pub order: SortOrder,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub paging: PagingArgs,

    /// Only records whose name contains this text
    #[arg(long)]
    pub search: Option<String>,

    /// Render each record as a card instead of a table row
    #[arg(long)]
    pub cards: bool,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Text to look for in character names
    pub term: String,

    #[command(flatten)]
    pub paging: PagingArgs,

    /// Render each record as a card instead of a table row
    #[arg(long)]
    pub cards: bool,
}

#[derive(Debug, Args)]
pub struct GetArgs {
    /// Archive id (e.g. 1 for Luke Skywalker)
    pub id: String,
}

#[derive(Debug, Args)]
pub struct BrowseArgs {
    #[command(flatten)]
    pub paging: PagingArgs,

    /// Start with this name filter
    #[arg(long)]
    pub search: Option<String>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Print the config file path
    Path,

    /// Write a config file interactively
    Init,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
