//! CLI argument definitions for curio.

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Explore public art collections from the terminal.
///
/// Searches run against the Art Institute of Chicago public API by default;
/// `--source fixture` switches to the offline catalog for demos and tests.
#[derive(Debug, Parser)]
#[command(name = "curio", version, about = "Rate-limited art collection explorer")]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings and errors as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// Collection source to query.
    #[arg(long, global = true, env = "CURIO_SOURCE", default_value = "artic")]
    pub source: String,

    /// Per-call timeout budget in milliseconds.
    #[arg(long, global = true, env = "CURIO_TIMEOUT_MS", default_value_t = 5_000)]
    pub timeout_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search the collection and hydrate the matching artworks.
    Search(SearchArgs),
    /// Show the full record for one artwork.
    Artwork(ArtworkArgs),
    /// List collection sources and their capabilities.
    Sources,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Full-text search query.
    pub text: String,

    /// 1-based result page.
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Results per page.
    #[arg(long, default_value_t = 12)]
    pub limit: usize,
}

#[derive(Debug, Args)]
pub struct ArtworkArgs {
    /// Artwork identifier as issued by the collection.
    pub id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
