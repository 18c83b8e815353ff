use clap::{Args, Parser, Subcommand};

pub const DEFAULT_FEED_URL: &str = "https://api.freifunk.net/data/freifunk-karte-data.json";

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Sync(SyncArgs),
    Convert(ConvertArgs),
}

#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Feed URL (must be http/https).
    #[arg(long, default_value = DEFAULT_FEED_URL)]
    pub url: String,

    /// Output file for the converted node list; the gzip copy lands at `<out>.gz`.
    #[arg(long, default_value = "nodes.json")]
    pub out: String,

    /// File holding the `If-Modified-Since` value from the previous run.
    #[arg(long, default_value = "if-modified-since.txt")]
    pub marker_file: String,

    /// HTTP timeout for the feed download.
    #[arg(long, default_value_t = 5)]
    pub timeout_secs: u64,
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Input path to a saved raw feed (same JSON shape as the live feed).
    #[arg(long)]
    pub feed: String,

    /// HTTP-date to stamp the output with, e.g. "Mon, 01 Jan 2024 00:00:00 GMT".
    #[arg(long)]
    pub last_modified: String,

    /// Output file for the converted node list; the gzip copy lands at `<out>.gz`.
    #[arg(long, default_value = "nodes.json")]
    pub out: String,
}
