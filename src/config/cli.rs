use chrono::{DateTime, Utc};
use clap::Parser;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "onthisday")]
#[command(about = "Post today's historical events from a calendar file to Bluesky")]
pub struct CliConfig {
    /// Calendar file (header line, then `MM-DD,description[,year]` rows)
    #[arg(long)]
    pub calendar: Option<String>,

    /// IANA timezone used to decide what "today" is
    #[arg(long)]
    pub timezone: Option<String>,

    /// Reference instant (RFC 3339) instead of the current time
    #[arg(long, value_parser = parse_instant)]
    pub at: Option<DateTime<Utc>>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Bluesky service URL
    #[arg(long)]
    pub service: Option<String>,

    /// Print posts instead of publishing them
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

pub fn parse_instant(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp such as 2024-02-29T12:00:00Z: {}", e))
}
