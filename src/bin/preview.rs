use clap::Parser;
use onthisday::config::cli::parse_instant;
use onthisday::config::toml_config::TomlConfig;
use onthisday::core::calendar;
use onthisday::core::matcher::{match_today, resolve_timezone};
use onthisday::core::post::PostFormatter;
use onthisday::utils::logger;
use onthisday::Settings;
use rand::seq::IndexedRandom;

#[derive(Parser)]
#[command(name = "preview")]
#[command(about = "Print the posts onthisday would publish, without publishing")]
struct Args {
    /// Calendar file
    #[arg(long)]
    calendar: Option<String>,

    /// IANA timezone used to decide what "today" is
    #[arg(long)]
    timezone: Option<String>,

    /// Reference instant (RFC 3339) instead of the current time
    #[arg(long, value_parser = parse_instant)]
    at: Option<chrono::DateTime<chrono::Utc>>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Print one random event from the calendar instead of today's
    #[arg(long)]
    random: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let toml = args.config.as_ref().map(TomlConfig::from_file).transpose()?;
    let mut settings = Settings::from_env(toml);
    if let Some(calendar) = args.calendar {
        settings.calendar_path = calendar;
    }
    if let Some(timezone) = args.timezone {
        settings.timezone = timezone;
    }
    let settings = settings.for_preview()?;

    let events = calendar::load_file(&settings.calendar_path)?;
    tracing::debug!("Loaded {} events from {}", events.len(), settings.calendar_path);
    let formatter = PostFormatter::new(settings.hashtag.as_str(), settings.max_graphemes);

    if args.random {
        match events.choose(&mut rand::rng()) {
            Some(event) => println!("{}", formatter.format(event)),
            None => println!("The calendar has no events."),
        }
        return Ok(());
    }

    let tz = resolve_timezone(&settings.timezone)?;
    let today = match_today(&events, &tz, args.at);
    if today.is_empty() {
        println!("No events found for today.");
    } else {
        for event in &today {
            println!("{}", formatter.format(event));
        }
    }

    Ok(())
}
