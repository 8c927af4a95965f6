use clap::Parser;
use onthisday::config::toml_config::TomlConfig;
use onthisday::core::Publisher;
use onthisday::utils::{logger, validation::Validate};
use onthisday::{
    BlueskyPublisher, BotEngine, CliConfig, ConsolePublisher, DailyPipeline, LocalCalendar,
    RunSummary, Settings,
};

async fn run_with<P: Publisher>(settings: Settings, publisher: P) -> onthisday::Result<RunSummary> {
    let source = LocalCalendar::new(settings.calendar_path.clone());
    let pipeline = DailyPipeline::new(source, publisher, settings);
    BotEngine::new(pipeline).run().await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // logging
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting onthisday");

    let toml = match &cli.config {
        Some(path) => match TomlConfig::from_file(path) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => None,
    };

    let settings = Settings::from_env(toml).apply_cli(&cli);
    tracing::debug!("Settings: {:?}", settings);

    // credentials are only required when publishing
    if let Err(e) = settings.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        tracing::error!("Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    let result = if settings.dry_run {
        tracing::info!("Dry run: posts are printed, not published");
        run_with(settings, ConsolePublisher::new()).await
    } else {
        let (handle, password) = settings.credentials()?;
        let publisher = BlueskyPublisher::new(
            settings.service.clone(),
            handle,
            password,
            settings.request_timeout(),
        )?;
        run_with(settings, publisher).await
    };

    match result {
        Ok(summary) => {
            tracing::info!(
                "Done for {}: {} loaded, {} matched, {} published",
                summary.today_key,
                summary.loaded,
                summary.matched,
                summary.published
            );
            if summary.matched == 0 {
                println!("No events found for today.");
            }
        }
        Err(e) => {
            tracing::error!(
                "Run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
