use clap::Parser;
use jepx_spot::cli::{Cli, Commands};
use jepx_spot::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config).or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
        eprintln!("Using default configuration");
        Config::from_toml(include_str!("../config.toml.example"))
    })?;

    // Initialize telemetry, the exporter only runs next to the long-lived API
    let with_metrics = matches!(cli.command, Commands::Serve(_));
    jepx_spot::telemetry::init_telemetry(&config.telemetry, with_metrics)?;

    match cli.command {
        Commands::Serve(args) => {
            tracing::info!("Starting price API");
            args.execute(&config).await?;
        }
        Commands::Ingest(args) => {
            tracing::info!("Starting ingestion");
            args.execute(&config).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!("  Server: {}", config.server.bind_addr);
            println!("  Feed: {}", config.feed.base_url);
            println!(
                "  Store: {:?} project={} bucket={}",
                config.store.backend, config.store.project_id, config.store.bucket
            );
            println!(
                "  Telemetry: level={} format={:?}",
                config.telemetry.log_level, config.telemetry.log_format
            );
            println!("  Market UTC offset: {}h", config.schedule.utc_offset_hours);
        }
    }

    Ok(())
}
