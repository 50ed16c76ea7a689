use clap::Parser;
use foliowatch::cli::{Cli, Commands};
use foliowatch::config::Config;
use foliowatch::portfolio::TradeSide;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
        eprintln!("Using default configuration");
        Config::default()
    });

    // Initialize telemetry
    let _guard = foliowatch::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Watch(args) => {
            tracing::info!("Starting live price watch");
            args.execute(&config).await?;
        }
        Commands::Portfolio(args) => {
            args.execute(&config).await?;
        }
        Commands::Buy(args) => {
            args.execute(TradeSide::Buy, &config).await?;
        }
        Commands::Sell(args) => {
            args.execute(TradeSide::Sell, &config).await?;
        }
        Commands::Transactions(args) => {
            args.execute(&config).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!("  Backend: {} (user {})", config.backend.base_url, config.backend.user_id);
            println!("  Feed REST: {}", config.feed.rest_url);
            println!("  Feed stream: {}", config.feed.ws_url);
            println!("  Symbols: {}", config.feed.symbols.join(", "));
            println!(
                "  Reconnect: {} attempts, {}ms..{}ms backoff",
                config.feed.max_reconnect_attempts,
                config.feed.initial_reconnect_delay_ms,
                config.feed.max_reconnect_delay_ms
            );
        }
    }

    Ok(())
}
