use anyhow::Context;
use clap::{Parser, Subcommand};
use configuration::{LogFormat, Settings, init_tracing, load_settings};
use database::DbRepository;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// The main entry point for the route verification query service.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the environment may already be set.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut settings = load_settings(cli.config.as_deref()).context("loading configuration")?;
    if let Some(format) = cli.log_format {
        settings.log.format = format;
    }
    let _log_guard = init_tracing(&settings.log)?;

    match cli.command.unwrap_or(Commands::Serve(ServeArgs { bind: None })) {
        Commands::Serve(args) => {
            if let Some(bind) = args.bind {
                settings.server.bind = bind;
            }
            web_server::run_server(settings).await?;
        }
        Commands::Check => handle_check(settings).await?,
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Query and aggregation service over BGP route verification reports.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a toml configuration file (defaults to ./config.toml if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Overrides `log.format` from the configuration.
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP query API (the default).
    Serve(ServeArgs),
    /// Connect to the database once and report whether it answers.
    Check,
}

#[derive(Parser)]
struct ServeArgs {
    /// Address to listen on, e.g. 127.0.0.1:3000.
    #[arg(long)]
    bind: Option<SocketAddr>,
}

/// Opens a real connection and runs one round trip.
async fn handle_check(settings: Settings) -> anyhow::Result<()> {
    let pool = database::connect(&settings.database)
        .await
        .context("connecting to the database")?;
    let repo = DbRepository::new(
        pool,
        Duration::from_millis(settings.database.statement_timeout_ms),
    );
    repo.ping().await.context("pinging the database")?;
    tracing::info!("Database is reachable.");
    println!("OK");
    Ok(())
}
