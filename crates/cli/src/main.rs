use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;

use pairscope_analytics::{AnalysisRequest, PairsAnalyst, Resampler};
use pairscope_core::{AppConfig, ConfigLoader, Timeframe};
use pairscope_data::{DatabaseClient, TickRepository};
use pairscope_ingest::IngestManager;
use pairscope_web_api::{ApiServer, ApiState};

#[derive(Parser)]
#[command(name = "pairscope")]
#[command(about = "Live pairs-trading analytics over exchange trade streams", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run trade-stream ingestion and the web API together
    Run {
        /// Config file path
        #[arg(short, long, default_value = "config/Config.toml")]
        config: String,
    },
    /// Run trade-stream ingestion only
    Ingest {
        /// Config file path
        #[arg(short, long, default_value = "config/Config.toml")]
        config: String,
    },
    /// Start the web API server only (expects ingestion running elsewhere)
    Server {
        /// Config file path
        #[arg(short, long, default_value = "config/Config.toml")]
        config: String,
        /// Listen address override (e.g. 0.0.0.0:8000)
        #[arg(short, long)]
        addr: Option<String>,
    },
    /// Run one pair analysis and print the result as JSON
    Analyze {
        /// Config file path
        #[arg(short, long, default_value = "config/Config.toml")]
        config: String,
        /// Dependent symbol (Y) of the hedge regression
        #[arg(long, default_value = "BTCUSDT")]
        symbol_y: String,
        /// Independent symbol (X)
        #[arg(long, default_value = "ETHUSDT")]
        symbol_x: String,
        /// Bar interval (1s, 1m, 5m, 15m, 30m, 1h, 4h, 1d)
        #[arg(short, long)]
        timeframe: Option<String>,
        /// Rolling window size
        #[arg(short, long)]
        window: Option<usize>,
        /// Minutes of history to analyze
        #[arg(short, long)]
        lookback_minutes: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match cli.command {
        Commands::Run { config } => {
            run_pipeline(&config, true).await?;
        }
        Commands::Ingest { config } => {
            run_pipeline(&config, false).await?;
        }
        Commands::Server { config, addr } => {
            run_server(&config, addr.as_deref()).await?;
        }
        Commands::Analyze {
            config,
            symbol_y,
            symbol_x,
            timeframe,
            window,
            lookback_minutes,
        } => {
            run_analyze(
                &config,
                &symbol_y,
                &symbol_x,
                timeframe.as_deref(),
                window,
                lookback_minutes,
            )
            .await?;
        }
    }

    Ok(())
}

/// Runs collectors for every configured symbol, optionally alongside the
/// web API, until SIGINT/SIGTERM.
async fn run_pipeline(config_path: &str, serve_api: bool) -> anyhow::Result<()> {
    let config = ConfigLoader::load_from(config_path)?;

    if config.ingest.symbols.is_empty() {
        anyhow::bail!("No symbols configured; nothing to ingest");
    }

    let ticks = connect_repository(&config).await?;

    let mut manager = IngestManager::new(
        Arc::new(ticks.clone()),
        config.ingest.ws_base_url.clone(),
        Duration::from_secs(config.ingest.shutdown_grace_secs),
    );
    manager.spawn_all(&config.ingest.symbols);
    tracing::info!(
        "Ingesting {} symbol(s): {:?}",
        manager.collector_count(),
        config.ingest.symbols
    );

    let server_handle = if serve_api {
        let server = ApiServer::new(api_state(&config, ticks));
        let addr = format!("{}:{}", config.server.host, config.server.port);
        Some(tokio::spawn(async move {
            if let Err(e) = server.serve(&addr).await {
                tracing::error!("Server error: {}", e);
            }
        }))
    } else {
        None
    };

    shutdown_signal().await;

    // Collectors stop first so nothing writes while the pool drains.
    tracing::info!("Stopping collectors...");
    if let Err(e) = manager.shutdown_all().await {
        tracing::error!("Error during collector shutdown: {}", e);
    }

    if let Some(handle) = server_handle {
        handle.abort();
    }

    tracing::info!("pairscope stopped");
    Ok(())
}

async fn run_server(config_path: &str, addr_override: Option<&str>) -> anyhow::Result<()> {
    let config = ConfigLoader::load_from(config_path)?;
    let ticks = connect_repository(&config).await?;

    let addr = match addr_override {
        Some(addr) => addr.to_string(),
        None => format!("{}:{}", config.server.host, config.server.port),
    };

    let server = ApiServer::new(api_state(&config, ticks));
    server.serve(&addr).await?;

    Ok(())
}

async fn run_analyze(
    config_path: &str,
    symbol_y: &str,
    symbol_x: &str,
    timeframe: Option<&str>,
    window: Option<usize>,
    lookback_minutes: Option<i64>,
) -> anyhow::Result<()> {
    let config = ConfigLoader::load_from(config_path)?;
    let ticks = connect_repository(&config).await?;

    let timeframe = timeframe
        .unwrap_or(&config.analytics.default_timeframe)
        .parse::<Timeframe>()?;

    let request = AnalysisRequest {
        symbol_y: symbol_y.to_string(),
        symbol_x: symbol_x.to_string(),
        timeframe,
        rolling_window: window.unwrap_or(config.analytics.default_rolling_window),
        lookback_minutes: lookback_minutes.unwrap_or(config.analytics.default_lookback_minutes),
    };

    let analyst = PairsAnalyst::new(Resampler::new(ticks));
    let analysis = analyst.analyze(&request).await?;

    println!("{}", serde_json::to_string_pretty(&analysis)?);

    Ok(())
}

/// Connects the pool and makes sure the schema exists; a dead database is
/// a fatal startup error for every subcommand.
async fn connect_repository(config: &AppConfig) -> anyhow::Result<TickRepository> {
    let database =
        DatabaseClient::new(&config.database.url, config.database.max_connections).await?;
    let ticks = TickRepository::new(database.pool().clone());
    ticks.ensure_schema().await?;
    Ok(ticks)
}

fn api_state(config: &AppConfig, ticks: TickRepository) -> ApiState {
    ApiState {
        analyst: PairsAnalyst::new(Resampler::new(ticks)),
        symbols: config.ingest.symbols.clone(),
        analytics: config.analytics.clone(),
        live_stats: config.live_stats.clone(),
    }
}

async fn shutdown_signal() {
    let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        .expect("Failed to create SIGTERM handler");

    let mut sigint = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())
        .expect("Failed to create SIGINT handler");

    tokio::select! {
        _ = sigterm.recv() => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
        _ = sigint.recv() => {
            tracing::info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
        }
    }
}
