use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use costsim_clock::SystemClock;
use costsim_gateway::{ReplayFeed, WsFeedClient};
use costsim_ports::{HistoryStore, LogTelemetry, MarketDataSource, Telemetry};
use costsim_runner::{
    ConsoleDisplay, CostSimulator, PerformanceAnalyzer, RunnerConfig, load_config, save_config,
};
use costsim_storage::{MemoryStore, SqliteStore};
use tokio::sync::watch;

/// Real-time trade-cost simulator for level-2 order-book feeds
#[derive(Parser, Debug)]
#[command(name = "costsim", version, about, long_about = None)]
struct Cli {
    /// JSON configuration file; defaults are used when it does not exist
    #[arg(short, long, default_value = "config/costsim.json")]
    config: PathBuf,

    /// Stop after this many books
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Read newline-delimited book messages from a file instead of the live feed
    #[arg(short, long)]
    replay: Option<PathBuf>,

    /// Pause between replayed books, in milliseconds
    #[arg(long, requires = "replay")]
    replay_interval_ms: Option<u64>,

    /// Write the default configuration to this path and exit
    #[arg(long)]
    write_default_config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Some(path) = cli.write_default_config {
        save_config(&RunnerConfig::default(), &path)
            .with_context(|| format!("writing default config to {}", path.display()))?;
        log::info!("default configuration written to {}", path.display());
        return Ok(());
    }

    let config = load_config(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    let telemetry: Arc<dyn Telemetry> = Arc::new(LogTelemetry);

    let sqlite = match &config.db_path {
        Some(path) => Some(
            SqliteStore::open(path)
                .await
                .with_context(|| format!("opening history store {}", path.display()))?,
        ),
        None => None,
    };
    let store: Arc<dyn HistoryStore> = match &sqlite {
        Some(store) => Arc::new(store.clone()),
        None => Arc::new(MemoryStore::new()),
    };

    let source: Box<dyn MarketDataSource> = match &cli.replay {
        Some(path) => {
            let feed = ReplayFeed::from_file(path)
                .with_context(|| format!("reading replay file {}", path.display()))?;
            Box::new(match cli.replay_interval_ms {
                Some(ms) => feed.with_interval(Duration::from_millis(ms)),
                None => feed,
            })
        }
        None => Box::new(WsFeedClient::new(config.feed_config(), telemetry.clone())),
    };

    let mut simulator = CostSimulator::new(
        config.cost_model(),
        PerformanceAnalyzer::new(config.performance_window),
        config.pipeline_settings(cli.ticks),
        store,
        Arc::new(ConsoleDisplay),
        telemetry,
        Arc::new(SystemClock),
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("Ctrl-C received, shutting down");
            let _ = shutdown_tx.send(true);
        }
    });

    log::info!(
        "costing {} USD {:?} orders, fee tier {:?}",
        config.cost.quantity_usd,
        config.cost.side,
        config.cost.fee_tier
    );
    let reason = simulator.run(source.as_ref(), shutdown_rx).await?;

    let report = simulator.performance().report();
    log::info!(
        "stopped ({reason:?}): {} ticks, {} errors, {} feed errors, avg processing {:.3} ms",
        report.total_ticks,
        report.total_errors,
        report.feed_errors,
        report.statistics.avg_processing_time_ms
    );

    if let Some(store) = sqlite {
        store.close().await;
    }
    Ok(())
}
