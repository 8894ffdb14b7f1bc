use anyhow::Result;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

mod config;
mod db;
mod discord;
mod error;
mod realm;
mod status;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv::dotenv();
    let _log_guard = init_tracing();

    let config = config::Config::from_env()?;
    let pool = db::connect(&config)?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut client = discord::create_client(config, pool, shutdown_rx).await?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("shutdown signal received");
        let _ = shutdown_tx.send(true);
        shard_manager.shutdown_all().await;
    });

    client.start().await?;
    Ok(())
}

fn init_tracing() -> tracing_appender::non_blocking::WorkerGuard {
    let filter =
        || EnvFilter::try_from_default_env().unwrap_or_else(|_| "realm_monitor=info".into());
    let file_appender = tracing_appender::rolling::daily("logs", "realm-monitor.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_filter(filter()),
        )
        .with(fmt::layer().with_filter(filter()))
        .init();
    guard
}
