use crate::components::{
    CalDavClient, FileSnapshotStore, RedisSnapshotStore, SnapshotStore, TelegramNotifier,
};
use crate::config::Config;
use crate::error::{other_error, BotResult, Error};
use crate::runner::{DigestRunner, RunOutcome};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the run configuration
pub fn load_config() -> miette::Result<Arc<Config>> {
    match Config::load() {
        Ok(config) => {
            info!("Loaded configuration: {:?}", config);
            Ok(Arc::new(config))
        }
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Pick the snapshot backend: Redis when a URL is set, the JSON file otherwise
pub fn snapshot_store(config: &Config) -> BotResult<Arc<dyn SnapshotStore>> {
    match &config.snapshot_redis_url {
        Some(url) => {
            info!("Using Redis snapshot store");
            Ok(Arc::new(RedisSnapshotStore::new(url)?))
        }
        None => {
            info!("Using snapshot file {}", config.snapshot_path.display());
            Ok(Arc::new(FileSnapshotStore::new(config.snapshot_path.clone())))
        }
    }
}

/// Wire the real collaborators into a runner
pub fn build_runner(config: Arc<Config>) -> BotResult<DigestRunner> {
    let source = Arc::new(CalDavClient::from_config(&config));
    let notifier = Arc::new(TelegramNotifier::from_config(&config));
    let store = snapshot_store(&config)?;
    Ok(DigestRunner::new(config, source, notifier, store))
}

/// Execute a single run; any failure, panics included, ends in an error
pub async fn run_once(config: Arc<Config>) -> miette::Result<()> {
    let runner = build_runner(config)?;

    // Run in its own task so a panic surfaces as a JoinError instead of unwinding main
    let run_handle = tokio::spawn(async move { runner.run().await });

    match run_handle.await {
        Ok(Ok(RunOutcome::NoChanges)) => {
            info!("Run finished without changes");
            Ok(())
        }
        Ok(Ok(RunOutcome::Delivered(summary))) => {
            info!("Run finished, digest delivered: {:?}", summary);
            Ok(())
        }
        Ok(Err(e)) => {
            error!("Run failed: {:?}", e);
            Err(e.into())
        }
        Err(e) => {
            error!("Run task error: {:?}", e);
            Err(other_error(&format!("Run task error: {}", e)).into())
        }
    }
}
