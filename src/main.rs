use lichbot::startup;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting lichbot run");

    // Load configuration
    let config = startup::load_config()?;

    // Fetch, diff, notify, persist
    startup::run_once(config).await
}
