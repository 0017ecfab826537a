//! rescuetime-watch
//!
//! Run with: cargo run
//!
//! Environment variables:
//! - RESCUETIME_CONFIG: Path to the settings file (default: config.json)
//! - RESCUETIME_TASKS: Path to the task list (default: tasks.json)
//! - RUST_LOG: Log level (default: rescuetime_watch=info)

use rescuetime_watch::alerts::Notifier;
use rescuetime_watch::api::ApiClient;
use rescuetime_watch::config::Config;
use rescuetime_watch::runner::run;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rescuetime_watch=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        e
    })?;

    tracing::info!("rescuetime-watch configuration:");
    tracing::info!("  API: {}", config.api_url);
    tracing::info!("  Tasks: {}", config.tasks.len());
    tracing::info!("  Explore: {}, plot: {}", config.explore, config.plot);

    let client = ApiClient::from_config(&config);
    let notifier = Notifier::new(&config.notify_icon);

    run(&config, &client, &notifier).await;

    Ok(())
}
