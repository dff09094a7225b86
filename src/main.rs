//! Camstation Console
//!
//! Main entry point for the operator console.

use camstation_console::console::{repl, Console};
use camstation_console::state::AppConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "camstation_console=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Camstation Console v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = AppConfig::default();
    tracing::info!(
        station_url = %config.station_url,
        start_fragment = %config.start_fragment,
        eviction_policy = ?config.eviction_policy,
        default_speed = config.default_speed,
        camera_count = config.camera_inventory.len(),
        "Configuration loaded"
    );

    let console = Console::new(config).await;
    tracing::info!("Console assembled");

    // Operator input source
    repl::spawn_stdin_source(console.sender());
    tracing::info!("Operator REPL ready (type 'quit' to exit)");

    console.run().await;

    tracing::info!("Shutdown complete");
    Ok(())
}
