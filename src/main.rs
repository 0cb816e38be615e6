//! # TikiChat Server
//!
//! Entry point: initializes logging, loads configuration, opens the
//! configured store and serves the HTTP API.

use anyhow::Result;
use tracing::info;

use tikichat_server::config::Settings;
use tikichat_server::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    tikichat_server::telemetry::init_tracing();

    info!("Starting TikiChat server...");

    let settings = Settings::load()?;
    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        environment = %settings.environment,
        backend = ?settings.database.backend,
        "Configuration loaded"
    );

    let application = Application::build(settings).await?;

    info!("Server ready to accept connections");
    application.run_until_stopped().await?;

    Ok(())
}
