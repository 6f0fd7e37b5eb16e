//! leserve binary entry point

use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = leserve::config::ServerConfig::from_env();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("LeServe - LeParcours HTTP Server");
    info!("  Host: {}", config.host);
    info!("  Port: {}", config.port);
    if let Some(db_path) = &config.db_path {
        info!("  DB Path: {}", db_path);
    }

    let server = leserve::LeServeServer::new(config)?;
    info!("Server starting on: {}", server.server_url());

    server.start().await?;

    Ok(())
}
