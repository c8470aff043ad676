use clap::Parser;
use saferoute_server::{ReviewServer, ServerArgs, ServerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from(ServerArgs::parse());
    let server = ReviewServer::start(config).await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    server.shutdown().await;

    Ok(())
}
