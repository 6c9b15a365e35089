use std::error::Error;

use minesweeper_server::{build_rocket, config::ServerConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[rocket::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    info!("🚀 Starting Minesweeper server");

    let config = ServerConfig::from_env();
    info!("Loaded configuration: {:?}", config);

    let rocket = build_rocket(config)?;
    info!("📡 Endpoints: POST /create, GET /games/<id>, POST /open, POST /flag, GET /ws");

    rocket.launch().await?;
    Ok(())
}
