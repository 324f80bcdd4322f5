use repodoc::{api, logging, Config};
use std::path::PathBuf;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_tracing("info");

    let config_path = std::env::var("REPODOC_CONFIG").ok().map(PathBuf::from);
    let config = Config::load(config_path.as_deref())?;

    info!("repodoc server starting...");
    info!("Health check: http://{}/health", config.server.addr()?);
    info!("Report page: http://{}/report", config.server.addr()?);

    api::serve(config).await?;
    Ok(())
}
