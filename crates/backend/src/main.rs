use anyhow::Context;
use dotenvy::dotenv;
use tracing::debug;

use backend::{BackendConfig, BackendServer, BackendState};
use common::logger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    logger::setup_logger();
    debug!("Backend starting up...");

    let config = BackendConfig::from_env().context("Invalid backend configuration")?;
    let state = BackendState::with_seed(config.seed)?;

    BackendServer::new(state, config).run().await
}
