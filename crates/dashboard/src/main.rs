use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use tokio::sync::broadcast;
use tracing::{debug, info};

use common::{actors::ActorType, config::DashboardConfig, logger};
use dashboard::{
    actors::supervisor::Supervisor,
    services::{
        console_service::ConsoleService,
        display::Display,
        poller_service::{PollerCommand, PollerService, PollerSettings},
    },
};
use remote::{ApiClient, DashboardApi, services::ExecutionMode};
use simulation::{SimulationSettings, SimulationState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    logger::setup_logger();
    debug!("Dashboard starting up...");

    let config = DashboardConfig::from_env().context("Invalid dashboard configuration")?;
    info!("Trading API at {}", config.api_base_url);

    let settings = SimulationSettings {
        initial_value: config.initial_portfolio_value,
        status_drift_pct: config.status_drift_pct,
        trade_drift_pct: config.trade_drift_pct,
        ..SimulationSettings::default()
    };
    let simulation = match config.seed {
        Some(seed) => SimulationState::seeded(settings, seed)?,
        None => SimulationState::from_os_rng(settings)?,
    }
    .into_shared();

    let client = ApiClient::new(config.api_base_url.clone(), config.request_timeout)
        .context("Failed to build the HTTP client")?;
    let mode = if config.simulate_trades {
        ExecutionMode::Simulated
    } else {
        ExecutionMode::Stub
    };
    let api = DashboardApi::new(Arc::new(client), simulation, mode);

    let (display, _display_rx) = Display::new();
    let (commands_tx, _) = broadcast::channel::<PollerCommand>(64);

    let mut supervisor = Supervisor::new();

    let poller_settings = PollerSettings::from(&config);
    let display_for_poller = display.clone();
    let tx_for_poller = commands_tx.clone();
    supervisor.register_actor(
        ActorType::PollerActor,
        Box::new(move || {
            Box::new(PollerService::new(
                api.clone(),
                display_for_poller.clone(),
                tx_for_poller.subscribe(),
                poller_settings.clone(),
            ))
        }),
    );

    let tx_for_console = commands_tx.clone();
    supervisor.register_actor(
        ActorType::ConsoleActor,
        Box::new(move || {
            Box::new(ConsoleService::new(
                display.subscribe(),
                tx_for_console.clone(),
            ))
        }),
    );

    supervisor.start().await;
    info!("Dashboard stopped");
    Ok(())
}
