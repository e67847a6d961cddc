use std::sync::Arc;

use simulation::SharedSimulation;

use crate::traits::TradingApi;

pub mod market_provider;
pub mod signal_provider;
pub mod stats_provider;
pub mod status_provider;
pub mod trade_executor;

pub use market_provider::MarketContextProvider;
pub use signal_provider::SignalProvider;
pub use stats_provider::StatsProvider;
pub use status_provider::StatusProvider;
pub use trade_executor::{ExecutionMode, TradeExecutor};

/// Every provider of one dashboard, wired to the same API and simulation.
#[derive(Clone)]
pub struct DashboardApi {
    pub status: StatusProvider,
    pub signals: SignalProvider,
    pub market: MarketContextProvider,
    pub executor: TradeExecutor,
    pub stats: StatsProvider,
    simulation: SharedSimulation,
}

impl DashboardApi {
    pub fn new(api: Arc<dyn TradingApi>, simulation: SharedSimulation, mode: ExecutionMode) -> Self {
        Self {
            status: StatusProvider::new(api.clone(), simulation.clone()),
            signals: SignalProvider::new(api.clone(), simulation.clone()),
            market: MarketContextProvider::new(api.clone(), simulation.clone()),
            executor: TradeExecutor::new(api.clone(), simulation.clone(), mode),
            stats: StatsProvider::new(api),
            simulation,
        }
    }

    pub fn simulation(&self) -> &SharedSimulation {
        &self.simulation
    }
}
