use std::sync::Arc;

use common::models::MarketContext;
use simulation::SharedSimulation;
use tracing::warn;

use crate::{fetched::Fetched, traits::TradingApi};

#[derive(Clone)]
pub struct MarketContextProvider {
    api: Arc<dyn TradingApi>,
    simulation: SharedSimulation,
}

impl MarketContextProvider {
    pub fn new(api: Arc<dyn TradingApi>, simulation: SharedSimulation) -> Self {
        Self { api, simulation }
    }

    pub async fn get_market_context(&self) -> Fetched<Vec<MarketContext>> {
        match self.api.market_context().await {
            Ok(market) => Fetched::Live(market),
            Err(e) => {
                warn!("Market context unavailable, using simulated snapshot: {}", e);
                Fetched::Simulated(self.simulation.lock().await.generate_market_context())
            }
        }
    }
}
