use std::sync::Arc;

use chrono::Utc;
use common::models::SystemStatus;
use simulation::SharedSimulation;
use tracing::warn;

use crate::{fetched::Fetched, traits::TradingApi};

#[derive(Clone)]
pub struct StatusProvider {
    api: Arc<dyn TradingApi>,
    simulation: SharedSimulation,
}

impl StatusProvider {
    pub fn new(api: Arc<dyn TradingApi>, simulation: SharedSimulation) -> Self {
        Self { api, simulation }
    }

    /// Never fails: any transport or format error yields the next simulated
    /// status, which also advances the shared simulation.
    pub async fn get_status(&self) -> Fetched<SystemStatus> {
        match self.api.status().await {
            Ok(status) => Fetched::Live(status),
            Err(e) => {
                warn!("Backend offline or unreachable, using simulation mode: {}", e);
                let status = self.simulation.lock().await.simulate_status(Utc::now());
                Fetched::Simulated(status)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ApiError, traits::MockTradingApi};
    use common::models::StatusLabel;
    use simulation::{SimulationSettings, SimulationState};

    fn simulation() -> SharedSimulation {
        SimulationState::seeded(SimulationSettings::default(), 42)
            .unwrap()
            .into_shared()
    }

    fn live_status() -> SystemStatus {
        SystemStatus {
            status: StatusLabel::Online,
            uptime_seconds: 5000,
            trading_sessions: 120,
            total_trades: 2500,
            virtual_portfolio_value: 300_000.0,
            virtual_return_percentage: 4.0,
            total_profit: 50_000.0,
            last_trading_time: None,
            hybrid_mode: true,
            tracked_tickers: vec!["SBER".to_string()],
        }
    }

    #[tokio::test]
    async fn test_live_status_passes_through() {
        let mut api = MockTradingApi::new();
        api.expect_status().times(1).returning(|| Ok(live_status()));

        let sim = simulation();
        let provider = StatusProvider::new(Arc::new(api), sim.clone());
        let fetched = provider.get_status().await;

        assert_eq!(fetched, Fetched::Live(live_status()));
        assert_eq!(sim.lock().await.portfolio_value(), 100_000.0);
    }

    #[tokio::test]
    async fn test_html_response_falls_back_to_simulation() {
        let mut api = MockTradingApi::new();
        api.expect_status()
            .returning(|| Err(ApiError::NotJson("text/html; charset=utf-8".to_string())));

        let provider = StatusProvider::new(Arc::new(api), simulation());
        let fetched = provider.get_status().await;

        assert!(fetched.is_simulated());
        let status = fetched.into_inner();
        assert_eq!(status.status, StatusLabel::Simulation);
        let profit = status.virtual_portfolio_value - 100_000.0;
        assert!((status.total_profit - profit).abs() < 1e-9);
        assert!((status.virtual_return_percentage - profit / 1_000.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_every_fallback_advances_the_simulation() {
        let mut api = MockTradingApi::new();
        api.expect_status()
            .times(50)
            .returning(|| Err(ApiError::Status(503)));

        let sim = simulation();
        let provider = StatusProvider::new(Arc::new(api), sim.clone());

        let mut previous = sim.lock().await.portfolio_value();
        for _ in 0..50 {
            let status = provider.get_status().await.into_inner();
            assert!((status.virtual_portfolio_value - previous).abs() <= previous * 0.0015 + 1e-9);
            assert_eq!(status.virtual_portfolio_value, sim.lock().await.portfolio_value());
            previous = status.virtual_portfolio_value;
        }
    }
}
