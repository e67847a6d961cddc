use std::sync::Arc;

use chrono::Utc;
use common::models::{Signal, TradeRequest};
use serde_json::{Value, json};
use simulation::SharedSimulation;
use tracing::{info, warn};

use crate::{error::ApiError, fetched::Fetched, traits::TradingApi};

/// What the executor does when the remote endpoint cannot be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Log and return nothing.
    Stub,
    /// Count the trade and let it move the simulated portfolio.
    Simulated,
}

#[derive(Clone)]
pub struct TradeExecutor {
    api: Arc<dyn TradingApi>,
    simulation: SharedSimulation,
    mode: ExecutionMode,
}

impl TradeExecutor {
    pub fn new(api: Arc<dyn TradingApi>, simulation: SharedSimulation, mode: ExecutionMode) -> Self {
        Self {
            api,
            simulation,
            mode,
        }
    }

    /// Single attempt, never raises.
    pub async fn execute_trade(&self, signal: &Signal, price: f64) -> Option<Fetched<Value>> {
        let request = TradeRequest::from_signal(signal, price);
        info!(
            "Executing {} {} @ {:.2} (confidence {:.2})",
            request.action, request.ticker, request.price, request.confidence
        );

        match self.api.execute_trade(&request).await {
            Ok(ack) => Some(Fetched::Live(ack)),
            Err(e) => {
                warn!("Trade execution unreachable: {}", e);
                match self.mode {
                    ExecutionMode::Stub => None,
                    ExecutionMode::Simulated => {
                        self.simulation.lock().await.record_trade();
                        Some(Fetched::Simulated(json!({
                            "success": true,
                            "message": "Simulation: trade recorded",
                            "ticker": request.ticker,
                            "action": request.action,
                            "price": request.price,
                            "timestamp": Utc::now().to_rfc3339(),
                        })))
                    }
                }
            }
        }
    }

    /// Forces a trading session. Unreachable backends are simulated; a
    /// backend that answers but reports failure is a logic error.
    pub async fn force(&self) -> Result<Fetched<Value>, ApiError> {
        match self.api.force().await {
            Ok(ack) => {
                check_ack(&ack)?;
                Ok(Fetched::Live(ack))
            }
            Err(e) if e.is_recoverable() => {
                warn!("Force trade simulation: {}", e);
                let ack = self.simulation.lock().await.simulate_force();
                Ok(Fetched::Simulated(serde_json::to_value(ack)?))
            }
            Err(e) => Err(e),
        }
    }
}

fn check_ack(ack: &Value) -> Result<(), ApiError> {
    let errored = ack
        .get("status")
        .and_then(Value::as_str)
        .is_some_and(|s| s.eq_ignore_ascii_case("error"));
    let rejected = ack.get("success").and_then(Value::as_bool) == Some(false);

    if errored || rejected {
        let message = ack
            .get("message")
            .or_else(|| ack.get("error"))
            .and_then(Value::as_str)
            .unwrap_or("force run failed");
        return Err(ApiError::Logic(message.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::MockTradingApi;
    use common::models::SignalAction;
    use simulation::{SimulationSettings, SimulationState};

    fn simulation() -> SharedSimulation {
        SimulationState::seeded(SimulationSettings::default(), 3)
            .unwrap()
            .into_shared()
    }

    fn signal() -> Signal {
        Signal {
            ticker: "LKOH".to_string(),
            action: SignalAction::Buy,
            reason: "Breakout".to_string(),
            confidence: 0.8,
            impact_score: 7,
            event_type: None,
            ai_provider: "technical".to_string(),
            timestamp: Utc::now(),
        }
    }

    fn offline_api() -> MockTradingApi {
        let mut api = MockTradingApi::new();
        api.expect_execute_trade()
            .returning(|_| Err(ApiError::Status(502)));
        api.expect_force().returning(|| Err(ApiError::Status(502)));
        api
    }

    #[tokio::test]
    async fn test_trade_request_payload() {
        let mut api = MockTradingApi::new();
        api.expect_execute_trade()
            .withf(|r| r.ticker == "LKOH" && r.action == SignalAction::Buy && r.price == 6500.0)
            .times(1)
            .returning(|_| Ok(json!({ "success": true })));

        let executor = TradeExecutor::new(Arc::new(api), simulation(), ExecutionMode::Stub);
        let result = executor.execute_trade(&signal(), 6500.0).await;
        assert_eq!(result, Some(Fetched::Live(json!({ "success": true }))));
    }

    #[tokio::test]
    async fn test_stub_mode_returns_none_when_unreachable() {
        let sim = simulation();
        let executor = TradeExecutor::new(Arc::new(offline_api()), sim.clone(), ExecutionMode::Stub);

        assert!(executor.execute_trade(&signal(), 100.0).await.is_none());
        assert_eq!(sim.lock().await.total_trades(), 14);
    }

    #[tokio::test]
    async fn test_simulated_mode_counts_the_trade() {
        let sim = simulation();
        let executor =
            TradeExecutor::new(Arc::new(offline_api()), sim.clone(), ExecutionMode::Simulated);

        let before = sim.lock().await.portfolio_value();
        let result = executor.execute_trade(&signal(), 100.0).await.unwrap();
        assert!(result.is_simulated());

        let sim = sim.lock().await;
        assert_eq!(sim.total_trades(), 15);
        assert!((sim.portfolio_value() - before).abs() <= before * 0.005 + 1e-9);
    }

    #[tokio::test]
    async fn test_force_fallback_increments_trades_once() {
        let sim = simulation();
        let executor = TradeExecutor::new(Arc::new(offline_api()), sim.clone(), ExecutionMode::Stub);

        let ack = executor.force().await.unwrap();
        assert!(ack.is_simulated());
        assert_eq!(ack.value()["status"], "success");
        assert_eq!(sim.lock().await.total_trades(), 15);
    }

    #[tokio::test]
    async fn test_force_rejection_is_a_logic_error() {
        let mut api = MockTradingApi::new();
        api.expect_force()
            .returning(|| Ok(json!({ "status": "error", "message": "market closed" })));

        let sim = simulation();
        let executor = TradeExecutor::new(Arc::new(api), sim.clone(), ExecutionMode::Simulated);

        match executor.force().await {
            Err(ApiError::Logic(msg)) => assert_eq!(msg, "market closed"),
            other => panic!("expected logic error, got {:?}", other),
        }
        assert_eq!(sim.lock().await.total_trades(), 14);
    }
}
