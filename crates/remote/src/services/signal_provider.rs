use std::sync::Arc;

use chrono::Utc;
use common::models::SignalBatch;
use simulation::SharedSimulation;
use tracing::warn;

use crate::{fetched::Fetched, traits::TradingApi};

#[derive(Clone)]
pub struct SignalProvider {
    api: Arc<dyn TradingApi>,
    simulation: SharedSimulation,
}

impl SignalProvider {
    pub fn new(api: Arc<dyn TradingApi>, simulation: SharedSimulation) -> Self {
        Self { api, simulation }
    }

    /// Remote signals are normalized and sorted newest first; on failure a
    /// randomized batch ending at "now" is generated instead.
    pub async fn get_technical_signals(&self) -> Fetched<SignalBatch> {
        match self.api.technical_signals().await {
            Ok(mut batch) => {
                batch.signals.retain(|s| !s.ticker.trim().is_empty());
                for signal in batch.signals.iter_mut() {
                    if signal.normalize() {
                        warn!("Signal for {} had out-of-range scores, clamped", signal.ticker);
                    }
                }
                batch.sort_newest_first();
                Fetched::Live(batch)
            }
            Err(e) => {
                warn!("Signals fetch failed, generating simulated signals: {}", e);
                let batch = self.simulation.lock().await.generate_signals(Utc::now());
                Fetched::Simulated(batch)
            }
        }
    }
}
