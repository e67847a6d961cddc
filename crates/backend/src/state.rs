use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::models::StatusLabel;
use simulation::{SharedSimulation, SimulationError, SimulationSettings, SimulationState};

/// Shared state behind every backend handler.
pub struct BackendState {
    pub simulation: SharedSimulation,
    pub started_at: DateTime<Utc>,
}

impl BackendState {
    pub fn new(simulation: SimulationState) -> Arc<Self> {
        Arc::new(Self {
            simulation: simulation.into_shared(),
            started_at: Utc::now(),
        })
    }

    /// Settings the backend reports under: the live label and the wider
    /// ticker universe the backend tracks.
    pub fn settings() -> SimulationSettings {
        SimulationSettings {
            label: StatusLabel::Online,
            tracked_tickers: ["SBER", "GAZP", "LKOH", "YNDX", "VTBR", "ROSN", "MGNT"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            ..SimulationSettings::default()
        }
    }

    pub fn with_seed(seed: Option<u64>) -> Result<Arc<Self>, SimulationError> {
        let simulation = match seed {
            Some(seed) => SimulationState::seeded(Self::settings(), seed)?,
            None => SimulationState::from_os_rng(Self::settings())?,
        };
        Ok(Self::new(simulation))
    }
}
