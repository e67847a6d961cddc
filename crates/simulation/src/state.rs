use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use common::models::{
    ForceAck, MarketContext, PortfolioFigures, Signal, SignalBatch, StatusLabel, SystemStatus,
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

use crate::{market, signals};

pub const DEFAULT_TICKERS: &[&str] = &["SBER", "GAZP", "LKOH", "YNDX", "ROSN", "NVTK"];

/// Simulation state shared between the providers of one dashboard.
pub type SharedSimulation = Arc<Mutex<SimulationState>>;

#[derive(Error, Debug, PartialEq)]
pub enum SimulationError {
    #[error("initial portfolio value must be positive and finite, got {0}")]
    InvalidInitialValue(f64),
    #[error("drift bound must be within [0, 1), got {0}")]
    InvalidDrift(f64),
    #[error("session length must be positive")]
    InvalidSessionLength,
}

#[derive(Debug, Clone)]
pub struct SimulationSettings {
    pub initial_value: f64,
    pub initial_trades: u64,
    /// Bound of the drift applied on every simulated status fetch
    pub status_drift_pct: f64,
    /// Bound of the drift applied on every simulated trade
    pub trade_drift_pct: f64,
    /// How long the session has already been running when the simulation starts
    pub warm_start: Duration,
    pub session_length: Duration,
    pub tracked_tickers: Vec<String>,
    pub label: StatusLabel,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            initial_value: 100_000.0,
            initial_trades: 14,
            status_drift_pct: 0.0015,
            trade_drift_pct: 0.005,
            warm_start: Duration::hours(4),
            session_length: Duration::minutes(30),
            tracked_tickers: DEFAULT_TICKERS.iter().map(|s| s.to_string()).collect(),
            label: StatusLabel::Simulation,
        }
    }
}

impl SimulationSettings {
    pub fn validate(&self) -> Result<(), SimulationError> {
        if !self.initial_value.is_finite() || self.initial_value <= 0.0 {
            return Err(SimulationError::InvalidInitialValue(self.initial_value));
        }
        for pct in [self.status_drift_pct, self.trade_drift_pct] {
            if !(0.0..1.0).contains(&pct) {
                return Err(SimulationError::InvalidDrift(pct));
            }
        }
        if self.session_length <= Duration::zero() {
            return Err(SimulationError::InvalidSessionLength);
        }
        Ok(())
    }
}

/// Returns `value` moved by a uniform random fraction in `[-pct, pct]`.
pub fn vary<R: Rng + ?Sized>(rng: &mut R, value: f64, pct: f64) -> f64 {
    let change = value * (rng.random::<f64>() * pct * 2.0 - pct);
    value + change
}

pub struct SimulationState {
    settings: SimulationSettings,
    portfolio_value: f64,
    trades: u64,
    started_at: DateTime<Utc>,
    last_uptime: u64,
    rng: StdRng,
}

impl SimulationState {
    pub fn new(
        settings: SimulationSettings,
        rng: StdRng,
        now: DateTime<Utc>,
    ) -> Result<Self, SimulationError> {
        settings.validate()?;
        Ok(Self {
            portfolio_value: settings.initial_value,
            trades: settings.initial_trades,
            started_at: now - settings.warm_start,
            last_uptime: 0,
            settings,
            rng,
        })
    }

    pub fn seeded(settings: SimulationSettings, seed: u64) -> Result<Self, SimulationError> {
        Self::new(settings, StdRng::seed_from_u64(seed), Utc::now())
    }

    pub fn from_os_rng(settings: SimulationSettings) -> Result<Self, SimulationError> {
        Self::new(settings, StdRng::from_os_rng(), Utc::now())
    }

    pub fn into_shared(self) -> SharedSimulation {
        Arc::new(Mutex::new(self))
    }

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    pub fn portfolio_value(&self) -> f64 {
        self.portfolio_value
    }

    pub fn total_trades(&self) -> u64 {
        self.trades
    }

    pub fn figures(&self) -> PortfolioFigures {
        PortfolioFigures::derive(self.portfolio_value, self.settings.initial_value)
    }

    /// One simulated `/status` fetch: drifts the portfolio, then snapshots it.
    pub fn simulate_status(&mut self, now: DateTime<Utc>) -> SystemStatus {
        self.drift(self.settings.status_drift_pct);
        self.snapshot(now)
    }

    pub fn snapshot(&mut self, now: DateTime<Utc>) -> SystemStatus {
        let elapsed = (now - self.started_at).max(Duration::zero());
        let uptime = (elapsed.num_seconds() as u64).max(self.last_uptime);
        self.last_uptime = uptime;

        let session_secs = self.settings.session_length.num_seconds().max(1) as u64;

        let mut status = SystemStatus {
            status: self.settings.label.clone(),
            uptime_seconds: uptime,
            trading_sessions: uptime / session_secs,
            total_trades: self.trades,
            virtual_portfolio_value: 0.0,
            virtual_return_percentage: 0.0,
            total_profit: 0.0,
            last_trading_time: Some(now.to_rfc3339()),
            hybrid_mode: true,
            tracked_tickers: self.settings.tracked_tickers.clone(),
        };
        status.apply_figures(self.figures());
        status
    }

    /// Counts one trade and applies its (bounded) effect on the portfolio.
    pub fn record_trade(&mut self) {
        self.trades += 1;
        self.drift(self.settings.trade_drift_pct);
        debug!(
            trades = self.trades,
            value = self.portfolio_value,
            "Simulated trade recorded"
        );
    }

    pub fn simulate_force(&mut self) -> ForceAck {
        self.record_trade();
        ForceAck {
            status: "success".to_string(),
            message: "Simulation: Trade logic executed successfully".to_string(),
            details: Some(format!(
                "Analyzed {} tickers, generated 1 signal",
                self.settings.tracked_tickers.len()
            )),
        }
    }

    pub fn generate_signals(&mut self, now: DateTime<Utc>) -> SignalBatch {
        signals::generate_batch(&mut self.rng, now)
    }

    pub fn generate_market_context(&mut self) -> Vec<MarketContext> {
        market::generate_market_context(&mut self.rng)
    }

    pub fn analyze(
        &mut self,
        market: &[MarketContext],
        now: DateTime<Utc>,
    ) -> Option<(Signal, f64)> {
        signals::analyze_market(&mut self.rng, market, now)
    }

    fn drift(&mut self, pct: f64) {
        self.portfolio_value = vary(&mut self.rng, self.portfolio_value, pct);
    }
}
