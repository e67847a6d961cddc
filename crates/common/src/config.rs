use std::{env, str::FromStr, time::Duration};

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Reads `name` from the environment, falling back to `default` when unset.
pub fn env_or<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env_opt(name)? {
        Some(v) => Ok(v),
        None => Ok(default),
    }
}

pub fn env_opt<T>(name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => parse_value(name, raw.trim()).map(Some),
        _ => Ok(None),
    }
}

pub fn env_flag(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => parse_flag(name, raw.trim()),
        _ => Ok(default),
    }
}

fn parse_value<T>(name: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|e| ConfigError::Invalid {
        name,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

fn parse_flag(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            value: raw.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}

/// Dashboard client configuration
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Base URL of the trading API, without a trailing slash
    pub api_base_url: String,
    /// Period of the silent background refresh
    pub poll_interval: Duration,
    /// Fetch technical signals after every status refresh
    pub fetch_signals: bool,
    /// Simulate the effect of a trade when `/execute_trade` is unreachable
    pub simulate_trades: bool,
    pub initial_portfolio_value: f64,
    /// Bound of the per-fetch status drift, as a fraction of the value
    pub status_drift_pct: f64,
    /// Bound of the drift caused by a simulated trade
    pub trade_drift_pct: f64,
    /// Pause before an analysis cycle fetches market context
    pub analysis_delay: Duration,
    pub request_timeout: Option<Duration>,
    /// Seed for the simulation generator; OS entropy when unset
    pub seed: Option<u64>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:5000".to_string(),
            poll_interval: Duration::from_secs(30),
            fetch_signals: true,
            simulate_trades: true,
            initial_portfolio_value: 100_000.0,
            status_drift_pct: 0.0015,
            trade_drift_pct: 0.005,
            analysis_delay: Duration::from_millis(1500),
            request_timeout: None,
            seed: None,
        }
    }
}

impl DashboardConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let poll_secs: u64 = env_or("DASHBOARD_POLL_INTERVAL_SECS", defaults.poll_interval.as_secs())?;
        if poll_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "DASHBOARD_POLL_INTERVAL_SECS",
                value: poll_secs.to_string(),
                reason: "interval must be at least one second".to_string(),
            });
        }

        let api_base_url: String = env_or("DASHBOARD_API_URL", defaults.api_base_url)?;

        Ok(Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            poll_interval: Duration::from_secs(poll_secs),
            fetch_signals: env_flag("DASHBOARD_FETCH_SIGNALS", defaults.fetch_signals)?,
            simulate_trades: env_flag("DASHBOARD_SIMULATE_TRADES", defaults.simulate_trades)?,
            initial_portfolio_value: env_or("DASHBOARD_INITIAL_VALUE", defaults.initial_portfolio_value)?,
            status_drift_pct: env_or("DASHBOARD_STATUS_DRIFT_PCT", defaults.status_drift_pct)?,
            trade_drift_pct: env_or("DASHBOARD_TRADE_DRIFT_PCT", defaults.trade_drift_pct)?,
            analysis_delay: Duration::from_millis(env_or(
                "DASHBOARD_ANALYSIS_DELAY_MS",
                defaults.analysis_delay.as_millis() as u64,
            )?),
            request_timeout: env_opt::<u64>("DASHBOARD_REQUEST_TIMEOUT_SECS")?.map(Duration::from_secs),
            seed: env_opt("DASHBOARD_SEED")?,
        })
    }
}
