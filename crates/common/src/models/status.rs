use std::fmt;

use serde::{Deserialize, Serialize};

/// Status label reported by the backend. The set is open: anything the
/// server sends that is not one of the known labels is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StatusLabel {
    Online,
    Simulation,
    Offline,
    Other(String),
}

impl StatusLabel {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Online => "ONLINE",
            Self::Simulation => "SIMULATION MODE",
            Self::Offline => "OFFLINE",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for StatusLabel {
    fn from(value: String) -> Self {
        match value.to_uppercase().as_str() {
            "ONLINE" | "OPERATIONAL" | "RUNNING" => Self::Online,
            "SIMULATION MODE" | "SIMULATION" => Self::Simulation,
            "OFFLINE" => Self::Offline,
            _ => Self::Other(value),
        }
    }
}

impl From<StatusLabel> for String {
    fn from(value: StatusLabel) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Portfolio value together with the figures derived from it.
///
/// The only way to build one is [`PortfolioFigures::derive`], so profit and
/// return percentage can never drift apart from the value they describe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortfolioFigures {
    value: f64,
    profit: f64,
    return_pct: f64,
}

impl PortfolioFigures {
    /// `initial_value` must be non-zero; callers validate it at construction
    /// of whatever owns the initial value.
    pub fn derive(value: f64, initial_value: f64) -> Self {
        let profit = value - initial_value;
        Self {
            value,
            profit,
            return_pct: profit / initial_value * 100.0,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn profit(&self) -> f64 {
        self.profit
    }

    pub fn return_pct(&self) -> f64 {
        self.return_pct
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemStatus {
    pub status: StatusLabel,
    pub uptime_seconds: u64,
    pub trading_sessions: u64,
    pub total_trades: u64,
    pub virtual_portfolio_value: f64,
    pub virtual_return_percentage: f64,
    pub total_profit: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_trading_time: Option<String>,
    #[serde(default)]
    pub hybrid_mode: bool,
    #[serde(default)]
    pub tracked_tickers: Vec<String>,
}

impl SystemStatus {
    pub fn apply_figures(&mut self, figures: PortfolioFigures) {
        self.virtual_portfolio_value = figures.value();
        self.total_profit = figures.profit();
        self.virtual_return_percentage = figures.return_pct();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_figures_are_derived_together() {
        let figures = PortfolioFigures::derive(101_500.0, 100_000.0);
        assert!((figures.profit() - 1_500.0).abs() < 1e-9);
        assert!((figures.return_pct() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_label_round_trips_unknown_values() {
        let label: StatusLabel = serde_json::from_str("\"DEGRADED\"").unwrap();
        assert_eq!(label, StatusLabel::Other("DEGRADED".to_string()));
        assert_eq!(serde_json::to_string(&label).unwrap(), "\"DEGRADED\"");

        let label: StatusLabel = serde_json::from_str("\"online\"").unwrap();
        assert_eq!(label, StatusLabel::Online);
    }

    #[test]
    fn test_status_accepts_backend_payload() {
        let payload = r#"{
            "status": "ONLINE",
            "uptime_seconds": 4200,
            "trading_sessions": 61,
            "total_trades": 1337,
            "virtual_portfolio_value": 250000,
            "virtual_return_percentage": 3.25,
            "total_profit": 42000,
            "last_trading_time": "2024-05-01T10:15:00.123456",
            "hybrid_mode": true,
            "tracked_tickers": ["SBER", "GAZP"]
        }"#;
        let status: SystemStatus = serde_json::from_str(payload).unwrap();
        assert_eq!(status.status, StatusLabel::Online);
        assert_eq!(status.virtual_portfolio_value, 250_000.0);
        assert_eq!(status.tracked_tickers.len(), 2);
    }

    #[test]
    fn test_status_optional_fields_default() {
        let payload = r#"{
            "status": "OFFLINE",
            "uptime_seconds": 0,
            "trading_sessions": 0,
            "total_trades": 0,
            "virtual_portfolio_value": 0.0,
            "virtual_return_percentage": 0.0,
            "total_profit": 0.0
        }"#;
        let status: SystemStatus = serde_json::from_str(payload).unwrap();
        assert!(!status.hybrid_mode);
        assert!(status.last_trading_time.is_none());
        assert!(status.tracked_tickers.is_empty());
    }
}
