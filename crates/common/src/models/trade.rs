use serde::{Deserialize, Serialize};

use crate::models::{Signal, SignalAction};

/// Body of `POST /execute_trade`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRequest {
    pub ticker: String,
    pub action: SignalAction,
    pub confidence: f64,
    pub price: f64,
}

impl TradeRequest {
    pub fn from_signal(signal: &Signal, price: f64) -> Self {
        Self {
            ticker: signal.ticker.clone(),
            action: signal.action,
            confidence: signal.confidence,
            price,
        }
    }
}

/// Acknowledgement for a forced trading session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForceAck {
    pub status: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
