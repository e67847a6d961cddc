use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MAX_CONFIDENCE: f64 = 1.0;
pub const MAX_IMPACT_SCORE: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalAction {
    Buy,
    Sell,
    Hold,
}

impl SignalAction {
    pub const ALL: [SignalAction; 3] = [Self::Buy, Self::Sell, Self::Hold];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::Hold => "HOLD",
        }
    }
}

impl fmt::Display for SignalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub ticker: String,
    pub action: SignalAction,
    pub reason: String,
    pub confidence: f64,
    pub impact_score: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    pub ai_provider: String,
    pub timestamp: DateTime<Utc>,
}

impl Signal {
    /// Pulls confidence and impact back into their documented ranges.
    /// Returns true when anything had to be changed.
    pub fn normalize(&mut self) -> bool {
        let confidence = if self.confidence.is_nan() {
            0.0
        } else {
            self.confidence.clamp(0.0, MAX_CONFIDENCE)
        };
        let impact = self.impact_score.min(MAX_IMPACT_SCORE);
        let changed = confidence != self.confidence || impact != self.impact_score;
        self.confidence = confidence;
        self.impact_score = impact;
        changed
    }
}

/// Payload of `GET /test_technical`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalBatch {
    #[serde(default)]
    pub signals: Vec<Signal>,
}

impl SignalBatch {
    pub fn sort_newest_first(&mut self) {
        self.signals.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    }
}
