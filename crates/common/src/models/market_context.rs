use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Sideways,
}

impl Trend {
    pub const ALL: [Trend; 3] = [Self::Up, Self::Down, Self::Sideways];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indicators {
    pub rsi: f64,
    pub macd: f64,
    pub volume_spike: bool,
    pub trend: Trend,
}

/// One entry of `GET /market_context`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketContext {
    pub ticker: String,
    pub price: f64,
    pub indicators: Indicators,
}
