use common::models::{Indicators, MarketContext, Trend};
use rand::Rng;

use crate::signals::pick;

pub const MARKET_TICKERS: &[&str] = &["SBER", "GAZP", "LKOH", "YNDX", "VTBR"];

/// Randomized market snapshot, one entry per ticker.
pub fn generate_market_context<R: Rng + ?Sized>(rng: &mut R) -> Vec<MarketContext> {
    MARKET_TICKERS
        .iter()
        .map(|ticker| MarketContext {
            ticker: ticker.to_string(),
            price: rng.random_range(100.0..5000.0),
            indicators: Indicators {
                rsi: rng.random_range(20.0..80.0),
                macd: rng.random_range(-2.0..2.0),
                volume_spike: rng.random_bool(0.5),
                trend: *pick(rng, &Trend::ALL),
            },
        })
        .collect()
}
