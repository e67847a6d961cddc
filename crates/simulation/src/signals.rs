use chrono::{DateTime, Duration, Utc};
use common::models::{MarketContext, Signal, SignalAction, SignalBatch};
use rand::Rng;

pub const BATCH_SIZE: usize = 3;
pub const BATCH_SPACING_MINUTES: i64 = 15;

const BATCH_TICKERS: &[&str] = &["SBER", "LKOH", "VTBR", "YNDX"];
const BATCH_PROVIDERS: &[&str] = &["technical", "gigachat", "hybrid"];
const BATCH_REASON: &str = "Simulated signal based on RSI and MACD convergence analysis.";

const ANALYSIS_PROVIDERS: &[&str] = &["gemini-2.5-flash", "technical"];

const BUY_REASONS: &[&str] = &[
    "Strong bullish momentum with RSI below 30 (oversold)",
    "Breakout above key resistance level with high volume",
    "MACD bullish crossover confirmed",
    "Institutional accumulation detected",
];
const SELL_REASONS: &[&str] = &[
    "RSI above 70 indicates overbought conditions",
    "Support level broken with increased selling pressure",
    "MACD bearish divergence detected",
    "Profit-taking after strong rally",
];
const HOLD_REASONS: &[&str] = &[
    "Market consolidation phase, waiting for clearer direction",
    "Mixed signals from technical indicators",
    "Low volatility suggests waiting for catalyst",
    "Position sizing optimal, no adjustment needed",
];

pub(crate) fn pick<'a, R: Rng + ?Sized, T>(rng: &mut R, items: &'a [T]) -> &'a T {
    &items[rng.random_range(0..items.len())]
}

fn confidence<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    0.65 + rng.random::<f64>() * 0.3
}

/// Fallback for `/test_technical`: a fixed-size batch, newest first, spaced
/// 15 minutes apart and ending at `now`.
pub fn generate_batch<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> SignalBatch {
    let signals = (0..BATCH_SIZE)
        .map(|i| Signal {
            ticker: pick(rng, BATCH_TICKERS).to_string(),
            action: *pick(rng, &SignalAction::ALL),
            reason: BATCH_REASON.to_string(),
            confidence: confidence(rng),
            impact_score: rng.random_range(2..10),
            event_type: None,
            ai_provider: pick(rng, BATCH_PROVIDERS).to_string(),
            timestamp: now - Duration::minutes(BATCH_SPACING_MINUTES * i as i64),
        })
        .collect();

    SignalBatch { signals }
}

/// Derives one signal from a market snapshot, returning it together with the
/// price of its ticker. `None` when the snapshot is empty.
pub fn analyze_market<R: Rng + ?Sized>(
    rng: &mut R,
    market: &[MarketContext],
    now: DateTime<Utc>,
) -> Option<(Signal, f64)> {
    if market.is_empty() {
        return None;
    }

    let context = pick(rng, market);
    let action = *pick(rng, &SignalAction::ALL);
    let reasons = match action {
        SignalAction::Buy => BUY_REASONS,
        SignalAction::Sell => SELL_REASONS,
        SignalAction::Hold => HOLD_REASONS,
    };

    let signal = Signal {
        ticker: context.ticker.clone(),
        action,
        reason: pick(rng, reasons).to_string(),
        confidence: confidence(rng),
        impact_score: rng.random_range(5..=10),
        event_type: None,
        ai_provider: pick(rng, ANALYSIS_PROVIDERS).to_string(),
        timestamp: now,
    };

    Some((signal, context.price))
}
