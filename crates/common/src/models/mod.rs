pub mod market_context;
pub mod signal;
pub mod status;
pub mod trade;

pub use market_context::{Indicators, MarketContext, Trend};
pub use signal::{Signal, SignalAction, SignalBatch, MAX_CONFIDENCE, MAX_IMPACT_SCORE};
pub use status::{PortfolioFigures, StatusLabel, SystemStatus};
pub use trade::{ForceAck, TradeRequest};
