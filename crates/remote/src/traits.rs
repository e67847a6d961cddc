use async_trait::async_trait;
use common::models::{MarketContext, SignalBatch, SystemStatus, TradeRequest};
use serde_json::Value;

use crate::error::ApiError;

/// The remote trading API as seen by the providers. Every call is a single
/// attempt; retries and fallbacks are the caller's business.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TradingApi: Send + Sync {
    async fn status(&self) -> Result<SystemStatus, ApiError>;

    async fn market_context(&self) -> Result<Vec<MarketContext>, ApiError>;

    async fn execute_trade(&self, request: &TradeRequest) -> Result<Value, ApiError>;

    async fn technical_signals(&self) -> Result<SignalBatch, ApiError>;

    async fn force(&self) -> Result<Value, ApiError>;

    async fn stats(&self) -> Result<Value, ApiError>;
}
