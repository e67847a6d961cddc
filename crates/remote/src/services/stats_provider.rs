use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::traits::TradingApi;

#[derive(Clone)]
pub struct StatsProvider {
    api: Arc<dyn TradingApi>,
}

impl StatsProvider {
    pub fn new(api: Arc<dyn TradingApi>) -> Self {
        Self { api }
    }

    /// Detailed stats have no simulated counterpart; any failure is `None`.
    pub async fn get_stats(&self) -> Option<Value> {
        match self.api.stats().await {
            Ok(Value::Null) => None,
            Ok(stats) => Some(stats),
            Err(e) => {
                debug!("Stats fetch failed: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ApiError, traits::MockTradingApi};
    use serde_json::json;

    #[tokio::test]
    async fn test_stats_failure_is_none() {
        let mut api = MockTradingApi::new();
        api.expect_stats().returning(|| Err(ApiError::Status(500)));
        assert!(StatsProvider::new(Arc::new(api)).get_stats().await.is_none());
    }

    #[tokio::test]
    async fn test_stats_pass_through() {
        let mut api = MockTradingApi::new();
        api.expect_stats()
            .returning(|| Ok(json!({ "total_trades": 12 })));
        let stats = StatsProvider::new(Arc::new(api)).get_stats().await;
        assert_eq!(stats, Some(json!({ "total_trades": 12 })));
    }
}
