use std::time::Duration;

use async_trait::async_trait;
use common::models::{MarketContext, SignalBatch, SystemStatus, TradeRequest};
use reqwest::{
    Client, Response,
    header::{ACCEPT, CONTENT_TYPE},
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::debug;

use crate::{error::ApiError, traits::TradingApi};

pub const STATUS_PATH: &str = "/status";
pub const MARKET_CONTEXT_PATH: &str = "/market_context";
pub const EXECUTE_TRADE_PATH: &str = "/execute_trade";
pub const TECHNICAL_SIGNALS_PATH: &str = "/test_technical";
pub const FORCE_PATH: &str = "/force";
pub const STATS_PATH: &str = "/stats";

const JSON: &str = "application/json";

/// `application/json` or any `+json` structured suffix, parameters ignored.
pub fn is_json_content_type(value: &str) -> bool {
    let mime = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == JSON || mime.ends_with("+json")
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = Client::builder().user_agent("trading_dashboard/0.1.0");
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let base_url: String = base_url.into();
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .client
            .get(self.url(path))
            .header(ACCEPT, JSON)
            .send()
            .await?;
        Self::decode(path, response).await
    }

    async fn post_json<B, T>(&self, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self.client.post(self.url(path)).header(ACCEPT, JSON);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        Self::decode(path, response).await
    }

    async fn decode<T: DeserializeOwned>(path: &str, response: Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }

        // Misconfigured proxies like to answer 200 with an HTML error page.
        if let Some(content_type) = response.headers().get(CONTENT_TYPE) {
            let content_type = content_type.to_str().unwrap_or_default();
            if !is_json_content_type(content_type) {
                return Err(ApiError::NotJson(content_type.to_string()));
            }
        }

        let bytes = response.bytes().await?;
        debug!("{} answered {} bytes", path, bytes.len());

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::from_value(Value::Null)?);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl TradingApi for ApiClient {
    async fn status(&self) -> Result<SystemStatus, ApiError> {
        self.get_json(STATUS_PATH).await
    }

    async fn market_context(&self) -> Result<Vec<MarketContext>, ApiError> {
        self.get_json(MARKET_CONTEXT_PATH).await
    }

    async fn execute_trade(&self, request: &TradeRequest) -> Result<Value, ApiError> {
        self.post_json(EXECUTE_TRADE_PATH, Some(request)).await
    }

    async fn technical_signals(&self) -> Result<SignalBatch, ApiError> {
        self.get_json(TECHNICAL_SIGNALS_PATH).await
    }

    async fn force(&self) -> Result<Value, ApiError> {
        self.post_json::<Value, _>(FORCE_PATH, None).await
    }

    async fn stats(&self) -> Result<Value, ApiError> {
        self.get_json(STATS_PATH).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_content_types() {
        assert!(is_json_content_type("application/json"));
        assert!(is_json_content_type("application/json; charset=utf-8"));
        assert!(is_json_content_type("Application/JSON"));
        assert!(is_json_content_type("application/problem+json"));
        assert!(!is_json_content_type("text/html; charset=utf-8"));
        assert!(!is_json_content_type("text/plain"));
        assert!(!is_json_content_type(""));
    }

    #[test]
    fn test_base_url_trailing_slash_is_dropped() {
        let client = ApiClient::new("http://127.0.0.1:5000/", None).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:5000");
        assert_eq!(client.url(STATUS_PATH), "http://127.0.0.1:5000/status");
    }
}
