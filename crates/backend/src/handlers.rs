use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use common::models::{ForceAck, TradeRequest};
use serde_json::json;
use tracing::info;

use crate::state::BackendState;

pub async fn home() -> impl IntoResponse {
    Json(json!({ "message": "Trading dashboard backend", "status": "running" }))
}

pub async fn status(State(state): State<Arc<BackendState>>) -> impl IntoResponse {
    let status = state.simulation.lock().await.simulate_status(Utc::now());
    Json(status)
}

pub async fn market_context(State(state): State<Arc<BackendState>>) -> impl IntoResponse {
    let market = state.simulation.lock().await.generate_market_context();
    Json(market)
}

pub async fn technical_signals(State(state): State<Arc<BackendState>>) -> impl IntoResponse {
    let batch = state.simulation.lock().await.generate_signals(Utc::now());
    Json(batch)
}

pub async fn execute_trade(
    State(state): State<Arc<BackendState>>,
    Json(request): Json<TradeRequest>,
) -> impl IntoResponse {
    info!(
        "Trade received: {} {} @ {:.2}",
        request.action, request.ticker, request.price
    );
    state.simulation.lock().await.record_trade();

    Json(json!({
        "success": true,
        "message": "Trade executed",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

pub async fn force(State(state): State<Arc<BackendState>>) -> impl IntoResponse {
    let mut sim = state.simulation.lock().await;
    sim.record_trade();
    let tickers = sim.settings().tracked_tickers.len();

    Json(ForceAck {
        status: "success".to_string(),
        message: "Trading session executed".to_string(),
        details: Some(format!("Analyzed {} tickers", tickers)),
    })
}

pub async fn stats(State(state): State<Arc<BackendState>>) -> impl IntoResponse {
    let sim = state.simulation.lock().await;
    let figures = sim.figures();

    Json(json!({
        "total_value": figures.value(),
        "total_profit": figures.profit(),
        "total_return_pct": figures.return_pct(),
        "total_trades": sim.total_trades(),
        "tracked_tickers": sim.settings().tracked_tickers,
        "served_since": state.started_at.to_rfc3339(),
    }))
}
