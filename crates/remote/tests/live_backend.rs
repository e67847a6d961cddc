use std::sync::Arc;

use axum::{
    Json, Router,
    body::Body,
    http::StatusCode,
    response::{Html, Response},
    routing::get,
};
use backend::{BackendConfig, BackendServer, BackendState};
use chrono::Utc;
use common::models::{Signal, SignalAction, StatusLabel};
use remote::{
    ApiClient, ApiError, DashboardApi, DataSource, TradingApi,
    services::ExecutionMode,
};
use serde_json::json;
use simulation::{SharedSimulation, SimulationSettings, SimulationState};
use tokio::net::TcpListener;

async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn serve_backend() -> String {
    let state = BackendState::new(SimulationState::seeded(BackendState::settings(), 5).unwrap());
    serve(BackendServer::new(state, BackendConfig::default()).build_router()).await
}

/// A base URL nothing listens on.
async fn closed_port() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn local_simulation() -> SharedSimulation {
    SimulationState::seeded(SimulationSettings::default(), 17)
        .unwrap()
        .into_shared()
}

fn dashboard(base_url: &str, mode: ExecutionMode) -> (DashboardApi, SharedSimulation) {
    let client = ApiClient::new(base_url, None).unwrap();
    let sim = local_simulation();
    (DashboardApi::new(Arc::new(client), sim.clone(), mode), sim)
}

fn signal() -> Signal {
    Signal {
        ticker: "SBER".to_string(),
        action: SignalAction::Buy,
        reason: "Breakout above resistance".to_string(),
        confidence: 0.82,
        impact_score: 8,
        event_type: None,
        ai_provider: "technical".to_string(),
        timestamp: chrono::Utc::now(),
    }
}

#[tokio::test]
async fn status_from_running_backend_is_live() {
    let base = serve_backend().await;
    let (api, sim) = dashboard(&base, ExecutionMode::Stub);

    let fetched = api.status.get_status().await;
    assert_eq!(fetched.source(), DataSource::Live);
    assert_eq!(fetched.value().status, StatusLabel::Online);

    // The local simulation is untouched by a live fetch.
    assert_eq!(sim.lock().await.portfolio_value(), 100_000.0);
}

#[tokio::test]
async fn html_status_page_is_treated_like_an_outage() {
    let router = Router::new().route(
        "/status",
        get(|| async { Html("<html><body>502 Bad Gateway</body></html>") }),
    );
    let base = serve(router).await;
    let (api, _) = dashboard(&base, ExecutionMode::Stub);

    let fetched = api.status.get_status().await;
    assert!(fetched.is_simulated());
    assert_eq!(fetched.value().status, StatusLabel::Simulation);
}

#[tokio::test]
async fn error_status_with_json_body_is_an_outage() {
    let router = Router::new().route(
        "/status",
        get(|| async {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "error": "maintenance" })),
            )
        }),
    );
    let base = serve(router).await;

    let client = ApiClient::new(base.as_str(), None).unwrap();
    assert!(matches!(client.status().await, Err(ApiError::Status(503))));

    let (api, _) = dashboard(&base, ExecutionMode::Stub);
    let fetched = api.status.get_status().await;
    assert!(fetched.is_simulated());
    assert_eq!(fetched.value().status, StatusLabel::Simulation);
}

#[tokio::test]
async fn status_without_content_type_is_accepted() {
    let mut backend_sim = SimulationState::seeded(BackendState::settings(), 11).unwrap();
    let body = serde_json::to_string(&backend_sim.snapshot(Utc::now())).unwrap();

    let router = Router::new().route(
        "/status",
        get(move || {
            let body = body.clone();
            async move { Response::new(Body::from(body)) }
        }),
    );
    let base = serve(router).await;
    let (api, sim) = dashboard(&base, ExecutionMode::Stub);

    let fetched = api.status.get_status().await;
    assert_eq!(fetched.source(), DataSource::Live);
    assert_eq!(fetched.value().status, StatusLabel::Online);
    assert_eq!(fetched.value().total_trades, 14);
    assert_eq!(sim.lock().await.portfolio_value(), 100_000.0);
}

#[tokio::test]
async fn empty_stats_body_is_none() {
    let router = Router::new().route("/stats", get(|| async { StatusCode::OK }));
    let base = serve(router).await;

    let client = ApiClient::new(base.as_str(), None).unwrap();
    assert_eq!(client.stats().await.unwrap(), serde_json::Value::Null);

    let (api, _) = dashboard(&base, ExecutionMode::Stub);
    assert!(api.stats.get_stats().await.is_none());
}

#[tokio::test]
async fn unreachable_backend_falls_back_everywhere() {
    let base = closed_port().await;
    let (api, sim) = dashboard(&base, ExecutionMode::Stub);

    assert!(api.status.get_status().await.is_simulated());
    assert_eq!(api.signals.get_technical_signals().await.value().signals.len(), 3);
    assert!(api.market.get_market_context().await.is_simulated());
    assert!(api.stats.get_stats().await.is_none());
    assert!(api.executor.execute_trade(&signal(), 250.0).await.is_none());

    let trades = sim.lock().await.total_trades();
    let ack = api.executor.force().await.unwrap();
    assert!(ack.is_simulated());

    let next = api.status.get_status().await.into_inner();
    assert_eq!(next.total_trades, trades + 1);
}

#[tokio::test]
async fn live_endpoints_round_trip() {
    let base = serve_backend().await;
    let (api, _) = dashboard(&base, ExecutionMode::Simulated);

    let signals = api.signals.get_technical_signals().await;
    assert_eq!(signals.source(), DataSource::Live);
    assert_eq!(signals.value().signals.len(), 3);

    let market = api.market.get_market_context().await;
    assert_eq!(market.source(), DataSource::Live);
    assert_eq!(market.value().len(), 5);

    let ack = api.executor.execute_trade(&signal(), 280.5).await.unwrap();
    assert_eq!(ack.source(), DataSource::Live);
    assert_eq!(ack.value()["success"], true);

    let forced = api.executor.force().await.unwrap();
    assert_eq!(forced.source(), DataSource::Live);

    let stats = api.stats.get_stats().await.unwrap();
    assert_eq!(stats["total_trades"], 16);
}
