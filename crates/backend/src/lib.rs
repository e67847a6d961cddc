//! Simulation backend for the trading dashboard.
//!
//! Serves the dashboard API (`/status`, `/market_context`, `/execute_trade`,
//! `/test_technical`, `/force`, `/stats`) from an in-memory simulation so the
//! client can run end-to-end without a trading engine behind it.

pub mod config;
pub mod handlers;
pub mod server;
pub mod state;

pub use config::BackendConfig;
pub use server::BackendServer;
pub use state::BackendState;
