//! Terminal trading dashboard: polls the trading API, falls back to a local
//! simulation when it is unreachable, and renders the result on stdout.

pub mod actors;
pub mod services;
