pub mod client;
pub mod error;
pub mod fetched;
pub mod services;
pub mod traits;

pub use client::ApiClient;
pub use error::{ApiError, ErrorKind};
pub use fetched::{DataSource, Fetched};
pub use services::DashboardApi;
pub use traits::TradingApi;
