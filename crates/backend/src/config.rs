use common::config::{ConfigError, env_opt, env_or};

/// Backend server configuration
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Seed for the simulation generator
    pub seed: Option<u64>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            seed: None,
        }
    }
}

impl BackendConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            host: env_or("BACKEND_HOST", defaults.host)?,
            port: env_or("BACKEND_PORT", defaults.port)?,
            seed: env_opt("BACKEND_SEED")?,
        })
    }
}
