use thiserror::Error;

/// Coarse classification used for logging and for deciding whether a
/// failure may be replaced by simulated data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Format,
    Logic,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server answered HTTP {0}")]
    Status(u16),
    #[error("received non-JSON response from server (content type {0:?})")]
    NotJson(String),
    #[error("failed to parse JSON response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("server rejected the request: {0}")]
    Logic(String),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) | Self::Status(_) => ErrorKind::Transport,
            Self::NotJson(_) | Self::Parse(_) => ErrorKind::Format,
            Self::Logic(_) => ErrorKind::Logic,
        }
    }

    /// Transport and format failures are absorbed by the providers.
    pub fn is_recoverable(&self) -> bool {
        self.kind() != ErrorKind::Logic
    }
}
