use thiserror::Error;

/// Errors that can occur while talking to the recipe search service
#[derive(Error, Debug)]
pub enum ApiError {
    /// No response reached us (connection refused, DNS, TLS, timeout, truncated body)
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-2xx status
    #[error("Service returned HTTP {status}")]
    Http { status: u16 },

    /// The response body doesn't match the expected JSON shape
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    Builder(String),
}

impl ApiError {
    /// HTTP status for `Http` errors, `None` for everything else
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status } => Some(*status),
            _ => None,
        }
    }
}
