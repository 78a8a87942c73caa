use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Forward error: {0}")]
    Forward(#[from] ForwardError),

    #[error("Server error: {0}")]
    Server(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Environment variable error: {0}")]
    EnvVar(String),

    #[error("Invalid origin '{value}': {reason}")]
    InvalidOrigin { value: String, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid_origin(value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidOrigin {
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ForwardError {
    #[error("Upstream request failed: {0}")]
    Upstream(String),

    #[error("Upstream request timed out")]
    Timeout,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<reqwest::Error> for ForwardError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ForwardError::Timeout
        } else {
            ForwardError::Upstream(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;

impl warp::reject::Reject for GatewayError {}
