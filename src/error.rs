use thiserror::Error;

pub type Result<T> = std::result::Result<T, OrgPulseError>;

#[derive(Error, Debug)]
pub enum OrgPulseError {
    #[error("request to {endpoint} failed with status {status}: {body}")]
    Fetch {
        endpoint: String,
        status: u16,
        body: String,
    },
    #[error("request to {endpoint} timed out")]
    Timeout { endpoint: String },
    #[error("run deadline of {limit_secs}s exceeded")]
    DeadlineExceeded { limit_secs: u64 },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Parse error: {0}")]
    Parse(String),
}
