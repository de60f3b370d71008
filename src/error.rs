use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Secret unavailable: {0}")]
    SecretUnavailable(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Summarization error: {0}")]
    Summarization(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Feed(#[from] feed_rs::parser::ParseFeedError),

    #[error(transparent)]
    Database(#[from] tokio_rusqlite::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
