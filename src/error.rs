use reqwest::StatusCode;
use thiserror::Error;

pub use anyhow::Context;

pub type Result<T> = std::result::Result<T, QuoteError>;

#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("provider returned status {status} for {url}")]
    Http { status: StatusCode, url: String },
    #[error("malformed JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed CSV payload: {0}")]
    Csv(#[from] csv::Error),
    #[error("provider reported error {code}: {description}")]
    Provider { code: String, description: String },
    #[error("provider returned no result for {ticker}")]
    EmptyResult { ticker: String },
    #[error("`{field}` has {found} entries but `timestamp` has {expected}")]
    ArrayAlignment {
        field: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("invalid ticker `{0}`")]
    InvalidTicker(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Join(#[from] tokio::task::JoinError),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Coarse classification of a [`QuoteError`], stable across payload details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Http,
    Decode,
    EmptyResult,
    ArrayAlignment,
    Provider,
    InvalidInput,
    Config,
    Internal,
}

impl QuoteError {
    pub fn message<T: Into<String>>(msg: T) -> Self {
        QuoteError::Message(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        QuoteError::Config(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            QuoteError::Network(_) => ErrorKind::Network,
            QuoteError::Http { .. } => ErrorKind::Http,
            QuoteError::Json(_) | QuoteError::Csv(_) => ErrorKind::Decode,
            QuoteError::Provider { .. } => ErrorKind::Provider,
            QuoteError::EmptyResult { .. } => ErrorKind::EmptyResult,
            QuoteError::ArrayAlignment { .. } => ErrorKind::ArrayAlignment,
            QuoteError::InvalidTicker(_) | QuoteError::InvalidInput(_) => ErrorKind::InvalidInput,
            QuoteError::Config(_) => ErrorKind::Config,
            QuoteError::Io(_)
            | QuoteError::Join(_)
            | QuoteError::Message(_)
            | QuoteError::Other(_) => ErrorKind::Internal,
        }
    }
}
