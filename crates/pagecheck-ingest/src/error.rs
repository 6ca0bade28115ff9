use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unavailable: {0}")]
    Unavailable(String),
    #[cfg(feature = "http-translate")]
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[cfg(feature = "http-translate")]
    #[error("url error: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, IngestError>;
