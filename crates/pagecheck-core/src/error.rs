use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid country code: {0}")]
    InvalidCountryCode(String),
    #[error("invalid national phone length: {0}")]
    InvalidNationalLength(usize),
    #[error("invalid record status: {0}")]
    InvalidStatus(String),
}
