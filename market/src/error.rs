use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarketError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("unknown ticker: {0}")]
    UnknownTicker(String),
    #[error("insufficient data: {0}")]
    InsufficientData(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type MarketResult<T> = Result<T, MarketError>;
