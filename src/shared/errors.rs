//! Error handling for the application

use thiserror::Error;

/// Pool-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("Invalid token identity: {0}")]
    InvalidIdentity(String),

    #[error("No viable bump seed for pool {token_a}/{token_b}")]
    NoViableBump { token_a: String, token_b: String },

    #[error("Unknown account layout: {0}")]
    UnknownLayout(String),
}

/// Historical scan errors
#[derive(Error, Debug, Clone)]
pub enum ScanError {
    #[error("Failed after {attempts} retries: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },
}

/// User input validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Historical analysis requires --start and --end dates (YYYY-MM-DD)")]
    MissingDateBound,

    #[error("Invalid date format '{0}'. Use YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Start date {start} is after end date {end}")]
    InvertedRange { start: String, end: String },

    #[error("Select a mode: --live and/or --history")]
    NoModeSelected,
}

/// General application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Blockchain error: {0}")]
    BlockchainError(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Pool(#[from] PoolError),
}
