//! Error handling for the application

use thiserror::Error;

/// Display amount could not be converted to integer token units
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AmountError {
    #[error("Amount is empty")]
    Empty,

    #[error("Invalid amount: {0}")]
    NotANumber(String),

    #[error("Amount must not be negative: {0}")]
    Negative(String),
}

/// Backend canister errors (transport and decoding, not the canister's own `Err` replies)
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Agent error: {0}")]
    Agent(String),

    #[error("Candid error: {0}")]
    Candid(String),

    #[error("Invalid canister id: {0}")]
    InvalidCanisterId(String),

    #[error("Amount does not fit into nat64: {0}")]
    AmountOutOfRange(String),
}

impl From<ic_agent::AgentError> for BackendError {
    fn from(err: ic_agent::AgentError) -> Self {
        BackendError::Agent(err.to_string())
    }
}

impl From<candid::Error> for BackendError {
    fn from(err: candid::Error) -> Self {
        BackendError::Candid(err.to_string())
    }
}

/// Swap store errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("use_swap_store must be used within a SwapStore provider")]
    OutsideProvider,
}

/// General application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Backend error: {0}")]
    BackendError(String),

    #[error("Amount error: {0}")]
    AmountError(String),

    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Unknown token: {0}")]
    UnknownToken(String),

    #[error("Swap failed: {0}")]
    SwapFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(String),
}

impl From<AmountError> for AppError {
    fn from(err: AmountError) -> Self {
        AppError::AmountError(err.to_string())
    }
}

impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        AppError::BackendError(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::StoreError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}
