use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    #[error("Network unreachable: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
