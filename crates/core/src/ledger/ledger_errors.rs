use thiserror::Error;

/// Errors raised by ledger models and repositories.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Invalid ledger data: {0}")]
    InvalidData(String),

    #[error("Transaction not found: {0}")]
    NotFound(String),

    #[error("Unknown account type: {0}")]
    InvalidAccountType(String),
}
