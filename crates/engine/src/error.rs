//! The module contains the errors the engine can throw.
//!
//! Every settlement rollback path guarantees that a returned
//! [`SettlementFailed`] left the stores in their pre-call state, so callers
//! may retry it safely.
//!
//! [`SettlementFailed`]: EngineError::SettlementFailed
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("\"{0}\" not found!")]
    NotFound(String),
    #[error("Already paid: {0}")]
    AlreadyPaid(String),
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),
    #[error("Settlement failed: {0}")]
    SettlementFailed(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::AlreadyPaid(a), Self::AlreadyPaid(b)) => a == b,
            (Self::InsufficientFunds(a), Self::InsufficientFunds(b)) => a == b,
            (Self::SettlementFailed(a), Self::SettlementFailed(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
