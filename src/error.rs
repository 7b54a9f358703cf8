//! Error types for the ledger core and its CSV driver.

use crate::money::Money;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, BankError>;

/// Errors that can occur while operating on accounts.
#[derive(Error, Debug)]
pub enum BankError {
    /// Structurally invalid input: blank identifier, self-transfer
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Amount missing, negative, or not strictly positive where required
    #[error("Invalid amount: {message}")]
    InvalidAmount { message: String },

    /// Debit exceeds the current balance
    #[error("Insufficient funds in account {account}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        account: String,
        balance: Money,
        requested: Money,
    },

    /// Account lock not acquired within the configured wait
    #[error("Account {account} busy: lock not acquired within {waited:?}")]
    Busy { account: String, waited: Duration },

    /// Decimal arithmetic overflowed
    #[error("Arithmetic overflow on account {account}")]
    Overflow { account: String },

    /// No account registered under this id
    #[error("Account {id} not found")]
    AccountNotFound { id: String },

    /// An account with this id is already registered
    #[error("Account {id} already exists")]
    DuplicateAccount { id: String },

    /// Failed to open or read the input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),
}

impl BankError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        BankError::InvalidArgument {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_amount(message: impl Into<String>) -> Self {
        BankError::InvalidAmount {
            message: message.into(),
        }
    }

    /// Returns `true` for business rejections a caller may surface or retry
    /// with corrected input. Account state is untouched in every such case.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            BankError::InvalidArgument { .. }
                | BankError::InvalidAmount { .. }
                | BankError::InsufficientFunds { .. }
                | BankError::Busy { .. }
                | BankError::Overflow { .. }
                | BankError::AccountNotFound { .. }
                | BankError::DuplicateAccount { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_insufficient_funds_message_carries_diagnostics() {
        let err = BankError::InsufficientFunds {
            account: "ACC-1".to_string(),
            balance: Money::from_str("5").unwrap(),
            requested: Money::from_str("7.5").unwrap(),
        };

        assert_eq!(
            err.to_string(),
            "Insufficient funds in account ACC-1: balance 5.00, requested 7.50"
        );
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_driver_errors_are_not_recoverable() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(!BankError::from(io).is_recoverable());
    }
}
