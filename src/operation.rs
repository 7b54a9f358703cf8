//! Operation models for CSV parsing and internal representation.

use crate::error::{BankError, Result};
use crate::money::Money;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

/// Raw operation record as read from CSV.
///
/// Columns: `op,account,target,amount`. `target` is only used by transfers and
/// `amount` may be left empty for `open`.
#[derive(Debug, Deserialize)]
pub struct OperationRecord {
    /// Operation type: open, deposit, withdraw, transfer
    pub op: String,

    /// Account the operation applies to (the source for transfers)
    pub account: String,

    /// Destination account for transfers
    #[serde(default)]
    pub target: Option<String>,

    /// Decimal amount as text
    #[serde(default)]
    pub amount: Option<String>,
}

impl OperationRecord {
    /// Parses the raw CSV record into a typed operation.
    ///
    /// Amounts are validated here: `open` accepts zero, every other operation
    /// requires a strictly positive amount.
    pub fn parse(&self) -> Result<Operation> {
        let op = self.op.trim().to_lowercase();
        let account = self.account.trim().to_string();

        match op.as_str() {
            "open" => {
                let initial = match self.raw_amount() {
                    None => Money::ZERO,
                    Some(_) => Money::non_negative(self.parse_amount()?)?,
                };
                Ok(Operation::Open { account, initial })
            }
            "deposit" => Ok(Operation::Deposit {
                account,
                amount: Money::positive(self.parse_amount()?)?,
            }),
            "withdraw" | "withdrawal" => Ok(Operation::Withdraw {
                account,
                amount: Money::positive(self.parse_amount()?)?,
            }),
            "transfer" => {
                let target = self
                    .target
                    .as_deref()
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .ok_or_else(|| BankError::invalid_argument("transfer requires a target"))?;
                Ok(Operation::Transfer {
                    from: account,
                    to: target.to_string(),
                    amount: Money::positive(self.parse_amount()?)?,
                })
            }
            other => Err(BankError::invalid_argument(format!(
                "unknown operation '{}'",
                other
            ))),
        }
    }

    fn raw_amount(&self) -> Option<&str> {
        self.amount
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Parses the amount field. An empty field is `None`; malformed text is
    /// `InvalidAmount`.
    fn parse_amount(&self) -> Result<Option<Decimal>> {
        match self.raw_amount() {
            None => Ok(None),
            Some(text) => Decimal::from_str(text).map(Some).map_err(|e| {
                BankError::invalid_amount(format!("'{}' is not a decimal: {}", text, e))
            }),
        }
    }
}

/// A parsed and validated operation ready to run against a registry.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Register a new account with an opening balance.
    Open { account: String, initial: Money },

    /// Credit funds to an account.
    Deposit { account: String, amount: Money },

    /// Debit funds from an account (if the balance covers it).
    Withdraw { account: String, amount: Money },

    /// Move funds between two accounts atomically.
    Transfer {
        from: String,
        to: String,
        amount: Money,
    },
}
