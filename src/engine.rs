//! Batch driver that replays CSV operations against an account registry.
//!
//! Operations are applied in the order they are read. A rejected operation is
//! logged and skipped; it never stops the run and never changes any balance.

use crate::error::{BankError, Result};
use crate::money::Money;
use crate::operation::{Operation, OperationRecord};
use crate::registry::AccountRegistry;
use csv::{ReaderBuilder, Trim, WriterBuilder};
use log::{debug, warn};
use serde::Serialize;
use std::io::{Read, Write};
use std::time::Duration;

/// One line of the final balance report.
#[derive(Debug, Serialize)]
struct BalanceRow<'a> {
    account: &'a str,
    balance: Money,
}

/// Replays operations into an [`AccountRegistry`] and reports final balances.
///
/// # Output Ordering
///
/// Final balances are written sorted by account id so output is
/// deterministic.
#[derive(Debug, Default)]
pub struct LedgerEngine {
    registry: AccountRegistry,
    rejected: usize,
}

impl LedgerEngine {
    /// Creates an engine whose account locks block until available.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine whose accounts fail with `Busy` after waiting
    /// `lock_timeout` for a lock.
    pub fn with_lock_timeout(lock_timeout: Option<Duration>) -> Self {
        LedgerEngine {
            registry: AccountRegistry::with_lock_timeout(lock_timeout),
            rejected: 0,
        }
    }

    /// The registry holding every account seen so far.
    pub fn registry(&self) -> &AccountRegistry {
        &self.registry
    }

    /// Number of rows rejected so far.
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    /// Processes operations from a CSV reader in streaming fashion.
    ///
    /// Records are read one at a time. Malformed and rejected rows are logged
    /// at warn level and skipped.
    pub fn process_csv<R: Read>(&mut self, reader: R) -> Result<()> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        for (row_idx, result) in csv_reader.deserialize::<OperationRecord>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row

            let outcome = result
                .map_err(BankError::from)
                .and_then(|record| record.parse())
                .and_then(|operation| self.apply(operation, row_num));

            if let Err(e) = outcome {
                self.rejected += 1;
                warn!("Row {}: {}", row_num, e);
            }
        }

        Ok(())
    }

    /// Applies one operation to the registry.
    pub fn apply(&self, operation: Operation, row: usize) -> Result<()> {
        match operation {
            Operation::Open { account, initial } => {
                self.registry.open(&account, initial)?;
            }
            Operation::Deposit { account, amount } => {
                self.registry.deposit(&account, amount)?;
                debug!("Row {}: Deposited {} to {}", row, amount, account);
            }
            Operation::Withdraw { account, amount } => {
                self.registry.withdraw(&account, amount)?;
                debug!("Row {}: Withdrew {} from {}", row, amount, account);
            }
            Operation::Transfer { from, to, amount } => {
                self.registry.transfer(&from, &to, amount)?;
                debug!("Row {}: Transferred {} from {} to {}", row, amount, from, to);
            }
        }

        Ok(())
    }

    /// Writes final balances to CSV.
    ///
    /// Output is sorted by account id. Balances always carry 2 decimal places.
    pub fn write_output<W: Write>(&self, writer: W) -> Result<()> {
        // Header is written by hand so an empty ledger still gets one
        let mut csv_writer = WriterBuilder::new().has_headers(false).from_writer(writer);

        csv_writer.write_record(["account", "balance"])?;

        for (account, balance) in self.registry.balances()? {
            csv_writer.serialize(BalanceRow {
                account: &account,
                balance,
            })?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}
