//! Shared registry of live accounts keyed by id.
//!
//! The registry is the single place accounts are created, which keeps the
//! one-live-account-per-id rule that transfer lock ordering depends on.

use crate::account::Account;
use crate::error::{BankError, Result};
use crate::money::Money;
use crate::transfer;
use log::{debug, info};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Thread-safe set of accounts shared between callers.
///
/// The map lock is only held to look accounts up or insert them; balance
/// operations run on the account's own lock after the map lock is released,
/// so operations on unrelated accounts proceed in parallel.
#[derive(Debug, Default)]
pub struct AccountRegistry {
    accounts: RwLock<HashMap<String, Arc<Account>>>,
    lock_timeout: Option<Duration>,
}

impl AccountRegistry {
    /// Creates an empty registry whose accounts wait on their locks forever.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry whose accounts give up on a lock after
    /// `lock_timeout` with `Busy`.
    pub fn with_lock_timeout(lock_timeout: Option<Duration>) -> Self {
        AccountRegistry {
            accounts: RwLock::new(HashMap::new()),
            lock_timeout,
        }
    }

    /// Opens a new account. Fails with `DuplicateAccount` if the id is taken.
    pub fn open(&self, id: &str, initial: Money) -> Result<Arc<Account>> {
        let account = Arc::new(self.build(id, initial)?);

        let mut accounts = self.accounts.write();
        if accounts.contains_key(id) {
            return Err(BankError::DuplicateAccount { id: id.to_string() });
        }
        accounts.insert(id.to_string(), Arc::clone(&account));

        info!("Opened account {} with balance {}", id, initial);
        Ok(account)
    }

    /// Looks an account up by id.
    pub fn get(&self, id: &str) -> Option<Arc<Account>> {
        self.accounts.read().get(id).cloned()
    }

    /// Returns the account for `id`, opening it with a zero balance if absent.
    pub fn get_or_open(&self, id: &str) -> Result<Arc<Account>> {
        if let Some(account) = self.get(id) {
            return Ok(account);
        }

        let mut accounts = self.accounts.write();
        // Another caller may have opened it between the read and write lock
        if let Some(account) = accounts.get(id) {
            return Ok(Arc::clone(account));
        }
        let account = Arc::new(self.build(id, Money::ZERO)?);
        accounts.insert(id.to_string(), Arc::clone(&account));

        debug!("Opened account {} on first use", id);
        Ok(account)
    }

    /// Deposits into the account registered under `id`.
    pub fn deposit(&self, id: &str, amount: Money) -> Result<()> {
        self.require(id)?.deposit(amount)
    }

    /// Withdraws from the account registered under `id`.
    pub fn withdraw(&self, id: &str, amount: Money) -> Result<()> {
        self.require(id)?.withdraw(amount)
    }

    /// Transfers between two registered accounts.
    pub fn transfer(&self, from: &str, to: &str, amount: Money) -> Result<()> {
        let source = self.require(from)?;
        let destination = self.require(to)?;
        transfer::transfer(&source, &destination, amount)
    }

    /// Returns every account's balance sorted by id.
    ///
    /// All balances are read under one ordered acquisition, so the totals are
    /// consistent even while transfers are running.
    pub fn balances(&self) -> Result<Vec<(String, Money)>> {
        let mut accounts: Vec<Arc<Account>> = self.accounts.read().values().cloned().collect();
        accounts.sort_by(|a, b| a.id().cmp(b.id()));

        let refs: Vec<&Account> = accounts.iter().map(Arc::as_ref).collect();
        let balances = transfer::snapshot(&refs)?;

        Ok(accounts
            .iter()
            .map(|account| account.id().to_string())
            .zip(balances)
            .collect())
    }

    /// Number of registered accounts.
    pub fn len(&self) -> usize {
        self.accounts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.read().is_empty()
    }

    fn build(&self, id: &str, initial: Money) -> Result<Account> {
        let account = Account::with_balance(id, initial)?;
        Ok(match self.lock_timeout {
            Some(timeout) => account.with_lock_timeout(timeout),
            None => account,
        })
    }

    fn require(&self, id: &str) -> Result<Arc<Account>> {
        self.get(id)
            .ok_or_else(|| BankError::AccountNotFound { id: id.to_string() })
    }
}
