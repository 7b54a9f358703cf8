//! Account model with an internally synchronized balance.
//!
//! Each account owns one exclusive lock over its balance. Reads and
//! single-account mutations take only that lock; transfers take two, in the
//! order defined by [`crate::transfer`].

use crate::error::{BankError, Result};
use crate::money::Money;
use crate::transfer;
use log::debug;
use parking_lot::{Mutex, MutexGuard};
use rust_decimal::Decimal;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::time::Duration;

/// A uniquely identified holder of a [`Money`] balance.
///
/// Accounts are shared between threads by reference (typically through an
/// `Arc<Account>`); every method takes `&self` and synchronizes internally.
///
/// # Invariants
///
/// - `id` is non-blank and never changes
/// - the balance is never negative after a completed operation
/// - equality and hashing consider `id` only, never the balance
///
/// Two separately constructed accounts with the same id compare equal but
/// hold separate locks. Use [`crate::AccountRegistry`] to keep one live
/// account per id.
pub struct Account {
    id: String,
    balance: Mutex<Money>,
    lock_timeout: Option<Duration>,
}

impl Account {
    /// Opens an account with a zero balance.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        Self::with_balance(id, Money::ZERO)
    }

    /// Opens an account with the given non-negative initial balance.
    ///
    /// Fails with `InvalidArgument` for a blank id and `InvalidAmount` for a
    /// negative balance. No account is created on failure.
    pub fn with_balance(id: impl Into<String>, initial: Money) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(BankError::invalid_argument("account id must not be empty"));
        }
        if initial.is_negative() {
            return Err(BankError::invalid_amount(format!(
                "initial balance must not be negative, got {}",
                initial
            )));
        }

        Ok(Account {
            id,
            balance: Mutex::new(initial),
            lock_timeout: None,
        })
    }

    /// Opens an account from an unrounded opening balance.
    ///
    /// The sign is checked before rounding, so `-0.004` fails with
    /// `InvalidAmount` rather than opening at `0.00`.
    pub fn from_decimal(id: impl Into<String>, initial: Decimal) -> Result<Self> {
        let id = id.into();
        let initial = Money::non_negative(Some(initial))?;
        Self::with_balance(id, initial)
    }

    /// Bounds how long mutating operations wait for this account's lock.
    /// Past the bound they fail with `Busy` and change nothing.
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = Some(timeout);
        self
    }

    /// Returns the immutable account identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn lock_timeout(&self) -> Option<Duration> {
        self.lock_timeout
    }

    /// Returns a copy of the current balance.
    ///
    /// Always blocks until the lock is available, regardless of any
    /// configured lock timeout.
    pub fn balance(&self) -> Money {
        *self.balance.lock()
    }

    /// Credits `amount` to the account.
    ///
    /// Fails with `InvalidAmount` unless `amount > 0`.
    pub fn deposit(&self, amount: Money) -> Result<()> {
        amount.ensure_positive()?;

        let mut balance = self.lock_balance()?;
        *balance = self.credited(*balance, amount)?;
        debug!(
            "Deposited {} to account {}, balance {}",
            amount, self.id, *balance
        );
        Ok(())
    }

    /// Debits `amount` from the account.
    ///
    /// Fails with `InvalidAmount` unless `amount > 0`, and with
    /// `InsufficientFunds` if the balance is lower than `amount`.
    pub fn withdraw(&self, amount: Money) -> Result<()> {
        amount.ensure_positive()?;

        let mut balance = self.lock_balance()?;
        *balance = self.debited(*balance, amount)?;
        debug!(
            "Withdrew {} from account {}, balance {}",
            amount, self.id, *balance
        );
        Ok(())
    }

    /// Moves `amount` from this account to `target` atomically.
    ///
    /// See [`transfer::transfer`].
    pub fn transfer_to(&self, target: &Account, amount: Money) -> Result<()> {
        transfer::transfer(self, target, amount)
    }

    /// Acquires the balance lock, honouring the configured timeout.
    pub(crate) fn lock_balance(&self) -> Result<MutexGuard<'_, Money>> {
        match self.lock_timeout {
            None => Ok(self.balance.lock()),
            Some(timeout) => self
                .balance
                .try_lock_for(timeout)
                .ok_or_else(|| BankError::Busy {
                    account: self.id.clone(),
                    waited: timeout,
                }),
        }
    }

    /// Computes the balance after crediting `amount`, without storing it.
    pub(crate) fn credited(&self, current: Money, amount: Money) -> Result<Money> {
        current.checked_add(amount).ok_or_else(|| BankError::Overflow {
            account: self.id.clone(),
        })
    }

    /// Computes the balance after debiting `amount`, without storing it.
    pub(crate) fn debited(&self, current: Money, amount: Money) -> Result<Money> {
        if current < amount {
            return Err(BankError::InsufficientFunds {
                account: self.id.clone(),
                balance: current,
                requested: amount,
            });
        }
        current.checked_sub(amount).ok_or_else(|| BankError::Overflow {
            account: self.id.clone(),
        })
    }
}

impl PartialEq for Account {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Account {}

impl Hash for Account {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Account{{id={}, balance={}}}", self.id, self.balance())
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Account");
        debug.field("id", &self.id);
        // Never block inside a formatter; the caller may hold the lock.
        match self.balance.try_lock() {
            Some(balance) => debug.field("balance", &*balance),
            None => debug.field("balance", &format_args!("<locked>")),
        };
        debug.field("lock_timeout", &self.lock_timeout).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::str::FromStr;

    fn money(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    #[test]
    fn test_new_account_has_zero_balance() {
        let account = Account::new("ACC-1").unwrap();
        assert_eq!(account.id(), "ACC-1");
        assert_eq!(account.balance().to_string(), "0.00");
        assert_eq!(account.lock_timeout(), None);
    }

    #[test]
    fn test_initial_balance_is_normalized() {
        let account = Account::with_balance("ACC-1", money("100.125")).unwrap();
        assert_eq!(account.balance().to_string(), "100.12");
    }

    #[test]
    fn test_blank_id_rejected() {
        assert!(matches!(
            Account::new(""),
            Err(BankError::InvalidArgument { .. })
        ));
        assert!(matches!(
            Account::new("   "),
            Err(BankError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_negative_initial_balance_rejected() {
        assert!(matches!(
            Account::with_balance("ACC-1", money("-0.01")),
            Err(BankError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_from_decimal_rejects_tiny_negative() {
        let err = Account::from_decimal("ACC-1", Decimal::from_str("-0.004").unwrap());
        assert!(matches!(err, Err(BankError::InvalidAmount { .. })));

        let account = Account::from_decimal("ACC-1", Decimal::from_str("0.015").unwrap()).unwrap();
        assert_eq!(account.balance().to_string(), "0.02");
    }

    #[test]
    fn test_deposit_increases_balance() {
        let account = Account::new("ACC-1").unwrap();
        account.deposit(money("10.5")).unwrap();
        account.deposit(money("0.25")).unwrap();

        assert_eq!(account.balance().to_string(), "10.75");
    }

    #[test]
    fn test_deposit_rejects_non_positive_amount() {
        let account = Account::with_balance("ACC-1", money("5")).unwrap();

        assert!(matches!(
            account.deposit(Money::ZERO),
            Err(BankError::InvalidAmount { .. })
        ));
        assert!(matches!(
            account.deposit(money("-1")),
            Err(BankError::InvalidAmount { .. })
        ));
        assert_eq!(account.balance().to_string(), "5.00");
    }

    #[test]
    fn test_withdraw_decreases_balance() {
        let account = Account::with_balance("ACC-1", money("10")).unwrap();
        account.withdraw(money("3.5")).unwrap();

        assert_eq!(account.balance().to_string(), "6.50");
    }

    #[test]
    fn test_withdraw_exact_balance_leaves_zero() {
        let account = Account::with_balance("ACC-1", money("10")).unwrap();
        account.withdraw(money("10")).unwrap();

        assert_eq!(account.balance().to_string(), "0.00");
    }

    #[test]
    fn test_withdraw_insufficient_funds_reports_context() {
        let account = Account::with_balance("ACC-1", money("10")).unwrap();
        let err = account.withdraw(money("10.01")).unwrap_err();

        match err {
            BankError::InsufficientFunds {
                account: id,
                balance,
                requested,
            } => {
                assert_eq!(id, "ACC-1");
                assert_eq!(balance.to_string(), "10.00");
                assert_eq!(requested.to_string(), "10.01");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(account.balance().to_string(), "10.00");
    }

    #[test]
    fn test_withdraw_rejects_non_positive_amount() {
        let account = Account::with_balance("ACC-1", money("10")).unwrap();
        assert!(matches!(
            account.withdraw(Money::ZERO),
            Err(BankError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_deposit_past_max_reports_overflow() {
        let account = Account::with_balance("ACC-1", Money::MAX).unwrap();

        let err = account.deposit(money("0.01")).unwrap_err();

        assert!(matches!(err, BankError::Overflow { ref account } if account == "ACC-1"));
        assert_eq!(account.balance(), Money::MAX);
        assert_eq!(account.balance().as_decimal().scale(), 2);
    }

    #[test]
    fn test_equality_uses_id_only() {
        let a = Account::with_balance("ACC-1", money("1")).unwrap();
        let b = Account::with_balance("ACC-1", money("2")).unwrap();
        let c = Account::with_balance("ACC-2", money("1")).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<&Account> = [&a, &b, &c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_display_format() {
        let account = Account::with_balance("ACC-1", money("42.1")).unwrap();
        assert_eq!(account.to_string(), "Account{id=ACC-1, balance=42.10}");
    }

    #[test]
    fn test_lock_timeout_reports_busy() {
        let account = Account::with_balance("ACC-1", money("10"))
            .unwrap()
            .with_lock_timeout(Duration::from_millis(10));

        let held = account.balance.lock();
        let err = account.deposit(money("1")).unwrap_err();
        assert!(matches!(err, BankError::Busy { .. }));
        drop(held);

        assert_eq!(account.balance().to_string(), "10.00");
        account.deposit(money("1")).unwrap();
        assert_eq!(account.balance().to_string(), "11.00");
    }
}
