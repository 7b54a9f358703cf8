//! Transfer coordination across accounts.
//!
//! Whenever more than one account lock is needed, locks are acquired in
//! ascending lexicographic order of account id, whatever role each account
//! plays in the operation. Every caller agrees on that order, so no two
//! operations can each hold a lock the other is waiting on.

use crate::account::Account;
use crate::error::{BankError, Result};
use crate::money::Money;
use log::debug;
use parking_lot::MutexGuard;

/// Moves `amount` from `source` to `destination` as a single atomic step.
///
/// Preconditions are checked before any lock is taken:
/// - `source` and `destination` must have different ids (`InvalidArgument`)
/// - `amount` must be greater than zero (`InvalidAmount`)
///
/// With both locks held, the source balance is checked again and the transfer
/// fails with `InsufficientFunds` if it does not cover `amount`. On success
/// the source is debited and the destination credited before either lock is
/// released, so other threads observe both balances before or both after.
/// On any failure neither balance changes.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use bank_ledger::{transfer, Account, Money};
///
/// let alice = Account::with_balance("alice", Money::from_str("100").unwrap()).unwrap();
/// let bob = Account::new("bob").unwrap();
///
/// transfer(&alice, &bob, Money::from_str("40.50").unwrap()).unwrap();
/// assert_eq!(alice.balance().to_string(), "59.50");
/// assert_eq!(bob.balance().to_string(), "40.50");
/// ```
pub fn transfer(source: &Account, destination: &Account, amount: Money) -> Result<()> {
    if source.id() == destination.id() {
        return Err(BankError::invalid_argument("cannot transfer to self"));
    }
    amount.ensure_positive()?;

    let [mut source_balance, mut destination_balance]: [MutexGuard<'_, Money>; 2] =
        lock_in_order(&[source, destination])?
            .try_into()
            .map_err(|_| BankError::invalid_argument("expected one lock per account"))?;

    // Both results are computed before either is stored
    let debited = source.debited(*source_balance, amount)?;
    let credited = destination.credited(*destination_balance, amount)?;
    *source_balance = debited;
    *destination_balance = credited;

    debug!(
        "Transferred {} from {} to {}, balances {} / {}",
        amount,
        source.id(),
        destination.id(),
        debited,
        credited
    );
    Ok(())
}

/// Reads the balances of several accounts at one consistent point in time.
///
/// Balances are returned in the order the accounts were given. All locks are
/// held together, so a concurrent transfer between any of these accounts is
/// seen either entirely or not at all.
pub fn snapshot(accounts: &[&Account]) -> Result<Vec<Money>> {
    let guards = lock_in_order(accounts)?;
    Ok(guards.iter().map(|balance| **balance).collect())
}

/// Acquires the balance locks of `accounts` sorted by id.
///
/// Guards come back in the order of the input slice. Duplicate ids are
/// rejected with `InvalidArgument` before any lock is taken, since locking
/// the same account twice would self-deadlock. If an acquisition fails the
/// locks already taken are released on return.
pub(crate) fn lock_in_order<'a>(
    accounts: &[&'a Account],
) -> Result<Vec<MutexGuard<'a, Money>>> {
    let mut order: Vec<usize> = (0..accounts.len()).collect();
    order.sort_by(|&a, &b| accounts[a].id().cmp(accounts[b].id()));

    if let Some(pair) = order
        .windows(2)
        .find(|pair| accounts[pair[0]].id() == accounts[pair[1]].id())
    {
        return Err(BankError::invalid_argument(format!(
            "account {} listed more than once",
            accounts[pair[0]].id()
        )));
    }

    let mut slots: Vec<Option<MutexGuard<'a, Money>>> =
        accounts.iter().map(|_| None).collect();
    for index in order {
        slots[index] = Some(accounts[index].lock_balance()?);
    }

    Ok(slots.into_iter().flatten().collect())
}
