//! # Bank Ledger
//!
//! In-memory accounts shared between threads, with atomic transfers and
//! exact 2-decimal money.
//!
//! ## Design Principles
//!
//! - **Fixed-point arithmetic**: 2 decimal places via `rust_decimal`, rounded
//!   half-to-even after every operation
//! - **Per-account locking**: each balance sits behind its own mutex; unrelated
//!   accounts never contend
//! - **Ordered lock acquisition**: multi-account operations lock in ascending
//!   id order, so transfers in opposite directions cannot deadlock
//! - **No partial effects**: validation precedes mutation and a transfer holds
//!   both locks for its whole debit and credit
//!
//! ## Example
//!
//! ```
//! use std::str::FromStr;
//! use std::sync::Arc;
//! use std::thread;
//! use bank_ledger::{Account, Money};
//!
//! let a = Arc::new(Account::with_balance("A", Money::from_str("100").unwrap()).unwrap());
//! let b = Arc::new(Account::with_balance("B", Money::from_str("100").unwrap()).unwrap());
//!
//! let handles: Vec<_> = (0..4)
//!     .map(|i| {
//!         let (a, b) = (Arc::clone(&a), Arc::clone(&b));
//!         thread::spawn(move || {
//!             let one = Money::from_str("1").unwrap();
//!             if i % 2 == 0 {
//!                 a.transfer_to(&b, one).unwrap();
//!             } else {
//!                 b.transfer_to(&a, one).unwrap();
//!             }
//!         })
//!     })
//!     .collect();
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//!
//! let total = a.balance().checked_add(b.balance()).unwrap();
//! assert_eq!(total.to_string(), "200.00");
//! ```

pub mod account;
pub mod config;
pub mod engine;
pub mod error;
pub mod money;
pub mod operation;
pub mod registry;
pub mod transfer;

pub use account::Account;
pub use config::Config;
pub use engine::LedgerEngine;
pub use error::{BankError, Result};
pub use money::Money;
pub use operation::{Operation, OperationRecord};
pub use registry::AccountRegistry;
pub use transfer::{snapshot, transfer};
