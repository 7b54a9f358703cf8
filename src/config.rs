//! Command line and environment configuration for the CLI.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable consulted when `--lock-timeout-ms` is not given.
pub const LOCK_TIMEOUT_ENV: &str = "BANK_LOCK_TIMEOUT_MS";

/// Replays account operations from a CSV file and prints final balances.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "bank-ledger", version)]
#[command(about = "Replays account operations from a CSV file and prints final balances")]
pub struct Config {
    /// CSV file of operations to replay
    #[arg(value_name = "OPERATIONS_CSV")]
    pub input: PathBuf,

    /// Bounded wait for account locks in milliseconds; waits indefinitely when unset
    #[arg(long, value_name = "MS", env = LOCK_TIMEOUT_ENV)]
    pub lock_timeout_ms: Option<u64>,
}

impl Config {
    /// Lock wait to apply to every account; `None` blocks until available.
    pub fn lock_timeout(&self) -> Option<Duration> {
        self.lock_timeout_ms.map(Duration::from_millis)
    }
}
