//! Bank Ledger CLI
//!
//! Replays account operations from a CSV file and prints final balances.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- operations.csv > balances.csv
//! cargo run -- --lock-timeout-ms 500 operations.csv
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity
//! - `BANK_LOCK_TIMEOUT_MS`: Bounded lock wait when the flag is not given
//!
//! Argument errors are reported by clap with exit code 2; failures while
//! reading or replaying the file print `Error: ...` and exit with code 1.

use bank_ledger::{Config, LedgerEngine, Result};
use clap::Parser;
use log::info;
use std::fs::File;
use std::io::{self, BufReader};
use std::process;

fn main() {
    env_logger::init();
    let config = Config::parse();

    if let Err(e) = run(&config) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(config: &Config) -> Result<()> {
    let file = File::open(&config.input)?;
    let reader = BufReader::new(file);

    let mut engine = LedgerEngine::with_lock_timeout(config.lock_timeout());
    engine.process_csv(reader)?;
    info!(
        "Processed {}: {} accounts, {} rejected rows",
        config.input.display(),
        engine.registry().len(),
        engine.rejected()
    );

    let stdout = io::stdout();
    let handle = stdout.lock();
    engine.write_output(handle)?;

    Ok(())
}
