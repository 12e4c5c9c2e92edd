//! Rust Settlement Engine CLI
//!
//! Reads a multi-group ledger CSV and prints settlements or balances per group.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- ledger.csv > settlements.csv
//! cargo run -- --mode simplified ledger.csv > settlements.csv
//! cargo run -- --report balances ledger.csv > balances.csv
//! cargo run -- --strategy async --batch-size 2000 --max-concurrent 8 ledger.csv
//! ```
//!
//! Logs go to stderr. `RUST_LOG` overrides the level; `-v` raises the default
//! from `warn` to `debug`.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, file not found, file not readable, etc.)

use rust_settlement_engine::cli;
use rust_settlement_engine::strategy;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = cli::parse_args();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy, config, args.to_report_options())
    };

    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&args.input_file, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
