use crate::core::engine::EngineConfig;
use crate::strategy::{BatchConfig, ReportOptions};
use crate::types::SettlementMode;
use clap::{Parser, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Settle shared-expense groups from a ledger CSV
#[derive(Parser, Debug)]
#[command(name = "settlement-engine")]
#[command(about = "Compute balances and settlements for shared-expense groups", long_about = None)]
pub struct CliArgs {
    /// Input ledger CSV file
    #[arg(value_name = "INPUT", help = "Path to the ledger CSV file")]
    pub input_file: PathBuf,

    /// Settlement mode applied to every group
    #[arg(
        long = "mode",
        value_name = "MODE",
        default_value_t = SettlementMode::Direct,
        help = "Settlement mode: 'direct' keeps pairwise debts, 'simplified' minimizes transfers"
    )]
    pub mode: SettlementMode,

    /// What to print for each group
    #[arg(long = "report", value_name = "REPORT", value_enum, default_value_t = ReportType::Settlements)]
    pub report: ReportType,

    /// Processing strategy
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        value_enum,
        default_value_t = StrategyType::Sync,
        help = "Processing strategy: 'sync' for single-threaded or 'async' for parallel groups"
    )]
    pub strategy: StrategyType,

    /// Noise threshold below which amounts are ignored
    #[arg(
        long = "threshold",
        value_name = "AMOUNT",
        help = "Amounts at or below this are treated as settled (default: 0.01)"
    )]
    pub threshold: Option<Decimal>,

    /// Ledger rows per read batch (async strategy only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Ledger rows per read batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Worker threads settling groups (async strategy only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Worker threads settling groups in parallel (default: CPU cores)"
    )]
    pub max_concurrent_groups: Option<usize>,

    /// Log engine decisions at debug level
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Available processing strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

/// Report printed per group
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportType {
    /// `group,from,to,amount`
    #[default]
    Settlements,
    /// `group,member,paid,share,adjustment,net`
    Balances,
}

impl CliArgs {
    /// Build a BatchConfig, defaulting whatever was not given
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_none() && self.max_concurrent_groups.is_none() {
            return BatchConfig::default();
        }

        let default = BatchConfig::default();
        BatchConfig::new(
            self.batch_size.unwrap_or(default.batch_size),
            self.max_concurrent_groups
                .unwrap_or(default.max_concurrent_groups),
        )
    }

    pub fn to_engine_config(&self) -> EngineConfig {
        self.threshold.map(EngineConfig::new).unwrap_or_default()
    }

    pub fn to_report_options(&self) -> ReportOptions {
        ReportOptions {
            engine: self.to_engine_config(),
            mode: self.mode,
            report: self.report,
        }
    }
}
