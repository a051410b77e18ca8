//! ErgoQuest Common Library
//!
//! The arithmetic that sits in front of every transaction the ErgoQuest
//! tutorials build: which boxes to spend, how much change comes back, and what
//! a constant-product swap pays out.
//!
//! # Modules
//!
//! - `types`: value records, assets, outputs and ledger constants
//! - `selection`: first-fit and largest-first input selection
//! - `balance`: change, dust and conservation checks
//! - `swap`: constant-product AMM quotes and slippage
//! - `math`: unit parsing and formatting
//! - `error`: typed ledger errors and the crate-wide error
//! - `logging`: `env_logger` setup and context-tagged logging helpers
//! - `config`: TOML configuration
//!
//! Every operation in `selection`, `balance` and `swap` is a pure function of
//! its arguments and may be called from any number of threads at once.

/// Core domain types
pub mod types;

/// Unit conversion and display helpers
pub mod math;

/// Error types
pub mod error;

/// Logging functionality
pub mod logging;

/// Configuration management
pub mod config;

/// Input selection algorithms
pub mod selection;

/// Change and conservation arithmetic
pub mod balance;

/// Constant-product swap arithmetic
pub mod swap;

pub use balance::{
    check_asset_conservation, compute_change, total_input_value, total_output_value, validate_minimum_output,
    BalanceCalculator, TransactionSummary,
};
pub use error::{LedgerError, LedgerErrorKind, QuestError, QuestResult};
pub use math::{format_erg, format_units, parse_erg, parse_units};
pub use selection::{select, BoxSelector, SelectionResult, SelectionStrategy, SelectionTarget};
pub use swap::{apply_slippage, swap_output, BasisPoints, PoolState, SwapQuote};
pub use types::{
    Asset, AssetTotals, OutputCandidate, ValueRecord, NANOERGS_PER_ERG, RECOMMENDED_MIN_FEE_VALUE,
    SAFE_MIN_BOX_VALUE,
};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

use std::sync::Once;

static INIT: Once = Once::new();

/// Library initialization
///
/// Installs the default logger. Safe to call any number of times; only the
/// first call has an effect.
pub fn init() -> Result<(), String> {
    let mut result = Ok(());
    INIT.call_once(|| {
        result = logging::init(&logging::LogConfig::default())
            .map_err(|e| format!("Failed to initialize logging: {}", e));
    });
    result
}
