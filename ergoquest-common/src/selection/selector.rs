//! Main box selector implementation
//!
//! [`BoxSelector`] is the entry point for input selection. It holds a default
//! [`SelectionStrategy`], delegates to the matching [`Strategy`]
//! implementation and logs the outcome of every selection.
//!
//! # Usage
//!
//! ```
//! use ergoquest_common::selection::selector::{select, BoxSelector};
//! use ergoquest_common::selection::types::{SelectionStrategy, SelectionTarget};
//! use ergoquest_common::types::ValueRecord;
//! use num_bigint::BigUint;
//!
//! let pool = vec![
//!     ValueRecord::with_value("a", 100u32).unwrap(),
//!     ValueRecord::with_value("b", 200u32).unwrap(),
//!     ValueRecord::with_value("c", 300u32).unwrap(),
//! ];
//! let target = SelectionTarget::value(BigUint::from(250u32));
//!
//! let first_fit = select(&pool, &target, SelectionStrategy::FirstFit).unwrap();
//! assert_eq!(first_fit.ids(), vec!["a", "b"]);
//!
//! let selector = BoxSelector::with_strategy(SelectionStrategy::LargestFirst);
//! let largest = selector.select(&pool, &target).unwrap();
//! assert_eq!(largest.ids(), vec!["c"]);
//! ```

use serde_json::json;

use crate::error::LedgerError;
use crate::logging::{log_selection, sanitize_for_logging, LogLevel};
use crate::selection::strategies::strategy_for;
use crate::selection::types::{SelectionResult, SelectionStrategy, SelectionTarget};
use crate::types::ValueRecord;

/// Selector that delegates to a strategy implementation
///
/// The selector is stateless apart from its default strategy, so one instance
/// can be shared across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxSelector {
    strategy: SelectionStrategy,
}

impl BoxSelector {
    /// Create a selector using first-fit
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a selector using the given strategy by default
    pub fn with_strategy(strategy: SelectionStrategy) -> Self {
        Self { strategy }
    }

    /// The default strategy
    pub fn strategy(&self) -> SelectionStrategy {
        self.strategy
    }

    /// Select with the default strategy
    pub fn select(&self, pool: &[ValueRecord], target: &SelectionTarget) -> Result<SelectionResult, LedgerError> {
        self.select_with(pool, target, self.strategy)
    }

    /// Select with an explicit strategy
    pub fn select_with(
        &self,
        pool: &[ValueRecord],
        target: &SelectionTarget,
        strategy: SelectionStrategy,
    ) -> Result<SelectionResult, LedgerError> {
        log_selection(
            LogLevel::Debug,
            "selection requested",
            Some(json!({
                "strategy": strategy.as_str(),
                "pool_size": pool.len(),
                "required_value": target.required_value.to_string(),
                "required_assets": target.required_assets.len(),
            })),
        );

        let result = strategy_for(strategy).select(pool, target);

        match &result {
            Ok(selection) => log_selection(
                LogLevel::Info,
                "selection completed",
                Some(json!({
                    "strategy": strategy.as_str(),
                    "chosen": selection.chosen.iter().map(|r| sanitize_for_logging(r.id())).collect::<Vec<_>>(),
                    "total_value": selection.total_value.to_string(),
                })),
            ),
            Err(err) => log_selection(
                LogLevel::Warn,
                "selection failed",
                Some(json!({
                    "strategy": strategy.as_str(),
                    "reason": err.kind().as_str(),
                    "detail": err.to_string(),
                })),
            ),
        }

        result
    }
}

/// Select records from `pool` covering `target` under `strategy`
pub fn select(
    pool: &[ValueRecord],
    target: &SelectionTarget,
    strategy: SelectionStrategy,
) -> Result<SelectionResult, LedgerError> {
    BoxSelector::with_strategy(strategy).select(pool, target)
}
