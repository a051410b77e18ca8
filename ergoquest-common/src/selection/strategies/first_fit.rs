//! First-fit selection strategy
//!
//! Walks the pool in the order given and stops as soon as the target is
//! covered. There is no backtracking: for a pool of `[100, 200, 300]` and a
//! target of 250 the result is `[100, 200]`.

use crate::error::LedgerError;
use crate::selection::strategies::utils;
use crate::selection::strategies::Strategy;
use crate::selection::types::{SelectionResult, SelectionTarget};
use crate::types::ValueRecord;

/// Strategy taking records in pool order
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstFitStrategy;

impl FirstFitStrategy {
    /// Create a new FirstFitStrategy
    pub fn new() -> Self {
        Self
    }
}

impl Strategy for FirstFitStrategy {
    fn name(&self) -> &'static str {
        "FirstFit"
    }

    fn select(&self, pool: &[ValueRecord], target: &SelectionTarget) -> Result<SelectionResult, LedgerError> {
        utils::accumulate_until_satisfied(pool, target).ok_or_else(|| utils::insufficient_funds(pool, target))
    }
}
