//! Largest-first selection strategy
//!
//! Orders a working copy of the pool by value, largest first, then applies the
//! first-fit walk. For a value-only target this consumes the fewest records.
//! The sort is stable, so equal values keep pool order.

use crate::error::LedgerError;
use crate::selection::strategies::utils;
use crate::selection::strategies::Strategy;
use crate::selection::types::{SelectionResult, SelectionTarget};
use crate::types::ValueRecord;

/// Strategy taking the largest records first
#[derive(Debug, Clone, Copy, Default)]
pub struct LargestFirstStrategy;

impl LargestFirstStrategy {
    /// Create a new LargestFirstStrategy
    pub fn new() -> Self {
        Self
    }
}

impl Strategy for LargestFirstStrategy {
    fn name(&self) -> &'static str {
        "LargestFirst"
    }

    fn select(&self, pool: &[ValueRecord], target: &SelectionTarget) -> Result<SelectionResult, LedgerError> {
        let mut ordered: Vec<&ValueRecord> = pool.iter().collect();
        ordered.sort_by(|a, b| b.value().cmp(a.value()));

        utils::accumulate_until_satisfied(ordered, target).ok_or_else(|| utils::insufficient_funds(pool, target))
    }
}
