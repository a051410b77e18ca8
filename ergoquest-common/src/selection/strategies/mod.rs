//! Selection strategies
//!
//! Each strategy implements [`Strategy`] and only decides the order in which
//! the pool is walked; accumulation and the failure rule are shared in
//! [`utils`].

use crate::error::LedgerError;
use crate::selection::types::{SelectionResult, SelectionStrategy, SelectionTarget};
use crate::types::ValueRecord;

pub mod first_fit;
pub mod largest_first;
pub mod utils;

pub use first_fit::FirstFitStrategy;
pub use largest_first::LargestFirstStrategy;

/// Trait defining a selection strategy
///
/// Implementations must not mutate the pool and must be deterministic.
pub trait Strategy {
    /// Name of this strategy
    fn name(&self) -> &'static str;

    /// Select records from `pool` covering `target`
    ///
    /// # Returns
    /// * The chosen records, or `InsufficientFunds` if the pool cannot cover
    ///   the target. A partial selection is never returned.
    fn select(&self, pool: &[ValueRecord], target: &SelectionTarget) -> Result<SelectionResult, LedgerError>;
}

/// Strategy implementation for a policy
pub fn strategy_for(strategy: SelectionStrategy) -> Box<dyn Strategy + Send + Sync> {
    match strategy {
        SelectionStrategy::FirstFit => Box::new(FirstFitStrategy::new()),
        SelectionStrategy::LargestFirst => Box::new(LargestFirstStrategy::new()),
    }
}
