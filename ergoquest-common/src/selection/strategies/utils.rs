//! Shared helpers for selection strategies

use num_bigint::BigUint;

use crate::error::LedgerError;
use crate::selection::types::{SelectionResult, SelectionTarget};
use crate::types::{record_asset_totals, AssetTotals, ValueRecord};

/// Walk `records` in order, taking each one until `target` is covered
///
/// # Returns
/// * `Some(result)` with the shortest covering prefix
/// * `None` if the records run out first
pub fn accumulate_until_satisfied<'a, I>(records: I, target: &SelectionTarget) -> Option<SelectionResult>
where
    I: IntoIterator<Item = &'a ValueRecord>,
{
    let mut result = SelectionResult::empty();
    if target.is_satisfied_by(&result.total_value, &result.total_assets) {
        return Some(result);
    }

    for record in records {
        result.push(record.clone());
        if target.is_satisfied_by(&result.total_value, &result.total_assets) {
            return Some(result);
        }
    }

    None
}

/// Total value and assets of the whole pool
pub fn pool_totals(pool: &[ValueRecord]) -> (BigUint, AssetTotals) {
    let value = pool.iter().map(|record| record.value()).sum();
    (value, record_asset_totals(pool))
}

/// `InsufficientFunds` describing the first requirement the pool cannot cover
pub fn insufficient_funds(pool: &[ValueRecord], target: &SelectionTarget) -> LedgerError {
    let (total_value, total_assets) = pool_totals(pool);
    let (asset_id, required, available) = target
        .first_shortfall(&total_value, &total_assets)
        .unwrap_or((None, target.required_value.clone(), total_value));

    LedgerError::InsufficientFunds {
        asset_id,
        required,
        available,
    }
}
