//! Core types for input selection
//!
//! - [`SelectionStrategy`]: which policy orders the pool
//! - [`SelectionTarget`]: the base value and per-asset amounts to cover
//! - [`SelectionResult`]: the chosen records with their totals
//!
//! # Example
//!
//! ```
//! use ergoquest_common::selection::types::{SelectionStrategy, SelectionTarget};
//! use num_bigint::BigUint;
//!
//! let target = SelectionTarget::value(BigUint::from(250u32))
//!     .with_asset("sigusd", BigUint::from(10u32));
//! assert!(!target.is_empty());
//!
//! let strategy: SelectionStrategy = "largest-first".parse().unwrap();
//! assert_eq!(strategy, SelectionStrategy::LargestFirst);
//! ```

use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::types::{accumulate_assets, AssetTotals, ValueRecord};

/// Selection policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionStrategy {
    /// Take records in pool order until the target is met
    #[default]
    FirstFit,
    /// Take records by descending value (ties keep pool order)
    LargestFirst,
}

impl SelectionStrategy {
    /// Every strategy, in declaration order
    pub const ALL: [SelectionStrategy; 2] = [SelectionStrategy::FirstFit, SelectionStrategy::LargestFirst];

    /// Canonical name, as accepted by [`FromStr`]
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionStrategy::FirstFit => "first-fit",
            SelectionStrategy::LargestFirst => "largest-first",
        }
    }
}

impl fmt::Display for SelectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectionStrategy {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "first-fit" | "firstfit" | "accumulative" => Ok(SelectionStrategy::FirstFit),
            "largest-first" | "largestfirst" => Ok(SelectionStrategy::LargestFirst),
            other => Err(LedgerError::invalid_input(format!(
                "Unknown selection strategy: {}",
                other
            ))),
        }
    }
}

/// Amounts a selection has to cover
///
/// The value target and every asset target are independent conditions; a
/// selection succeeds only when all of them hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionTarget {
    /// Base value to cover, in nanoERG
    pub required_value: BigUint,
    /// Per-asset amounts to cover
    pub required_assets: AssetTotals,
}

impl SelectionTarget {
    /// Target covering only base value
    pub fn value(required_value: BigUint) -> Self {
        Self {
            required_value,
            required_assets: AssetTotals::new(),
        }
    }

    /// Add (or raise) an asset requirement
    pub fn with_asset(mut self, asset_id: impl Into<String>, amount: BigUint) -> Self {
        *self.required_assets.entry(asset_id.into()).or_default() += amount;
        self
    }

    /// True when nothing at all is required
    pub fn is_empty(&self) -> bool {
        self.required_value.is_zero() && self.required_assets.values().all(Zero::is_zero)
    }

    /// Whether the given totals cover this target
    pub fn is_satisfied_by(&self, total_value: &BigUint, total_assets: &AssetTotals) -> bool {
        self.first_shortfall(total_value, total_assets).is_none()
    }

    /// The first requirement the totals fail to cover
    ///
    /// Value is checked before assets, assets in id order. Returns
    /// `(asset id, required, available)` where the id is `None` for value.
    pub fn first_shortfall(
        &self,
        total_value: &BigUint,
        total_assets: &AssetTotals,
    ) -> Option<(Option<String>, BigUint, BigUint)> {
        if total_value < &self.required_value {
            return Some((None, self.required_value.clone(), total_value.clone()));
        }

        for (asset_id, required) in &self.required_assets {
            let available = total_assets.get(asset_id).cloned().unwrap_or_default();
            if &available < required {
                return Some((Some(asset_id.clone()), required.clone(), available));
            }
        }

        None
    }
}

/// Records chosen by a selection, with their totals
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionResult {
    /// Chosen records, in selection order
    pub chosen: Vec<ValueRecord>,
    /// Sum of the chosen records' values
    pub total_value: BigUint,
    /// Sum of every asset carried by the chosen records
    pub total_assets: AssetTotals,
}

impl SelectionResult {
    /// A result that consumes nothing
    pub fn empty() -> Self {
        Self::default()
    }

    /// Append a record and update the totals
    pub fn push(&mut self, record: ValueRecord) {
        self.total_value += record.value();
        accumulate_assets(&mut self.total_assets, record.assets());
        self.chosen.push(record);
    }

    /// Number of chosen records
    pub fn len(&self) -> usize {
        self.chosen.len()
    }

    /// Whether nothing was chosen
    pub fn is_empty(&self) -> bool {
        self.chosen.is_empty()
    }

    /// Ids of the chosen records
    pub fn ids(&self) -> Vec<&str> {
        self.chosen.iter().map(|record| record.id()).collect()
    }

    /// Selected value beyond the target's value requirement
    pub fn excess_value(&self, target: &SelectionTarget) -> BigUint {
        if self.total_value > target.required_value {
            &self.total_value - &target.required_value
        } else {
            BigUint::zero()
        }
    }
}
