//! Balance and conservation arithmetic
//!
//! Validates and summarizes a proposed transaction shape: the records being
//! spent, the outputs being created and the fee. Value is never created or
//! destroyed: `inputs = outputs + fee + change`, and change can never be
//! negative.
//!
//! # Usage
//!
//! ```
//! use ergoquest_common::balance::compute_change;
//! use num_bigint::BigUint;
//!
//! let change = compute_change(
//!     &BigUint::from(1_000_000_000u64),
//!     &BigUint::from(100_000_000u64),
//!     &BigUint::from(1_100_000u64),
//! ).unwrap();
//! assert_eq!(change, BigUint::from(898_900_000u64));
//! ```

use std::collections::BTreeSet;

use num_bigint::BigUint;
use num_traits::Zero;
use serde_json::json;

use crate::error::LedgerError;
use crate::logging::{log_balance, LogLevel};
use crate::types::{
    output_asset_totals, record_asset_totals, AssetTotals, OutputCandidate, ValueRecord, SAFE_MIN_BOX_VALUE,
};

/// Sum of the inputs' values
pub fn total_input_value(inputs: &[ValueRecord]) -> BigUint {
    inputs.iter().map(|record| record.value()).sum()
}

/// Sum of the outputs' values
pub fn total_output_value(outputs: &[OutputCandidate]) -> BigUint {
    outputs.iter().map(|output| &output.value).sum()
}

/// `total_input - total_output - fee`
///
/// # Errors
/// * `NegativeChange` if outputs plus fee exceed the inputs
pub fn compute_change(total_input: &BigUint, total_output: &BigUint, fee: &BigUint) -> Result<BigUint, LedgerError> {
    let spent = total_output + fee;
    if &spent > total_input {
        return Err(LedgerError::NegativeChange {
            inputs: total_input.clone(),
            outputs: total_output.clone(),
            fee: fee.clone(),
        });
    }
    Ok(total_input - spent)
}

/// Check an output value against the minimum carrier value
///
/// Zero means the output is omitted and passes.
///
/// # Errors
/// * `DustOutput` if `0 < value < minimum`
pub fn validate_minimum_output(value: &BigUint, minimum: &BigUint) -> Result<(), LedgerError> {
    if !value.is_zero() && value < minimum {
        return Err(LedgerError::DustOutput {
            value: value.clone(),
            minimum: minimum.clone(),
        });
    }
    Ok(())
}

/// Check that outputs never send more of an asset than the inputs hold
///
/// Asset ids in `mints` are exempt; whether minting them is legal is the
/// caller's decision.
///
/// # Errors
/// * `AssetOverspend` for the first offending asset, in id order
pub fn check_asset_conservation(
    inputs: &[ValueRecord],
    outputs: &[OutputCandidate],
    mints: &BTreeSet<String>,
) -> Result<(), LedgerError> {
    let available = record_asset_totals(inputs);
    let requested = output_asset_totals(outputs);

    for (asset_id, amount) in &requested {
        if mints.contains(asset_id) {
            continue;
        }
        let held = available.get(asset_id).cloned().unwrap_or_default();
        if amount > &held {
            return Err(LedgerError::AssetOverspend {
                asset_id: asset_id.clone(),
                requested: amount.clone(),
                available: held,
            });
        }
    }

    Ok(())
}

/// Outcome of a successful balance check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionSummary {
    /// Sum of input values
    pub total_input_value: BigUint,
    /// Sum of output values (excluding change)
    pub total_output_value: BigUint,
    /// Fee paid
    pub fee: BigUint,
    /// Value returned to the sender
    pub change_value: BigUint,
    /// Input assets not sent to any output
    pub change_assets: AssetTotals,
    /// Amounts of minted assets created beyond what the inputs held
    pub minted: AssetTotals,
}

impl TransactionSummary {
    /// Whether a change output is needed at all
    pub fn needs_change_output(&self) -> bool {
        !self.change_value.is_zero() || !self.change_assets.is_empty()
    }
}

/// Validates proposed transactions against a minimum carrier value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceCalculator {
    min_box_value: BigUint,
}

impl Default for BalanceCalculator {
    fn default() -> Self {
        Self::new(BigUint::from(SAFE_MIN_BOX_VALUE))
    }
}

impl BalanceCalculator {
    /// Create a calculator enforcing `min_box_value` on every output
    pub fn new(min_box_value: BigUint) -> Self {
        Self { min_box_value }
    }

    /// The enforced carrier minimum
    pub fn min_box_value(&self) -> &BigUint {
        &self.min_box_value
    }

    /// Validate a transaction shape and compute its change
    ///
    /// Checks, in order: every output's carrier value, value conservation,
    /// asset conservation, then the change output's carrier value. Leftover
    /// input assets always go to change; they are never treated as burned.
    pub fn summarize(
        &self,
        inputs: &[ValueRecord],
        outputs: &[OutputCandidate],
        fee: &BigUint,
        mints: &BTreeSet<String>,
    ) -> Result<TransactionSummary, LedgerError> {
        for output in outputs {
            if output.value.is_zero() && !output.assets.is_empty() {
                return Err(LedgerError::UncarriedAssets {
                    asset_count: output.assets.len(),
                    minimum: self.min_box_value.clone(),
                });
            }
            validate_minimum_output(&output.value, &self.min_box_value)?;
        }

        let total_input_value = total_input_value(inputs);
        let total_output_value = total_output_value(outputs);
        let change_value = compute_change(&total_input_value, &total_output_value, fee)?;

        check_asset_conservation(inputs, outputs, mints)?;

        let held = record_asset_totals(inputs);
        let sent = output_asset_totals(outputs);

        let mut change_assets = AssetTotals::new();
        for (asset_id, amount) in &held {
            let out = sent.get(asset_id).cloned().unwrap_or_default();
            if amount > &out {
                change_assets.insert(asset_id.clone(), amount - out);
            }
        }

        let mut minted = AssetTotals::new();
        for (asset_id, amount) in &sent {
            let input = held.get(asset_id).cloned().unwrap_or_default();
            if mints.contains(asset_id) && amount > &input {
                minted.insert(asset_id.clone(), amount - input);
            }
        }

        validate_minimum_output(&change_value, &self.min_box_value)?;
        if change_value.is_zero() && !change_assets.is_empty() {
            return Err(LedgerError::UncarriedAssets {
                asset_count: change_assets.len(),
                minimum: self.min_box_value.clone(),
            });
        }

        log_balance(
            LogLevel::Debug,
            "transaction balanced",
            Some(json!({
                "inputs": total_input_value.to_string(),
                "outputs": total_output_value.to_string(),
                "fee": fee.to_string(),
                "change": change_value.to_string(),
                "change_assets": change_assets.len(),
                "minted": minted.len(),
            })),
        );

        Ok(TransactionSummary {
            total_input_value,
            total_output_value,
            fee: fee.clone(),
            change_value,
            change_assets,
            minted,
        })
    }
}
