//! Unit conversion and display helpers
//!
//! All ledger arithmetic is done on [`BigUint`] in the smallest unit (nanoERG
//! for the base value, raw integer amounts for tokens). This module is the only
//! place where amounts cross into human-readable decimal text, and where prices
//! leave exact rational form for display.
//!
//! Example:
//! ```
//! use ergoquest_common::math::{format_erg, parse_erg};
//!
//! let amount = parse_erg("1.5").unwrap();
//! assert_eq!(amount.to_string(), "1500000000");
//! assert_eq!(format_erg(&amount), "1.5");
//! ```

use std::str::FromStr;

use num_bigint::BigUint;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{ToPrimitive, Zero};
use rust_decimal::Decimal;

use crate::error::LedgerError;
use crate::types::ERG_DECIMALS;

/// `10^decimals` as a big integer
pub fn unit_scale(decimals: u32) -> BigUint {
    BigUint::from(10u32).pow(decimals)
}

/// Render an integer amount of smallest units as an exact decimal string
///
/// Trailing zeros in the fractional part are dropped, so 1_500_000_000 with 9
/// decimals renders as `1.5` and 2_000_000_000 as `2`.
pub fn format_units(amount: &BigUint, decimals: u32) -> String {
    if decimals == 0 {
        return amount.to_string();
    }

    let (whole, fraction) = amount.div_rem(&unit_scale(decimals));
    if fraction.is_zero() {
        return whole.to_string();
    }

    let digits = format!("{:0>width$}", fraction.to_string(), width = decimals as usize);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}

/// Parse a decimal string into an integer amount of smallest units
///
/// Negative values and values with more fractional digits than `decimals`
/// are rejected rather than rounded.
pub fn parse_units(text: &str, decimals: u32) -> Result<BigUint, LedgerError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::invalid_input("Empty amount string"));
    }

    let value = Decimal::from_str(trimmed)
        .map_err(|e| LedgerError::invalid_input(format!("Could not parse amount '{}': {}", trimmed, e)))?;

    if value.is_sign_negative() && !value.is_zero() {
        return Err(LedgerError::invalid_input(format!("Amount must not be negative: {}", trimmed)));
    }

    let value = value.normalize();
    let scale = value.scale();
    if scale > decimals {
        return Err(LedgerError::invalid_input(format!(
            "Amount '{}' has {} decimal places, at most {} allowed",
            trimmed, scale, decimals
        )));
    }

    let mantissa = value.mantissa().unsigned_abs();
    Ok(BigUint::from(mantissa) * unit_scale(decimals - scale))
}

/// Render nanoERG as ERG
pub fn format_erg(nano_ergs: &BigUint) -> String {
    format_units(nano_ergs, ERG_DECIMALS)
}

/// Parse an ERG amount into nanoERG
pub fn parse_erg(text: &str) -> Result<BigUint, LedgerError> {
    parse_units(text, ERG_DECIMALS)
}

/// Convert an exact ratio to `f64` for display only
///
/// Returns `None` when the ratio does not fit an `f64`.
pub fn ratio_to_f64(ratio: &BigRational) -> Option<f64> {
    ratio.to_f64()
}
