//! Constant-product AMM arithmetic
//!
//! Quotes a swap against a pool holding `reserve_in * reserve_out = k`, with
//! the pool fee taken from the input before the curve is applied:
//!
//! ```text
//! input_after_fee = input * (10000 - fee_bps) / 10000
//! output          = reserve_out * input_after_fee / (reserve_in + input_after_fee)
//! ```
//!
//! Both divisions truncate. Prices and price impact are kept as exact
//! [`BigRational`]s; the `*_display` accessors are the only conversion to
//! floating point and are meant for presentation.
//!
//! # Usage
//!
//! ```
//! use ergoquest_common::swap::{apply_slippage, swap_output, BasisPoints, PoolState};
//! use num_bigint::BigUint;
//!
//! let pool = PoolState::new(
//!     BigUint::from(1_000_000u64),
//!     BigUint::from(1_000_000u64),
//!     30,
//! ).unwrap();
//! let quote = swap_output(&pool, &BigUint::from(10_000u64)).unwrap();
//! assert_eq!(quote.output_amount, BigUint::from(9_871u64));
//!
//! let min_out = apply_slippage(&quote.output_amount, BasisPoints::new(50).unwrap());
//! assert_eq!(min_out, BigUint::from(9_821u64));
//! ```

use num_bigint::{BigInt, BigUint};
use num_rational::BigRational;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::LedgerError;
use crate::logging::{log_swap, LogLevel};
use crate::math::ratio_to_f64;
use crate::types::{amount_serde, BPS_SCALE};

/// A validated basis-point quantity in `0..=10000`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct BasisPoints(u32);

impl BasisPoints {
    /// 0 bps
    pub const ZERO: BasisPoints = BasisPoints(0);

    /// 10000 bps (100%)
    pub const MAX: BasisPoints = BasisPoints(BPS_SCALE);

    /// Validate a basis-point value
    pub fn new(bps: u32) -> Result<Self, LedgerError> {
        if bps > BPS_SCALE {
            return Err(LedgerError::invalid_input(format!(
                "basis points must be at most {}, got {}",
                BPS_SCALE, bps
            )));
        }
        Ok(Self(bps))
    }

    /// Raw value
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for BasisPoints {
    type Error = LedgerError;

    fn try_from(bps: u32) -> Result<Self, Self::Error> {
        BasisPoints::new(bps)
    }
}

impl From<BasisPoints> for u32 {
    fn from(bps: BasisPoints) -> Self {
        bps.0
    }
}

/// `amount * (10000 - bps) / 10000`, truncating
fn scale_down_bps(amount: &BigUint, bps: u32) -> BigUint {
    amount * BigUint::from(BPS_SCALE - bps) / BigUint::from(BPS_SCALE)
}

/// Reserves and fee of a constant-product pool
///
/// `reserve_in` is the side the trader pays into, `reserve_out` the side
/// they receive from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPoolState", into = "RawPoolState")]
pub struct PoolState {
    reserve_in: BigUint,
    reserve_out: BigUint,
    fee_rate_bps: u32,
}

#[derive(Serialize, Deserialize)]
struct RawPoolState {
    #[serde(with = "amount_serde")]
    reserve_in: BigUint,
    #[serde(with = "amount_serde")]
    reserve_out: BigUint,
    fee_rate_bps: u32,
}

impl TryFrom<RawPoolState> for PoolState {
    type Error = LedgerError;

    fn try_from(raw: RawPoolState) -> Result<Self, Self::Error> {
        PoolState::new(raw.reserve_in, raw.reserve_out, raw.fee_rate_bps)
    }
}

impl From<PoolState> for RawPoolState {
    fn from(pool: PoolState) -> Self {
        RawPoolState {
            reserve_in: pool.reserve_in,
            reserve_out: pool.reserve_out,
            fee_rate_bps: pool.fee_rate_bps,
        }
    }
}

impl PoolState {
    /// Create a validated pool state
    ///
    /// # Errors
    /// * `InvalidPoolState` if either reserve is zero or the fee is 10000 bps or more
    pub fn new(reserve_in: BigUint, reserve_out: BigUint, fee_rate_bps: u32) -> Result<Self, LedgerError> {
        let pool = Self {
            reserve_in,
            reserve_out,
            fee_rate_bps,
        };
        pool.validate()?;
        Ok(pool)
    }

    /// Check the pool invariants
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.reserve_in.is_zero() || self.reserve_out.is_zero() || self.fee_rate_bps >= BPS_SCALE {
            return Err(LedgerError::InvalidPoolState {
                reserve_in: self.reserve_in.clone(),
                reserve_out: self.reserve_out.clone(),
                fee_rate_bps: self.fee_rate_bps,
            });
        }
        Ok(())
    }

    /// Reserve of the asset being paid in
    pub fn reserve_in(&self) -> &BigUint {
        &self.reserve_in
    }

    /// Reserve of the asset being paid out
    pub fn reserve_out(&self) -> &BigUint {
        &self.reserve_out
    }

    /// Pool fee in basis points
    pub fn fee_rate_bps(&self) -> u32 {
        self.fee_rate_bps
    }

    /// `reserve_in * reserve_out`
    pub fn constant_product(&self) -> BigUint {
        &self.reserve_in * &self.reserve_out
    }

    /// `reserve_out / reserve_in`
    pub fn spot_price(&self) -> BigRational {
        BigRational::new(
            BigInt::from(self.reserve_out.clone()),
            BigInt::from(self.reserve_in.clone()),
        )
    }

    /// The same pool quoted in the opposite direction
    pub fn reversed(&self) -> PoolState {
        PoolState {
            reserve_in: self.reserve_out.clone(),
            reserve_out: self.reserve_in.clone(),
            fee_rate_bps: self.fee_rate_bps,
        }
    }

    /// Pool state after executing `quote`
    ///
    /// The whole input, fee included, stays in the pool, so the constant
    /// product never decreases.
    ///
    /// # Errors
    /// * `InvalidPoolState` if `quote` would drain the output reserve, which
    ///   only happens for a quote taken against a different pool
    pub fn after_swap(&self, quote: &SwapQuote) -> Result<PoolState, LedgerError> {
        if quote.output_amount >= self.reserve_out {
            return Err(LedgerError::InvalidPoolState {
                reserve_in: &self.reserve_in + &quote.input_amount,
                reserve_out: BigUint::zero(),
                fee_rate_bps: self.fee_rate_bps,
            });
        }
        Ok(PoolState {
            reserve_in: &self.reserve_in + &quote.input_amount,
            reserve_out: &self.reserve_out - &quote.output_amount,
            fee_rate_bps: self.fee_rate_bps,
        })
    }
}

/// Result of quoting a swap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapQuote {
    /// Amount paid in
    pub input_amount: BigUint,
    /// Input left after the pool fee
    pub input_after_fee: BigUint,
    /// Amount received
    pub output_amount: BigUint,
    /// `reserve_out / reserve_in` before the trade
    pub spot_price: BigRational,
    /// `output_amount / input_amount`
    pub execution_price: BigRational,
    /// `(spot - execution) / spot * 100`
    pub price_impact_pct: BigRational,
}

impl SwapQuote {
    /// Price impact in percent, for display
    pub fn price_impact_display(&self) -> Option<f64> {
        ratio_to_f64(&self.price_impact_pct)
    }

    /// Spot price, for display
    pub fn spot_price_display(&self) -> Option<f64> {
        ratio_to_f64(&self.spot_price)
    }

    /// Execution price, for display
    pub fn execution_price_display(&self) -> Option<f64> {
        ratio_to_f64(&self.execution_price)
    }
}

/// Input remaining after the pool fee, truncating
pub fn input_after_fee(input_amount: &BigUint, fee_rate_bps: u32) -> BigUint {
    scale_down_bps(input_amount, fee_rate_bps)
}

/// Quote swapping `input_amount` into `pool`
///
/// # Errors
/// * `InvalidInput` if `input_amount` is zero
/// * `InvalidPoolState` if the pool violates its invariants
pub fn swap_output(pool: &PoolState, input_amount: &BigUint) -> Result<SwapQuote, LedgerError> {
    if input_amount.is_zero() {
        return Err(LedgerError::invalid_input("swap input amount must be positive"));
    }
    pool.validate()?;

    let after_fee = input_after_fee(input_amount, pool.fee_rate_bps);
    let output_amount = pool.reserve_out() * &after_fee / (pool.reserve_in() + &after_fee);

    let spot_price = pool.spot_price();
    let execution_price = BigRational::new(
        BigInt::from(output_amount.clone()),
        BigInt::from(input_amount.clone()),
    );
    let hundred = BigRational::from_integer(BigInt::from(100));
    let price_impact_pct = (&spot_price - &execution_price) / &spot_price * hundred;

    log_swap(
        LogLevel::Debug,
        "swap quoted",
        Some(json!({
            "input": input_amount.to_string(),
            "input_after_fee": after_fee.to_string(),
            "output": output_amount.to_string(),
            "fee_bps": pool.fee_rate_bps,
            "price_impact_pct": ratio_to_f64(&price_impact_pct),
        })),
    );

    Ok(SwapQuote {
        input_amount: input_amount.clone(),
        input_after_fee: after_fee,
        output_amount,
        spot_price,
        execution_price,
        price_impact_pct,
    })
}

/// Minimum acceptable amount after tolerating `slippage`
///
/// `amount * (10000 - slippage) / 10000`, truncating.
pub fn apply_slippage(amount: &BigUint, slippage: BasisPoints) -> BigUint {
    scale_down_bps(amount, slippage.get())
}

/// Minimum output a caller should enforce for `quote`
pub fn minimum_received(quote: &SwapQuote, slippage: BasisPoints) -> BigUint {
    apply_slippage(&quote.output_amount, slippage)
}
