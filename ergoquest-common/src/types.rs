//! Core domain types for ErgoQuest
//!
//! # Key Types
//!
//! - [`ValueRecord`]: an unspent box with a base value and an ordered list of assets
//! - [`Asset`]: an `(asset id, amount)` pair carried by a record or output
//! - [`OutputCandidate`]: the `{value, assets}` shape of a proposed output
//! - [`AssetTotals`]: per-asset sums, ordered by asset id
//!
//! Amounts are [`BigUint`] throughout. On the wire (JSON, TOML) they are written
//! as decimal strings so that no consumer ever sees them as floating point.
//!
//! # Example
//!
//! ```
//! use ergoquest_common::types::{Asset, ValueRecord};
//! use num_bigint::BigUint;
//!
//! let record = ValueRecord::new(
//!     "box-1",
//!     BigUint::from(1_000_000u64),
//!     vec![Asset::new("sigusd", BigUint::from(250u32))],
//! ).unwrap();
//! assert_eq!(record.asset_amount("sigusd"), BigUint::from(250u32));
//!
//! // A record with nothing in it is rejected
//! assert!(ValueRecord::new("empty", BigUint::from(0u32), vec![]).is_err());
//! ```

use std::collections::{BTreeMap, HashSet};

use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// nanoERG in one ERG
pub const NANOERGS_PER_ERG: u64 = 1_000_000_000;

/// Decimal places of the base unit
pub const ERG_DECIMALS: u32 = 9;

/// Minimum carrier value every box must hold, in nanoERG
pub const SAFE_MIN_BOX_VALUE: u64 = 1_000_000;

/// Recommended minimum transaction fee, in nanoERG
pub const RECOMMENDED_MIN_FEE_VALUE: u64 = 1_100_000;

/// Denominator of basis-point quantities
pub const BPS_SCALE: u32 = 10_000;

/// Per-asset totals keyed by asset id
pub type AssetTotals = BTreeMap<String, BigUint>;

/// Serde adapter that writes a [`BigUint`] as a decimal string
///
/// Deserialization also accepts plain JSON integers for hand-written fixtures.
pub mod amount_serde {
    use num_bigint::BigUint;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAmount {
        Text(String),
        Number(u64),
    }

    pub fn serialize<S>(amount: &BigUint, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&amount.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BigUint, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawAmount::deserialize(deserializer)? {
            RawAmount::Number(n) => Ok(BigUint::from(n)),
            RawAmount::Text(s) => s
                .trim()
                .parse::<BigUint>()
                .map_err(|e| D::Error::custom(format!("invalid amount '{}': {}", s, e))),
        }
    }
}

/// An `(asset id, amount)` pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Asset {
    /// Asset (token) identifier
    pub id: String,

    /// Amount in the asset's smallest unit
    #[serde(with = "amount_serde")]
    pub amount: BigUint,
}

impl Asset {
    /// Create a new asset entry
    pub fn new(id: impl Into<String>, amount: BigUint) -> Self {
        Self {
            id: id.into(),
            amount,
        }
    }
}

/// An unspent, indivisible record of value
///
/// Records are validated once, at construction or deserialization, and are
/// immutable afterwards:
///
/// * the id is non-empty
/// * no asset id repeats within the record
/// * a record with zero value and no nonzero asset amount is degenerate and rejected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawValueRecord", into = "RawValueRecord")]
pub struct ValueRecord {
    id: String,
    value: BigUint,
    assets: Vec<Asset>,
}

#[derive(Serialize, Deserialize)]
struct RawValueRecord {
    id: String,
    #[serde(with = "amount_serde")]
    value: BigUint,
    #[serde(default)]
    assets: Vec<Asset>,
}

impl TryFrom<RawValueRecord> for ValueRecord {
    type Error = LedgerError;

    fn try_from(raw: RawValueRecord) -> Result<Self, Self::Error> {
        ValueRecord::new(raw.id, raw.value, raw.assets)
    }
}

impl From<ValueRecord> for RawValueRecord {
    fn from(record: ValueRecord) -> Self {
        RawValueRecord {
            id: record.id,
            value: record.value,
            assets: record.assets,
        }
    }
}

impl ValueRecord {
    /// Create a validated record
    pub fn new(id: impl Into<String>, value: BigUint, assets: Vec<Asset>) -> Result<Self, LedgerError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(LedgerError::invalid_record("record id must not be empty"));
        }

        let mut seen = HashSet::with_capacity(assets.len());
        for asset in &assets {
            if asset.id.trim().is_empty() {
                return Err(LedgerError::invalid_record(format!(
                    "record {} carries an asset with an empty id",
                    id
                )));
            }
            if !seen.insert(asset.id.as_str()) {
                return Err(LedgerError::invalid_record(format!(
                    "asset {} appears more than once in record {}",
                    asset.id, id
                )));
            }
        }

        if value.is_zero() && assets.iter().all(|asset| asset.amount.is_zero()) {
            return Err(LedgerError::invalid_record(format!(
                "record {} holds neither value nor assets",
                id
            )));
        }

        Ok(Self { id, value, assets })
    }

    /// Create a record holding only base value
    pub fn with_value(id: impl Into<String>, value: impl Into<BigUint>) -> Result<Self, LedgerError> {
        Self::new(id, value.into(), Vec::new())
    }

    /// Record identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Base value in nanoERG
    pub fn value(&self) -> &BigUint {
        &self.value
    }

    /// Assets in the order they were observed
    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    /// Amount of the given asset held by this record (zero when absent)
    pub fn asset_amount(&self, asset_id: &str) -> BigUint {
        self.assets
            .iter()
            .find(|asset| asset.id == asset_id)
            .map(|asset| asset.amount.clone())
            .unwrap_or_default()
    }

    /// Whether this record holds any of the given asset
    pub fn has_asset(&self, asset_id: &str) -> bool {
        self.assets
            .iter()
            .any(|asset| asset.id == asset_id && !asset.amount.is_zero())
    }
}

/// The `{value, assets}` shape of a proposed output
///
/// A zero value means the output is omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputCandidate {
    /// Base value in nanoERG
    #[serde(with = "amount_serde")]
    pub value: BigUint,

    /// Assets sent to this output
    #[serde(default)]
    pub assets: Vec<Asset>,
}

impl OutputCandidate {
    /// Create an output holding only base value
    pub fn new(value: impl Into<BigUint>) -> Self {
        Self {
            value: value.into(),
            assets: Vec::new(),
        }
    }

    /// Add an asset to this output
    pub fn with_asset(mut self, id: impl Into<String>, amount: impl Into<BigUint>) -> Self {
        self.assets.push(Asset::new(id, amount.into()));
        self
    }
}

/// Add every asset in `assets` into `totals`
pub fn accumulate_assets(totals: &mut AssetTotals, assets: &[Asset]) {
    for asset in assets {
        *totals.entry(asset.id.clone()).or_default() += &asset.amount;
    }
}

/// Sum the assets of all records
pub fn record_asset_totals(records: &[ValueRecord]) -> AssetTotals {
    let mut totals = AssetTotals::new();
    for record in records {
        accumulate_assets(&mut totals, record.assets());
    }
    totals
}

/// Sum the assets of all outputs
pub fn output_asset_totals(outputs: &[OutputCandidate]) -> AssetTotals {
    let mut totals = AssetTotals::new();
    for output in outputs {
        accumulate_assets(&mut totals, &output.assets);
    }
    totals
}
