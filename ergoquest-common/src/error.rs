//! Standardized error handling for ErgoQuest
//!
//! Two layers of errors live here:
//!
//! - [`LedgerError`]: the typed failures of the selection, balance and swap
//!   arithmetic. Every variant carries the numbers that caused it so callers can
//!   render a domain message such as "need 5 ERG, have 3 ERG".
//! - [`QuestError`]: the crate-wide umbrella that also covers configuration,
//!   I/O, serialization and progress-storage failures.
//!
//! # Usage
//!
//! ```
//! use ergoquest_common::error::{LedgerError, LedgerErrorKind};
//! use num_bigint::BigUint;
//!
//! let err = LedgerError::InsufficientFunds {
//!     asset_id: None,
//!     required: BigUint::from(5_000_000_000u64),
//!     available: BigUint::from(3_000_000_000u64),
//! };
//! assert_eq!(err.kind(), LedgerErrorKind::InsufficientFunds);
//! assert_eq!(err.user_message(), "need 5 ERG, have 3 ERG");
//! ```

use std::error::Error as StdError;
use std::fmt;
use std::io;

use num_bigint::BigUint;
use thiserror::Error;

use crate::logging::sanitize_for_logging;
use crate::math::format_erg;

/// Failures of the ledger arithmetic core
///
/// All variants are recoverable; none of them indicate a corrupted process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The selection target cannot be reached from the pool
    #[error("Insufficient funds for {}: required {required}, available {available}", unit_label(.asset_id))]
    InsufficientFunds {
        /// `None` for the base value, otherwise the asset that ran short
        asset_id: Option<String>,
        required: BigUint,
        available: BigUint,
    },

    /// Outputs plus fee exceed inputs
    #[error("Negative change: inputs {inputs} < outputs {outputs} + fee {fee}")]
    NegativeChange {
        inputs: BigUint,
        outputs: BigUint,
        fee: BigUint,
    },

    /// An output holds a positive value below the carrier minimum
    #[error("Dust output: value {value} is below the minimum {minimum}")]
    DustOutput { value: BigUint, minimum: BigUint },

    /// Argument outside its documented domain
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Pool reserves or fee rate outside their documented domain
    #[error("Invalid pool state: reserve_in {reserve_in}, reserve_out {reserve_out}, fee {fee_rate_bps} bps")]
    InvalidPoolState {
        reserve_in: BigUint,
        reserve_out: BigUint,
        fee_rate_bps: u32,
    },

    /// A value record violates its construction invariants
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Outputs spend more of an asset than the inputs hold
    #[error("Asset overspend for {asset_id}: requested {requested}, available {available}")]
    AssetOverspend {
        asset_id: String,
        requested: BigUint,
        available: BigUint,
    },

    /// Leftover assets would need a change output but there is no value to carry them
    #[error("{asset_count} leftover asset(s) need at least {minimum} of carrier value")]
    UncarriedAssets { asset_count: usize, minimum: BigUint },
}

fn unit_label(asset_id: &Option<String>) -> String {
    match asset_id {
        Some(id) => format!("asset {}", id),
        None => "value".to_string(),
    }
}

/// Discriminant of a [`LedgerError`], for matching without the payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedgerErrorKind {
    InsufficientFunds,
    NegativeChange,
    DustOutput,
    InvalidInput,
    InvalidPoolState,
    InvalidRecord,
    AssetOverspend,
    UncarriedAssets,
}

impl LedgerErrorKind {
    /// Stable identifier used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerErrorKind::InsufficientFunds => "insufficient_funds",
            LedgerErrorKind::NegativeChange => "negative_change",
            LedgerErrorKind::DustOutput => "dust_output",
            LedgerErrorKind::InvalidInput => "invalid_input",
            LedgerErrorKind::InvalidPoolState => "invalid_pool_state",
            LedgerErrorKind::InvalidRecord => "invalid_record",
            LedgerErrorKind::AssetOverspend => "asset_overspend",
            LedgerErrorKind::UncarriedAssets => "uncarried_assets",
        }
    }
}

impl fmt::Display for LedgerErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl LedgerError {
    /// Which failure this is
    pub fn kind(&self) -> LedgerErrorKind {
        match self {
            LedgerError::InsufficientFunds { .. } => LedgerErrorKind::InsufficientFunds,
            LedgerError::NegativeChange { .. } => LedgerErrorKind::NegativeChange,
            LedgerError::DustOutput { .. } => LedgerErrorKind::DustOutput,
            LedgerError::InvalidInput(_) => LedgerErrorKind::InvalidInput,
            LedgerError::InvalidPoolState { .. } => LedgerErrorKind::InvalidPoolState,
            LedgerError::InvalidRecord(_) => LedgerErrorKind::InvalidRecord,
            LedgerError::AssetOverspend { .. } => LedgerErrorKind::AssetOverspend,
            LedgerError::UncarriedAssets { .. } => LedgerErrorKind::UncarriedAssets,
        }
    }

    /// Shorthand for an [`LedgerError::InvalidInput`]
    pub fn invalid_input<S: Into<String>>(reason: S) -> Self {
        LedgerError::InvalidInput(reason.into())
    }

    /// Shorthand for an [`LedgerError::InvalidRecord`]
    pub fn invalid_record<S: Into<String>>(reason: S) -> Self {
        LedgerError::InvalidRecord(reason.into())
    }

    /// Message for people reading a terminal, with base values rendered in ERG
    pub fn user_message(&self) -> String {
        match self {
            LedgerError::InsufficientFunds { asset_id: None, required, available } => {
                format!("need {} ERG, have {} ERG", format_erg(required), format_erg(available))
            }
            LedgerError::InsufficientFunds { asset_id: Some(id), required, available } => {
                format!(
                    "need {} of token {}, have {}",
                    required,
                    sanitize_for_logging(id),
                    available
                )
            }
            LedgerError::NegativeChange { inputs, outputs, fee } => format!(
                "outputs ({} ERG) plus fee ({} ERG) exceed inputs ({} ERG)",
                format_erg(outputs),
                format_erg(fee),
                format_erg(inputs)
            ),
            LedgerError::DustOutput { value, minimum } => format!(
                "output of {} ERG is below the minimum box value of {} ERG",
                format_erg(value),
                format_erg(minimum)
            ),
            LedgerError::AssetOverspend { asset_id, requested, available } => format!(
                "outputs send {} of token {} but inputs only hold {}",
                requested,
                sanitize_for_logging(asset_id),
                available
            ),
            LedgerError::UncarriedAssets { asset_count, minimum } => format!(
                "{} leftover token(s) need a change box of at least {} ERG",
                asset_count,
                format_erg(minimum)
            ),
            other => other.to_string(),
        }
    }
}

/// The main error type for ErgoQuest
#[derive(Debug, Error)]
pub enum QuestError {
    /// Selection, balance or swap arithmetic failure
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Configuration errors
    #[error("Configuration error: {context}")]
    Config {
        context: String,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    /// I/O errors
    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {context}")]
    Serialization {
        context: String,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    /// Progress storage errors
    #[error("Progress error: {context}")]
    Progress {
        context: String,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },
}

/// Type alias for a Result with QuestError
pub type QuestResult<T> = Result<T, QuestError>;

/// Error category for logging purposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Ledger,
    Config,
    Io,
    Serialization,
    Progress,
}

impl ErrorCategory {
    /// Convert the error category to a string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Ledger => "Ledger",
            ErrorCategory::Config => "Config",
            ErrorCategory::Io => "Io",
            ErrorCategory::Serialization => "Serialization",
            ErrorCategory::Progress => "Progress",
        }
    }
}

impl QuestError {
    /// Get the category of this error for logging
    pub fn category(&self) -> ErrorCategory {
        match self {
            QuestError::Ledger(_) => ErrorCategory::Ledger,
            QuestError::Config { .. } => ErrorCategory::Config,
            QuestError::Io { .. } => ErrorCategory::Io,
            QuestError::Serialization { .. } => ErrorCategory::Serialization,
            QuestError::Progress { .. } => ErrorCategory::Progress,
        }
    }

    /// The ledger failure behind this error, if any
    pub fn ledger_kind(&self) -> Option<LedgerErrorKind> {
        match self {
            QuestError::Ledger(err) => Some(err.kind()),
            _ => None,
        }
    }

    /// Get a message suitable for displaying to users
    pub fn user_message(&self) -> String {
        match self {
            QuestError::Ledger(err) => err.user_message(),
            QuestError::Config { context, .. } => format!("Configuration error: {}", context),
            QuestError::Io { context, .. } => format!("File operation error: {}", context),
            QuestError::Serialization { context, .. } => format!("Data format error: {}", context),
            QuestError::Progress { context, .. } => format!("Progress could not be saved: {}", context),
        }
    }
}

/// Create a new configuration error with context
pub fn config_error<S: Into<String>>(context: S) -> QuestError {
    QuestError::Config {
        context: context.into(),
        source: None,
    }
}

/// Create a new progress error with context and source
pub fn progress_error_with_source<S: Into<String>, E: StdError + Send + Sync + 'static>(
    context: S,
    source: E,
) -> QuestError {
    QuestError::Progress {
        context: context.into(),
        source: Some(Box::new(source)),
    }
}

/// Attach context to an I/O result
pub fn with_io_context<T>(result: Result<T, io::Error>, context: impl Into<String>) -> QuestResult<T> {
    result.map_err(|err| QuestError::Io {
        context: context.into(),
        source: err,
    })
}

impl From<io::Error> for QuestError {
    fn from(err: io::Error) -> Self {
        QuestError::Io {
            context: err.to_string(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for QuestError {
    fn from(err: serde_json::Error) -> Self {
        QuestError::Serialization {
            context: format!("JSON serialization error: {}", err),
            source: Some(Box::new(err)),
        }
    }
}

impl From<toml::de::Error> for QuestError {
    fn from(err: toml::de::Error) -> Self {
        QuestError::Serialization {
            context: format!("TOML deserialization error: {}", err),
            source: Some(Box::new(err)),
        }
    }
}

impl From<toml::ser::Error> for QuestError {
    fn from(err: toml::ser::Error) -> Self {
        QuestError::Serialization {
            context: format!("TOML serialization error: {}", err),
            source: Some(Box::new(err)),
        }
    }
}
