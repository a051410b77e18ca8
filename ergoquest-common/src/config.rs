//! Configuration management for ErgoQuest.
//!
//! Settings are stored in TOML. Every section has defaults matching the
//! tutorial's constants, so an empty file is a valid configuration.
//!
//! ```toml
//! [ledger]
//! min_box_value = 1000000
//! default_fee = 1100000
//!
//! [selection]
//! strategy = "first-fit"
//!
//! [swap]
//! fee_rate_bps = 30
//! slippage_bps = 50
//!
//! [logging]
//! level = "Info"
//! ```

use anyhow::{anyhow, Context, Result};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fs;
use std::path::Path;

use crate::balance::BalanceCalculator;
use crate::logging::{log_config, LogConfig, LogLevel};
use crate::selection::SelectionStrategy;
use crate::swap::BasisPoints;
use crate::types::{BPS_SCALE, RECOMMENDED_MIN_FEE_VALUE, SAFE_MIN_BOX_VALUE};

/// Main configuration structure for ErgoQuest
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub ledger: LedgerConfig,

    #[serde(default)]
    pub selection: SelectionConfig,

    #[serde(default)]
    pub swap: SwapConfig,

    #[serde(default)]
    pub logging: LogConfig,
}

/// Ledger constants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Minimum carrier value of any output, in nanoERG
    #[serde(default = "default_min_box_value")]
    pub min_box_value: u64,

    /// Fee attached to lesson transactions, in nanoERG
    #[serde(default = "default_fee")]
    pub default_fee: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            min_box_value: default_min_box_value(),
            default_fee: default_fee(),
        }
    }
}

/// Input selection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Strategy name (first-fit, largest-first)
    #[serde(default = "default_strategy")]
    pub strategy: String,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
        }
    }
}

/// AMM settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapConfig {
    /// Pool fee in basis points
    #[serde(default = "default_fee_rate_bps")]
    pub fee_rate_bps: u32,

    /// Tolerated slippage in basis points
    #[serde(default = "default_slippage_bps")]
    pub slippage_bps: u32,
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            fee_rate_bps: default_fee_rate_bps(),
            slippage_bps: default_slippage_bps(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path).with_context(|| format!("Failed to read config file {}", path))?;

        let config: Config =
            toml::from_str(&content).map_err(|e| anyhow!("Failed to parse config file: {}", e))?;

        log_config(LogLevel::Debug, "configuration loaded", Some(json!({ "path": path })));

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| anyhow!("Failed to serialize config: {}", e))?;

        fs::write(path, content).map_err(|e| anyhow!("Failed to write config file: {}", e))?;

        log_config(
            LogLevel::Info,
            "configuration saved",
            Some(json!({
                "path": path,
                "strategy": self.selection.strategy,
                "fee_rate_bps": self.swap.fee_rate_bps,
            })),
        );

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.ledger.min_box_value == 0 {
            return Err(anyhow!("Invalid min_box_value: must be greater than 0"));
        }

        if self.swap.fee_rate_bps >= BPS_SCALE {
            return Err(anyhow!(
                "Invalid fee_rate_bps: must be below {}, got {}",
                BPS_SCALE,
                self.swap.fee_rate_bps
            ));
        }

        self.slippage()?;
        self.strategy()?;

        Ok(())
    }

    /// Configured selection strategy
    pub fn strategy(&self) -> Result<SelectionStrategy> {
        self.selection
            .strategy
            .parse::<SelectionStrategy>()
            .map_err(|e| anyhow!("Invalid selection strategy: {}", e))
    }

    /// Configured slippage tolerance
    pub fn slippage(&self) -> Result<BasisPoints> {
        BasisPoints::new(self.swap.slippage_bps).map_err(|e| anyhow!("Invalid slippage_bps: {}", e))
    }

    /// Minimum carrier value as a big integer
    pub fn min_box_value(&self) -> BigUint {
        BigUint::from(self.ledger.min_box_value)
    }

    /// Default fee as a big integer
    pub fn default_fee(&self) -> BigUint {
        BigUint::from(self.ledger.default_fee)
    }

    /// Balance calculator enforcing the configured carrier minimum
    pub fn balance_calculator(&self) -> BalanceCalculator {
        BalanceCalculator::new(self.min_box_value())
    }
}

/// Ensure a configuration file exists at the specified path
/// If it doesn't exist, create it with default values
pub fn ensure_config_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        let default_config = Config::default();
        let content = toml::to_string_pretty(&default_config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| anyhow!("Failed to create config directory: {}", e))?;
            }
        }

        fs::write(path, content).map_err(|e| anyhow!("Failed to write default config file: {}", e))?;
    }

    Ok(())
}

// Default value functions

fn default_min_box_value() -> u64 {
    SAFE_MIN_BOX_VALUE
}

fn default_fee() -> u64 {
    RECOMMENDED_MIN_FEE_VALUE
}

fn default_strategy() -> String {
    SelectionStrategy::FirstFit.as_str().to_string()
}

fn default_fee_rate_bps() -> u32 {
    30
}

fn default_slippage_bps() -> u32 {
    50
}
