use serde::{Deserialize, Serialize};

use crate::error::{InventoryError, Result};

/// Token pair scales. Immutable once a pool is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    /// `10^base_decimals`, the WAD-to-native-unit conversion factor for the
    /// base token.
    #[serde(default = "default_scale")]
    pub base_scale: u128,
    /// `10^quote_decimals`.
    #[serde(default = "default_scale")]
    pub quote_scale: u128,
    #[serde(default = "default_decimals")]
    pub base_decimals: u8,
    #[serde(default = "default_decimals")]
    pub quote_decimals: u8,
}

fn default_scale() -> u128 {
    1_000_000_000_000_000_000
}

fn default_decimals() -> u8 {
    18
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            base_scale: default_scale(),
            quote_scale: default_scale(),
            base_decimals: default_decimals(),
            quote_decimals: default_decimals(),
        }
    }
}

/// Inventory floor, recentering, and tilt parameters.
///
/// `target_base_xstar` is mutable only through the recenter protocol in
/// `dnmm-pricing`/`dnmm-pool`; every other field here is replaced wholesale
/// via `update_params`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryConfig {
    /// Base-unit quantity at which a 50/50 notional split holds at the
    /// current mid. Mutated only by the recenter protocol.
    #[serde(default)]
    pub target_base_xstar: u128,
    /// Minimum fraction of a reserve, in bps, that must remain after any
    /// swap. Must be `<= 10_000`.
    #[serde(default = "default_floor_bps")]
    pub floor_bps: u16,
    /// Minimum mid drift, in percent, required before a recenter is
    /// permitted.
    #[serde(default = "default_recenter_threshold_pct")]
    pub recenter_threshold_pct: u16,
    /// Minimum seconds between recenters.
    #[serde(default = "default_recenter_cooldown_sec")]
    pub recenter_cooldown_sec: u64,
    /// `inv_tilt_bps_per_1pct` from the tilt formula.
    #[serde(default = "default_tilt_bps_per_1pct")]
    pub tilt_bps_per_1pct: u32,
    /// `inv_tilt_max_bps`, the clamp applied to the raw tilt.
    #[serde(default = "default_tilt_max_bps")]
    pub tilt_max_bps: u32,
    /// `tilt_conf_weight_bps`, scales tilt by confidence.
    #[serde(default = "default_tilt_conf_weight_bps")]
    pub tilt_conf_weight_bps: u32,
    /// `tilt_spread_weight_bps`, scales tilt by spread.
    #[serde(default = "default_tilt_spread_weight_bps")]
    pub tilt_spread_weight_bps: u32,
}

fn default_floor_bps() -> u16 {
    300
}

fn default_recenter_threshold_pct() -> u16 {
    5
}

fn default_recenter_cooldown_sec() -> u64 {
    3_600
}

fn default_tilt_bps_per_1pct() -> u32 {
    10
}

fn default_tilt_max_bps() -> u32 {
    50
}

fn default_tilt_conf_weight_bps() -> u32 {
    10_000
}

fn default_tilt_spread_weight_bps() -> u32 {
    10_000
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            target_base_xstar: 0,
            floor_bps: default_floor_bps(),
            recenter_threshold_pct: default_recenter_threshold_pct(),
            recenter_cooldown_sec: default_recenter_cooldown_sec(),
            tilt_bps_per_1pct: default_tilt_bps_per_1pct(),
            tilt_max_bps: default_tilt_max_bps(),
            tilt_conf_weight_bps: default_tilt_conf_weight_bps(),
            tilt_spread_weight_bps: default_tilt_spread_weight_bps(),
        }
    }
}

impl InventoryConfig {
    pub fn validate(&self) -> Result<()> {
        if self.floor_bps as u32 > 10_000 {
            return Err(InventoryError::InvalidConfig("floor_bps must be <= 10_000"));
        }
        Ok(())
    }
}

impl TokenConfig {
    pub fn validate(&self) -> Result<()> {
        if self.base_scale == 0 || self.quote_scale == 0 {
            return Err(InventoryError::InvalidConfig("token scales must be > 0"));
        }
        Ok(())
    }
}
