use serde::{Deserialize, Serialize};

use crate::error::{PricingError, Result};

/// Defensive micro-quote clamp parameters (§4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AomqConfig {
    /// Target output notional (native quote units) the clamp aims for.
    #[serde(default = "default_min_quote_notional")]
    pub min_quote_notional: u128,
    /// Fee floor applied while AOMQ is active.
    #[serde(default = "default_emergency_spread_bps")]
    pub emergency_spread_bps: u32,
    /// Distance from the floor, in bps of the output-side reserve, that
    /// triggers the `FLOOR` AOMQ reason. Must be `<= 10_000`.
    #[serde(default = "default_floor_epsilon_bps")]
    pub floor_epsilon_bps: u32,
}

fn default_min_quote_notional() -> u128 {
    1_000 * dnmm_core::WAD
}
fn default_emergency_spread_bps() -> u32 {
    100
}
fn default_floor_epsilon_bps() -> u32 {
    50
}

impl Default for AomqConfig {
    fn default() -> Self {
        Self {
            min_quote_notional: default_min_quote_notional(),
            emergency_spread_bps: default_emergency_spread_bps(),
            floor_epsilon_bps: default_floor_epsilon_bps(),
        }
    }
}

impl AomqConfig {
    pub fn validate(&self) -> Result<()> {
        if self.floor_epsilon_bps > 10_000 {
            return Err(PricingError::InvalidConfig("floor_epsilon_bps must be <= 10_000"));
        }
        Ok(())
    }
}

/// Preview-snapshot freshness and cooldown rules (§4.9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewConfig {
    #[serde(default = "default_preview_max_age_sec")]
    pub max_age_sec: u64,
    #[serde(default = "default_snapshot_cooldown_sec")]
    pub snapshot_cooldown_sec: u64,
    #[serde(default = "default_revert_on_stale")]
    pub revert_on_stale: bool,
    #[serde(default)]
    pub enable_preview_fresh: bool,
}

fn default_preview_max_age_sec() -> u64 {
    12
}
fn default_snapshot_cooldown_sec() -> u64 {
    6
}
fn default_revert_on_stale() -> bool {
    true
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            max_age_sec: default_preview_max_age_sec(),
            snapshot_cooldown_sec: default_snapshot_cooldown_sec(),
            revert_on_stale: default_revert_on_stale(),
            enable_preview_fresh: false,
        }
    }
}

impl PreviewConfig {
    pub fn validate(&self) -> Result<()> {
        if self.snapshot_cooldown_sec > self.max_age_sec {
            return Err(PricingError::InvalidConfig(
                "snapshot_cooldown_sec must be <= max_age_sec",
            ));
        }
        Ok(())
    }
}

/// Flip-only feature gates, mutated only via `update_params`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlags {
    #[serde(default = "default_true")]
    pub blend_on: bool,
    #[serde(default = "default_true")]
    pub enable_soft_divergence: bool,
    #[serde(default)]
    pub enable_size_fee: bool,
    #[serde(default = "default_true")]
    pub enable_bbo_floor: bool,
    #[serde(default = "default_true")]
    pub enable_inv_tilt: bool,
    #[serde(default)]
    pub enable_aomq: bool,
    #[serde(default)]
    pub enable_rebates: bool,
    #[serde(default)]
    pub enable_auto_recenter: bool,
    #[serde(default)]
    pub enable_lvr_fee: bool,
    #[serde(default)]
    pub debug_emit: bool,
}

fn default_true() -> bool {
    true
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            blend_on: true,
            enable_soft_divergence: true,
            enable_size_fee: false,
            enable_bbo_floor: true,
            enable_inv_tilt: true,
            enable_aomq: false,
            enable_rebates: false,
            enable_auto_recenter: false,
            enable_lvr_fee: false,
            debug_emit: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(AomqConfig::default().validate().is_ok());
        assert!(PreviewConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_cooldown_above_max_age() {
        let cfg = PreviewConfig {
            max_age_sec: 5,
            snapshot_cooldown_sec: 10,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn feature_flags_deserialize_partial_toml() {
        let flags: FeatureFlags = toml::from_str("enable_aomq = true\n").unwrap();
        assert!(flags.enable_aomq);
        // untouched fields keep their defaults
        assert!(flags.blend_on);
    }
}
