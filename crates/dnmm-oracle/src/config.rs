use serde::{Deserialize, Serialize};

use crate::error::{OracleError, Result};

/// Freshness caps, divergence tiers, and blend weights for the two price
/// sources. Tier ordering (`accept <= soft <= hard`) is validated at
/// construction, not re-checked on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleConfig {
    #[serde(default = "default_max_age_sec")]
    pub max_age_sec: u64,
    #[serde(default = "default_stall_window_sec")]
    pub stall_window_sec: u64,
    #[serde(default = "default_conf_cap_bps_spot")]
    pub conf_cap_bps_spot: u32,
    #[serde(default = "default_conf_cap_bps_strict")]
    pub conf_cap_bps_strict: u32,
    /// Legacy single-cap divergence threshold, used when
    /// `enable_soft_divergence` is off.
    #[serde(default = "default_divergence_bps")]
    pub divergence_bps: u32,
    #[serde(default = "default_divergence_accept_bps")]
    pub divergence_accept_bps: u32,
    #[serde(default = "default_divergence_soft_bps")]
    pub divergence_soft_bps: u32,
    #[serde(default = "default_divergence_hard_bps")]
    pub divergence_hard_bps: u32,
    #[serde(default = "default_haircut_min_bps")]
    pub haircut_min_bps: u32,
    #[serde(default = "default_haircut_slope_bps")]
    pub haircut_slope_bps: u32,
    #[serde(default)]
    pub allow_ema_fallback: bool,
    #[serde(default = "default_weight")]
    pub weight_spread_bps: u32,
    #[serde(default = "default_weight")]
    pub weight_sigma_bps: u32,
    #[serde(default = "default_weight")]
    pub weight_secondary_conf_bps: u32,
    /// `lambda` for the sigma EWMA, in bps (10_000 = 1.0).
    #[serde(default = "default_sigma_ewma_lambda_bps")]
    pub sigma_ewma_lambda_bps: u32,
}

fn default_max_age_sec() -> u64 {
    30
}
fn default_stall_window_sec() -> u64 {
    60
}
fn default_conf_cap_bps_spot() -> u32 {
    50
}
fn default_conf_cap_bps_strict() -> u32 {
    100
}
fn default_divergence_bps() -> u32 {
    200
}
fn default_divergence_accept_bps() -> u32 {
    30
}
fn default_divergence_soft_bps() -> u32 {
    80
}
fn default_divergence_hard_bps() -> u32 {
    200
}
fn default_haircut_min_bps() -> u32 {
    5
}
fn default_haircut_slope_bps() -> u32 {
    20
}
fn default_weight() -> u32 {
    3_333
}
fn default_sigma_ewma_lambda_bps() -> u32 {
    9_000
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            max_age_sec: default_max_age_sec(),
            stall_window_sec: default_stall_window_sec(),
            conf_cap_bps_spot: default_conf_cap_bps_spot(),
            conf_cap_bps_strict: default_conf_cap_bps_strict(),
            divergence_bps: default_divergence_bps(),
            divergence_accept_bps: default_divergence_accept_bps(),
            divergence_soft_bps: default_divergence_soft_bps(),
            divergence_hard_bps: default_divergence_hard_bps(),
            haircut_min_bps: default_haircut_min_bps(),
            haircut_slope_bps: default_haircut_slope_bps(),
            allow_ema_fallback: false,
            weight_spread_bps: default_weight(),
            weight_sigma_bps: default_weight(),
            weight_secondary_conf_bps: default_weight(),
            sigma_ewma_lambda_bps: default_sigma_ewma_lambda_bps(),
        }
    }
}

impl OracleConfig {
    /// Enforces `accept <= soft <= hard` and that caps/weights are sane.
    /// Called once at `update_params`; never re-checked on the read path.
    pub fn validate(&self) -> Result<()> {
        if self.divergence_accept_bps > self.divergence_soft_bps
            || self.divergence_soft_bps > self.divergence_hard_bps
        {
            return Err(OracleError::InvalidConfig(
                "divergence tiers must satisfy accept <= soft <= hard",
            ));
        }
        if self.conf_cap_bps_spot > self.conf_cap_bps_strict {
            return Err(OracleError::InvalidConfig(
                "conf_cap_bps_spot must be <= conf_cap_bps_strict",
            ));
        }
        if self.sigma_ewma_lambda_bps > 10_000 {
            return Err(OracleError::InvalidConfig(
                "sigma_ewma_lambda_bps must be <= 10_000",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_keep_tier_ordering() {
        let cfg = OracleConfig::default();
        assert!(cfg.divergence_accept_bps <= cfg.divergence_soft_bps);
        assert!(cfg.divergence_soft_bps <= cfg.divergence_hard_bps);
    }

    #[test]
    fn deserializes_partial_toml() {
        let cfg: OracleConfig = toml::from_str("max_age_sec = 10\n").unwrap();
        assert_eq!(cfg.max_age_sec, 10);
        assert_eq!(cfg.stall_window_sec, 60);
    }

    #[test]
    fn defaults_validate() {
        assert!(OracleConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_inverted_tiers() {
        let cfg = OracleConfig {
            divergence_accept_bps: 100,
            divergence_soft_bps: 50,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
