use serde::{Deserialize, Serialize};

use crate::error::{FeeError, Result};

/// Fee composition weights, decay rate, and cap. All numerator/denominator
/// pairs are validated nonzero at construction via `validate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeConfig {
    #[serde(default = "default_base_bps")]
    pub base_bps: u32,
    #[serde(default = "default_alpha_num")]
    pub alpha_conf_num: u32,
    #[serde(default = "default_alpha_den")]
    pub alpha_conf_den: u32,
    #[serde(default = "default_beta_num")]
    pub beta_inv_dev_num: u32,
    #[serde(default = "default_beta_den")]
    pub beta_inv_dev_den: u32,
    #[serde(default = "default_cap_bps")]
    pub cap_bps: u32,
    #[serde(default = "default_decay_pct_per_block")]
    pub decay_pct_per_block: u32,
    #[serde(default)]
    pub gamma_size_lin_bps: u32,
    #[serde(default)]
    pub gamma_size_quad_bps: u32,
    #[serde(default = "default_size_fee_cap_bps")]
    pub size_fee_cap_bps: u32,
    #[serde(default)]
    pub kappa_lvr_bps: u32,
}

fn default_base_bps() -> u32 {
    15
}
fn default_alpha_num() -> u32 {
    60
}
fn default_alpha_den() -> u32 {
    100
}
fn default_beta_num() -> u32 {
    10
}
fn default_beta_den() -> u32 {
    100
}
fn default_cap_bps() -> u32 {
    150
}
fn default_decay_pct_per_block() -> u32 {
    20
}
fn default_size_fee_cap_bps() -> u32 {
    50
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            base_bps: default_base_bps(),
            alpha_conf_num: default_alpha_num(),
            alpha_conf_den: default_alpha_den(),
            beta_inv_dev_num: default_beta_num(),
            beta_inv_dev_den: default_beta_den(),
            cap_bps: default_cap_bps(),
            decay_pct_per_block: default_decay_pct_per_block(),
            gamma_size_lin_bps: 0,
            gamma_size_quad_bps: 0,
            size_fee_cap_bps: default_size_fee_cap_bps(),
            kappa_lvr_bps: 0,
        }
    }
}

impl FeeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.base_bps > self.cap_bps {
            return Err(FeeError::InvalidConfig("base_bps must be <= cap_bps"));
        }
        if self.alpha_conf_den == 0 || self.beta_inv_dev_den == 0 {
            return Err(FeeError::InvalidConfig("denominators must be nonzero"));
        }
        if self.decay_pct_per_block > 100 {
            return Err(FeeError::InvalidConfig("decay_pct_per_block must be <= 100"));
        }
        Ok(())
    }
}

/// BBO-floor and maker-quote parameters (`s0_notional_wad` is the
/// normalizing notional used to compute `size_bps`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MakerConfig {
    #[serde(default = "default_s0_notional_wad")]
    pub s0_notional_wad: u128,
    #[serde(default = "default_ttl_ms")]
    pub ttl_ms: u32,
    #[serde(default = "default_alpha_bbo_bps")]
    pub alpha_bbo_bps: u32,
    #[serde(default = "default_beta_floor_bps")]
    pub beta_floor_bps: u32,
}

fn default_s0_notional_wad() -> u128 {
    1_000 * dnmm_core::WAD
}
fn default_ttl_ms() -> u32 {
    2_000
}
fn default_alpha_bbo_bps() -> u32 {
    5_000
}
fn default_beta_floor_bps() -> u32 {
    5
}

impl Default for MakerConfig {
    fn default() -> Self {
        Self {
            s0_notional_wad: default_s0_notional_wad(),
            ttl_ms: default_ttl_ms(),
            alpha_bbo_bps: default_alpha_bbo_bps(),
            beta_floor_bps: default_beta_floor_bps(),
        }
    }
}

impl MakerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.s0_notional_wad == 0 {
            return Err(FeeError::InvalidConfig("s0_notional_wad must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(FeeConfig::default().validate().is_ok());
        assert!(MakerConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_base_above_cap() {
        let cfg = FeeConfig {
            base_bps: 200,
            cap_bps: 150,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn deserializes_partial_toml() {
        let cfg: FeeConfig = toml::from_str("cap_bps = 500\n").unwrap();
        assert_eq!(cfg.cap_bps, 500);
        assert_eq!(cfg.base_bps, 15);
    }
}
