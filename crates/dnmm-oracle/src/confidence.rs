use dnmm_core::{abs_diff, to_bps};

use crate::config::OracleConfig;
use crate::error::Result;
use crate::facade::CapRegime;

/// EWMA of absolute block-to-block mid returns, updated at most once per
/// block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfidenceState {
    pub sigma_bps: u64,
    pub last_observed_mid_wad: u128,
    pub last_block: u64,
}

impl ConfidenceState {
    /// Advances sigma if `block_number` is newer than the last update;
    /// returns the (possibly unchanged) state and the ewma sigma to use
    /// for this call. Never mutates more than once per block.
    pub fn observe(&self, mid_wad: u128, block_number: u64, cfg: &OracleConfig) -> Result<Self> {
        if block_number <= self.last_block && self.last_block != 0 {
            return Ok(*self);
        }
        if self.last_observed_mid_wad == 0 {
            return Ok(Self {
                sigma_bps: self.sigma_bps,
                last_observed_mid_wad: mid_wad,
                last_block: block_number,
            });
        }
        let diff = abs_diff(mid_wad, self.last_observed_mid_wad);
        let ret_bps = to_bps(diff, self.last_observed_mid_wad)?;
        let lambda_bps = cfg.sigma_ewma_lambda_bps as u64;
        let new_sigma = (lambda_bps * self.sigma_bps + (10_000 - lambda_bps) * ret_bps) / 10_000;
        Ok(Self {
            sigma_bps: new_sigma,
            last_observed_mid_wad: mid_wad,
            last_block: block_number,
        })
    }
}

/// Decomposed confidence terms, emitted verbatim when `debug_emit` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfidenceBreakdown {
    pub conf_spread_bps: u32,
    pub conf_sigma_bps: u32,
    pub conf_secondary_bps: u32,
    pub conf_blended_bps: u32,
}

/// Blends spread, rolling sigma, and secondary-source confidence into one
/// bps figure, clamped to the cap appropriate for the active regime.
#[allow(clippy::too_many_arguments)]
pub fn blend_confidence(
    spread_bps: u32,
    sigma_bps: u64,
    secondary_conf_bps: u32,
    regime: CapRegime,
    cfg: &OracleConfig,
    blend_on: bool,
) -> ConfidenceBreakdown {
    let cap = match regime {
        CapRegime::Spot => cfg.conf_cap_bps_spot,
        CapRegime::Strict => cfg.conf_cap_bps_strict,
    };

    if !blend_on {
        let blended = spread_bps.min(cap);
        return ConfidenceBreakdown {
            conf_spread_bps: spread_bps,
            conf_sigma_bps: 0,
            conf_secondary_bps: 0,
            conf_blended_bps: blended,
        };
    }

    let secondary_term = if regime == CapRegime::Strict {
        secondary_conf_bps
    } else {
        0
    };

    let weighted = (cfg.weight_spread_bps as u64 * spread_bps as u64
        + cfg.weight_sigma_bps as u64 * sigma_bps
        + cfg.weight_secondary_conf_bps as u64 * secondary_term as u64)
        / 10_000;

    let blended = (weighted.min(cap as u64)) as u32;

    ConfidenceBreakdown {
        conf_spread_bps: spread_bps,
        conf_sigma_bps: sigma_bps.min(u32::MAX as u64) as u32,
        conf_secondary_bps: secondary_term,
        conf_blended_bps: blended,
    }
}
