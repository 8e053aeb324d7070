use dnmm_core::{abs_diff, to_bps};
use dnmm_inventory::{fifty_fifty_target_base, Reserves, TokenConfig};

use crate::error::Result;

/// `to_bps(|mid - p_hat|, p_hat) >= threshold_pct * 100`.
pub fn drift_exceeds_threshold(
    mid_wad: u128,
    last_rebalance_price_wad: u128,
    threshold_pct: u16,
) -> Result<bool> {
    if last_rebalance_price_wad == 0 {
        return Ok(true);
    }
    let delta = abs_diff(mid_wad, last_rebalance_price_wad);
    let delta_bps = to_bps(delta, last_rebalance_price_wad)?;
    Ok(delta_bps >= threshold_pct as u64 * 100)
}

/// The outcome of a recenter attempt: new target base, and the mid it was
/// computed against (becomes the new `last_rebalance_price`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecenterOutcome {
    pub old_target_base: u128,
    pub new_target_base: u128,
    pub mid_wad: u128,
}

/// Recomputes `target_base_xstar` from current reserves at `mid_wad`. Used
/// identically by the auto path (after a settling swap) and the manual
/// `rebalance_target` entry point; callers are responsible for their own
/// threshold/cooldown gating before calling this.
pub fn recenter(
    reserves: Reserves,
    old_target_base: u128,
    mid_wad: u128,
    tokens: TokenConfig,
) -> Result<RecenterOutcome> {
    let new_target_base = fifty_fifty_target_base(reserves, mid_wad, tokens)?;
    Ok(RecenterOutcome {
        old_target_base,
        new_target_base,
        mid_wad,
    })
}
