use dnmm_core::AomqTrigger;
use dnmm_inventory::{solve_exact_in_capped, FillResult, InventoryConfig, Reserves, TokenConfig};

use crate::config::AomqConfig;
use crate::error::Result;

/// `available_bps <= floor_epsilon_bps`: the output-side reserve is already
/// sitting inside the defensive band above its floor, independent of the
/// size of the trade being priced.
pub fn floor_trigger(reserve_out_pre: u128, floor_bps: u16, floor_epsilon_bps: u32) -> Result<bool> {
    if reserve_out_pre == 0 {
        return Ok(true);
    }
    let available = dnmm_inventory::available_inventory(reserve_out_pre, floor_bps)?;
    let available_bps = dnmm_core::to_bps(available, reserve_out_pre)? as u32;
    Ok(available_bps <= floor_epsilon_bps)
}

/// Picks the single trigger to report when more than one condition holds.
/// Preserved precedence: an active soft-divergence route always wins (it is
/// itself an oracle-quality signal), then near-floor, then a plain fallback
/// source. This ordering is an implementation choice recorded in DESIGN.md;
/// the spec does not mandate one.
pub fn select_trigger(
    soft_divergence_routed: bool,
    near_floor: bool,
    used_fallback: bool,
) -> Option<AomqTrigger> {
    if soft_divergence_routed {
        Some(AomqTrigger::Soft)
    } else if near_floor {
        Some(AomqTrigger::Floor)
    } else if used_fallback {
        Some(AomqTrigger::Fallback)
    } else {
        None
    }
}

/// Converts the AOMQ target notional (WAD, quote-denominated) into native
/// units of whatever side is being paid out.
fn target_out_native(
    is_base_in: bool,
    min_quote_notional_wad: u128,
    mid_wad: u128,
    tokens: TokenConfig,
) -> Result<u128> {
    use dnmm_core::{mul_div_down, wad_div_down, WAD};
    if is_base_in {
        Ok(mul_div_down(min_quote_notional_wad, tokens.quote_scale, WAD)?)
    } else {
        let base_wad = wad_div_down(min_quote_notional_wad, mid_wad)?;
        Ok(mul_div_down(base_wad, tokens.base_scale, WAD)?)
    }
}

/// Clamps to the AOMQ micro-quote: output pinned to (at most) the
/// configured notional, fee bumped to at least `emergency_spread_bps`
/// subject to the fee cap. The floor is still respected — the clamp can
/// only ever shrink the output further, never exceed what the floor
/// allows.
pub fn clamp(
    reserves: Reserves,
    is_base_in: bool,
    requested_in: u128,
    mid_wad: u128,
    fee_bps: u32,
    fee_cap_bps: u32,
    tokens: TokenConfig,
    inv_cfg: InventoryConfig,
    cfg: &AomqConfig,
) -> Result<(FillResult, u32)> {
    let bumped_fee = fee_bps.max(cfg.emergency_spread_bps).min(fee_cap_bps);
    let target_out = target_out_native(is_base_in, cfg.min_quote_notional, mid_wad, tokens)?;
    let fill = solve_exact_in_capped(
        reserves,
        is_base_in,
        requested_in,
        mid_wad,
        bumped_fee,
        tokens,
        inv_cfg,
        target_out,
    )?;
    Ok((fill, bumped_fee))
}
