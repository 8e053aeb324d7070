/// `fee_bps = max(fee_bps, beta_floor_bps + alpha_bbo_bps * spread_bps / 10_000)`.
pub fn bbo_floor(fee_bps: u32, spread_bps: u32, beta_floor_bps: u32, alpha_bbo_bps: u32) -> u32 {
    let floor = beta_floor_bps + (alpha_bbo_bps as u64 * spread_bps as u64 / 10_000) as u32;
    fee_bps.max(floor)
}

/// Signed inventory tilt applied to widen the side that would deepen
/// imbalance and tighten the side that rebalances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tilt {
    pub ask_bps: i32,
    pub bid_bps: i32,
}

/// `tilt_bps = clamp(tilt_bps_per_1pct * dev_pct, -tilt_max_bps, +tilt_max_bps)`,
/// then scaled by the confidence/spread weights and signed so the heavy
/// side widens and the light side tightens.
pub fn inventory_tilt(
    dev_bps: u32,
    base_heavy: bool,
    conf_bps: u32,
    spread_bps: u32,
    tilt_bps_per_1pct: u32,
    tilt_max_bps: u32,
    tilt_conf_weight_bps: u32,
    tilt_spread_weight_bps: u32,
) -> Tilt {
    let dev_pct = dev_bps / 100;
    let raw = (tilt_bps_per_1pct * dev_pct).min(tilt_max_bps) as i64;

    let conf_scale = tilt_conf_weight_bps as i64 * conf_bps.min(10_000) as i64 / 10_000;
    let spread_scale = tilt_spread_weight_bps as i64 * spread_bps.min(10_000) as i64 / 10_000;
    let scale = (conf_scale + spread_scale).max(1).min(10_000);
    let magnitude = (raw * scale / 10_000) as i32;

    // Base-heavy pool: widen the ask (discourage more base in), tighten the bid.
    // Base-light pool: the reverse.
    if base_heavy {
        Tilt {
            ask_bps: magnitude,
            bid_bps: -magnitude,
        }
    } else {
        Tilt {
            ask_bps: -magnitude,
            bid_bps: magnitude,
        }
    }
}
