use crate::config::FeeConfig;

/// `(last_block, last_fee_bps)` — the only state the fee policy carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeeState {
    pub last_block: u64,
    pub last_fee_bps: u32,
}

/// Inputs the fee composition needs beyond the previous state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeeInputs {
    pub conf_bps: u32,
    pub inv_dev_bps: u32,
    pub size_bps: u32,
    pub lvr_bps: u32,
    pub enable_size_fee: bool,
    pub enable_lvr_fee: bool,
}

fn decay_floor(state: FeeState, now_block: u64, cfg: &FeeConfig) -> u32 {
    let blocks_elapsed = now_block.saturating_sub(state.last_block);
    let decay_pct = (cfg.decay_pct_per_block as u64 * blocks_elapsed).min(100);
    let drop = (state.last_fee_bps as u64 * decay_pct) / 100;
    (state.last_fee_bps as u64 - drop) as u32
}

fn size_term(size_bps: u32, cfg: &FeeConfig) -> u32 {
    let lin = (cfg.gamma_size_lin_bps as u64 * size_bps as u64) / 10_000;
    let quad = (cfg.gamma_size_quad_bps as u64 * size_bps as u64 * size_bps as u64) / 100_000_000;
    ((lin + quad).min(cfg.size_fee_cap_bps as u64)) as u32
}

/// The fee composition broken into its named terms (§4.3's
/// `{fee_base, fee_vol, fee_inv, fee_size, fee_lvr, fee_total}`), emitted
/// verbatim on `Event::ConfidenceDebug` when `debug_emit` is set. `total_bps`
/// is the raw composed sum *before* the decay-floor `max` and cap `clamp`
/// `preview` applies next; the caller's final `fee_bps` can differ from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeeBreakdown {
    pub base_bps: u32,
    pub conf_bps: u32,
    pub inv_bps: u32,
    pub size_bps: u32,
    pub lvr_bps: u32,
    pub total_bps: u32,
}

fn compose_raw(inputs: &FeeInputs, cfg: &FeeConfig) -> (u32, FeeBreakdown) {
    let conf_term = (cfg.alpha_conf_num as u64 * inputs.conf_bps as u64) / cfg.alpha_conf_den as u64;
    let inv_term =
        (cfg.beta_inv_dev_num as u64 * inputs.inv_dev_bps as u64) / cfg.beta_inv_dev_den as u64;
    let size = if inputs.enable_size_fee {
        size_term(inputs.size_bps, cfg) as u64
    } else {
        0
    };
    let lvr = if inputs.enable_lvr_fee {
        (cfg.kappa_lvr_bps as u64 * inputs.lvr_bps as u64) / 10_000
    } else {
        0
    };
    let total = (cfg.base_bps as u64 + conf_term + inv_term + size + lvr).min(u32::MAX as u64) as u32;
    let breakdown = FeeBreakdown {
        base_bps: cfg.base_bps,
        conf_bps: conf_term.min(u32::MAX as u64) as u32,
        inv_bps: inv_term.min(u32::MAX as u64) as u32,
        size_bps: size.min(u32::MAX as u64) as u32,
        lvr_bps: lvr.min(u32::MAX as u64) as u32,
        total_bps: total,
    };
    (total, breakdown)
}

/// Pure preview: computes `(fee_bps, next_state, breakdown)` without
/// committing anything. Callers that only need the quote use this;
/// state-mutating paths additionally call `apply` (identical computation,
/// but the caller is the one that decides whether to persist `next_state`).
pub fn preview(
    state: FeeState,
    cfg: &FeeConfig,
    now_block: u64,
    inputs: &FeeInputs,
) -> (u32, FeeState, FeeBreakdown) {
    let decayed = decay_floor(state, now_block, cfg);
    let (raw, breakdown) = compose_raw(inputs, cfg);
    let fee = raw.max(decayed).clamp(cfg.base_bps, cfg.cap_bps);

    let next_state = FeeState {
        last_block: now_block,
        last_fee_bps: fee,
    };
    (fee, next_state, breakdown)
}

/// Adds a divergence haircut before the cap clamp is re-applied. Matches
/// "haircut is added before clamp" from the composition rule.
pub fn apply_haircut(fee_bps: u32, haircut_bps: u32, cfg: &FeeConfig) -> u32 {
    (fee_bps + haircut_bps).clamp(cfg.base_bps, cfg.cap_bps)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calm_cfg() -> FeeConfig {
        FeeConfig {
            base_bps: 15,
            alpha_conf_num: 60,
            alpha_conf_den: 100,
            beta_inv_dev_num: 10,
            beta_inv_dev_den: 100,
            cap_bps: 150,
            decay_pct_per_block: 20,
            ..Default::default()
        }
    }

    #[test]
    fn calm_pricing_matches_base_bps() {
        let cfg = calm_cfg();
        let state = FeeState::default();
        let (fee, _, _) = preview(state, &cfg, 1, &FeeInputs::default());
        assert_eq!(fee, 15);
    }

    #[test]
    fn repeated_calm_blocks_stay_at_base() {
        let cfg = calm_cfg();
        let mut state = FeeState::default();
        for block in 1..=5 {
            let (fee, next, _) = preview(state, &cfg, block, &FeeInputs::default());
            assert_eq!(fee, 15);
            state = next;
        }
    }

    #[test]
    fn confidence_spike_then_decay_bounded() {
        let cfg = calm_cfg();
        let spike_inputs = FeeInputs {
            conf_bps: 400,
            ..Default::default()
        };
        let (fee_spike, mut state, _) = preview(FeeState::default(), &cfg, 1, &spike_inputs);
        // conf term alone: 60*400/100 = 240, clamped to cap 150
        assert_eq!(fee_spike, 150);

        let mut block = 2u64;
        let mut last = fee_spike;
        loop {
            let (fee, next, _) = preview(state, &cfg, block, &FeeInputs::default());
            // decay never drops more than 20% of last_fee_bps per block
            let max_drop = (last as u64 * 20) / 100;
            assert!(last - fee <= max_drop as u32);
            state = next;
            last = fee;
            block += 1;
            if fee == 15 || block > 50 {
                break;
            }
        }
        assert_eq!(last, 15, "fee must converge back to base within bound");
    }

    /// Chains the real inventory formula into the fee policy for the
    /// documented 60/40 scenario instead of hardcoding `inv_dev_bps`: a
    /// 60-base/40-quote split against a 50/50 target at mid=1.0 produces
    /// `deviation_bps() == 1_000` (not the "~2000bps" figure in the prose
    /// worked example — see DESIGN.md's Open Questions), so the inventory
    /// term is `10*1_000/100 = 100` and the composed fee is `15+100 = 115`,
    /// well under the cap.
    #[test]
    fn inventory_deviation_scenario() {
        use dnmm_inventory::{deviation_bps, Reserves, TokenConfig};

        let cfg = calm_cfg();
        let tokens = TokenConfig {
            base_scale: 1_000_000_000_000_000_000,
            quote_scale: 1_000_000_000_000_000_000,
            base_decimals: 18,
            quote_decimals: 18,
        };
        let wad = 1_000_000_000_000_000_000u128;
        let reserves = Reserves {
            base_units: 60 * wad,
            quote_units: 40 * wad,
        };
        let dev = deviation_bps(reserves, 50 * wad, wad, tokens).unwrap();
        assert_eq!(dev.bps, 1_000);

        let inputs = FeeInputs {
            inv_dev_bps: dev.bps,
            ..Default::default()
        };
        let (fee, _, breakdown) = preview(FeeState::default(), &cfg, 1, &inputs);
        assert_eq!(breakdown.inv_bps, 100);
        assert_eq!(fee, 115);
    }

    #[test]
    fn cap_envelope_holds() {
        let cfg = calm_cfg();
        let inputs = FeeInputs {
            conf_bps: 10_000,
            inv_dev_bps: 10_000,
            ..Default::default()
        };
        let (fee, _, _) = preview(FeeState::default(), &cfg, 1, &inputs);
        assert!(fee >= cfg.base_bps);
        assert!(fee <= cfg.cap_bps);
    }

    #[test]
    fn haircut_applied_before_final_clamp() {
        let cfg = calm_cfg();
        let (fee, _, _) = preview(FeeState::default(), &cfg, 1, &FeeInputs::default());
        let with_haircut = apply_haircut(fee, 5, &cfg);
        assert_eq!(with_haircut, 20);
        // a huge haircut still respects the cap
        let huge = apply_haircut(fee, 10_000, &cfg);
        assert_eq!(huge, cfg.cap_bps);
    }

    #[test]
    fn fee_monotone_in_inventory_deviation() {
        let cfg = calm_cfg();
        let low = preview(
            FeeState::default(),
            &cfg,
            1,
            &FeeInputs {
                inv_dev_bps: 100,
                ..Default::default()
            },
        )
        .0;
        let high = preview(
            FeeState::default(),
            &cfg,
            1,
            &FeeInputs {
                inv_dev_bps: 500,
                ..Default::default()
            },
        )
        .0;
        assert!(high >= low);
    }
}
