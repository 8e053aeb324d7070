use dnmm_core::BlockCursor;
use dnmm_fee::{bbo_floor, inventory_tilt, FeeConfig, FeeInputs, FeeState, MakerConfig};
use dnmm_inventory::{
    deviation_bps, input_notional_wad, solve_exact_in, InventoryConfig, Reserves, TokenConfig,
};
use dnmm_oracle::{
    blend_confidence, divergence_gate, guard_timestamp, select_mid, CapRegime, ConfidenceBreakdown,
    ConfidenceState, DivergenceOutcome, OracleConfig, OracleData, SelectReason,
};

use crate::aomq;
use crate::config::{AomqConfig, FeatureFlags};
use crate::error::{PricingError, Result};
use crate::lvr::LvrEstimator;
use crate::types::{regime_code, QuoteReason, QuoteResult};

/// Everything immutable the pricing pass needs, borrowed from the pool's
/// current parameter blocks.
pub struct PricingConfig<'a> {
    pub tokens: TokenConfig,
    pub inventory: InventoryConfig,
    pub oracle: &'a OracleConfig,
    pub fee: &'a FeeConfig,
    pub maker: &'a MakerConfig,
    pub aomq: &'a AomqConfig,
    pub flags: &'a FeatureFlags,
}

/// The mutable sub-state a pricing pass reads and (if mutating) advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingState {
    pub fee_state: FeeState,
    pub confidence_state: ConfidenceState,
}

/// Everything about a pricing pass that depends on the oracle reading but
/// not on the trade's size or side. `resolve_context` derives this once;
/// `preview_ladder` freezes it into a `PreviewSnapshot` and reconstructs it
/// later without touching a live `OracleData` again (§4.9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingContext {
    pub mid_wad: u128,
    pub used_fallback: bool,
    pub select_reason: SelectReason,
    pub regime: CapRegime,
    pub primary_spread_bps: u32,
    pub haircut_bps: u32,
    pub divergence_bps: Option<u32>,
    pub soft_routed: bool,
    pub confidence: ConfidenceBreakdown,
    pub confidence_state_next: ConfidenceState,
}

/// Oracle selection, divergence gate, and confidence blend — the half of a
/// pricing pass that a trade's `amount_in`/`is_base_in` never touches.
pub fn resolve_context(
    oracle_data: &OracleData,
    cfg: &PricingConfig,
    confidence_state: ConfidenceState,
    block: BlockCursor,
    last_observed_ts_sec: u64,
) -> Result<PricingContext> {
    guard_timestamp(block.block_ts_sec, last_observed_ts_sec)?;

    let selection = select_mid(oracle_data, cfg.oracle)?;
    let used_fallback = selection.reason != SelectReason::None;

    let divergence_outcome =
        divergence_gate(selection.mid_wad, &oracle_data.secondary, cfg.oracle, cfg.flags.enable_soft_divergence)?;

    let (haircut_bps, divergence_bps, soft_routed) = match divergence_outcome {
        DivergenceOutcome::Accept => (0u32, None, false),
        DivergenceOutcome::Haircut {
            fee_add_bps,
            delta_bps,
        } => (fee_add_bps, Some(delta_bps), false),
        DivergenceOutcome::RouteToAomq { delta_bps } => {
            if !cfg.flags.enable_aomq {
                return Err(PricingError::OracleDiverged {
                    delta_bps,
                    cap_bps: cfg.oracle.divergence_hard_bps,
                });
            }
            (0u32, Some(delta_bps), true)
        }
        DivergenceOutcome::Reject { delta_bps, cap_bps } => {
            return Err(PricingError::OracleDiverged { delta_bps, cap_bps })
        }
    };

    let confidence_state_next = confidence_state.observe(selection.mid_wad, block.block_number, cfg.oracle)?;

    let confidence = blend_confidence(
        oracle_data.primary.spread_bps,
        confidence_state_next.sigma_bps,
        oracle_data.secondary.conf_bps,
        selection.regime,
        cfg.oracle,
        cfg.flags.blend_on,
    );

    Ok(PricingContext {
        mid_wad: selection.mid_wad,
        used_fallback,
        select_reason: selection.reason,
        regime: selection.regime,
        primary_spread_bps: oracle_data.primary.spread_bps,
        haircut_bps,
        divergence_bps,
        soft_routed,
        confidence,
        confidence_state_next,
    })
}

/// The size/side-dependent half of a pricing pass: fee composition, the
/// exact-in solver, and the AOMQ clamp, run against an already-resolved
/// `PricingContext` instead of a live oracle reading. `preview_ladder`
/// calls this directly against a frozen snapshot's context; `price` calls
/// it against a freshly resolved one.
#[allow(clippy::too_many_arguments)]
pub fn price_with_context(
    ctx: &PricingContext,
    reserves: Reserves,
    target_base_xstar: u128,
    cfg: &PricingConfig,
    fee_state: FeeState,
    amount_in: u128,
    is_base_in: bool,
    now_block: u64,
    lvr_estimator: &dyn LvrEstimator,
) -> Result<(QuoteResult, FeeState)> {
    let deviation = deviation_bps(reserves, target_base_xstar, ctx.mid_wad, cfg.tokens)?;

    let notional_wad = input_notional_wad(is_base_in, amount_in, ctx.mid_wad, cfg.tokens)?;
    let size_bps = dnmm_core::to_bps(notional_wad, cfg.maker.s0_notional_wad)?.min(u32::MAX as u64) as u32;

    let lvr_bps = if cfg.flags.enable_lvr_fee {
        lvr_estimator.estimate_bps(ctx.mid_wad, ctx.confidence_state_next.sigma_bps, notional_wad)
    } else {
        0
    };

    let fee_inputs = FeeInputs {
        conf_bps: ctx.confidence.conf_blended_bps,
        inv_dev_bps: deviation.bps as u32,
        size_bps,
        lvr_bps,
        enable_size_fee: cfg.flags.enable_size_fee,
        enable_lvr_fee: cfg.flags.enable_lvr_fee,
    };
    let (mut fee_bps, fee_state_next, fee_breakdown) = dnmm_fee::preview(fee_state, cfg.fee, now_block, &fee_inputs);

    if ctx.haircut_bps > 0 {
        fee_bps = dnmm_fee::apply_haircut(fee_bps, ctx.haircut_bps, cfg.fee);
    }

    if cfg.flags.enable_inv_tilt {
        let tilt = inventory_tilt(
            deviation.bps as u32,
            deviation.base_heavy,
            ctx.confidence.conf_blended_bps,
            ctx.primary_spread_bps,
            cfg.inventory.tilt_bps_per_1pct,
            cfg.inventory.tilt_max_bps,
            cfg.inventory.tilt_conf_weight_bps,
            cfg.inventory.tilt_spread_weight_bps,
        );
        // base-in: taker sells base to the pool, i.e. hits the pool's bid.
        let tilt_bps = if is_base_in { tilt.bid_bps } else { tilt.ask_bps };
        fee_bps = (fee_bps as i64 + tilt_bps as i64).max(0) as u32;
    }

    if cfg.flags.enable_bbo_floor {
        fee_bps = bbo_floor(
            fee_bps,
            ctx.primary_spread_bps,
            cfg.maker.beta_floor_bps,
            cfg.maker.alpha_bbo_bps,
        );
    }

    fee_bps = fee_bps.clamp(cfg.fee.base_bps, cfg.fee.cap_bps);

    let mut fill = solve_exact_in(
        reserves,
        is_base_in,
        amount_in,
        ctx.mid_wad,
        fee_bps,
        cfg.tokens,
        cfg.inventory,
    )?;
    let mut reason = if fill.is_partial {
        QuoteReason::Floor
    } else {
        QuoteReason::from(ctx.select_reason)
    };

    let reserve_out_pre = if is_base_in {
        reserves.quote_units
    } else {
        reserves.base_units
    };
    let near_floor = cfg.flags.enable_aomq
        && aomq::floor_trigger(reserve_out_pre, cfg.inventory.floor_bps, cfg.aomq.floor_epsilon_bps)?;

    let aomq_trigger = if cfg.flags.enable_aomq {
        aomq::select_trigger(ctx.soft_routed, near_floor, ctx.used_fallback)
    } else {
        None
    };

    if let Some(_trigger) = aomq_trigger {
        let (clamped_fill, bumped_fee) = aomq::clamp(
            reserves,
            is_base_in,
            amount_in,
            ctx.mid_wad,
            fee_bps,
            cfg.fee.cap_bps,
            cfg.tokens,
            cfg.inventory,
            cfg.aomq,
        )?;
        fill = clamped_fill;
        fee_bps = bumped_fee;
        reason = QuoteReason::Aomq;
    }

    let fee_state_final = FeeState {
        last_block: fee_state_next.last_block,
        last_fee_bps: fee_bps,
    };

    let result = QuoteResult {
        mid_used_wad: ctx.mid_wad,
        fee_bps_used: fee_bps,
        applied_in: fill.applied_in,
        amount_out: fill.amount_out,
        is_partial: fill.is_partial,
        used_fallback: ctx.used_fallback,
        reason,
        regime: regime_code(ctx.regime),
        aomq_trigger,
        divergence_bps: ctx.divergence_bps,
        haircut_bps: ctx.haircut_bps,
        confidence: ctx.confidence,
        inv_dev_bps: deviation.bps as u32,
        fee_breakdown,
    };

    Ok((result, fee_state_final))
}

/// A pricing pass is a pure function of `(state, config, inputs, block)`: it
/// never reads wall-clock time or mutates anything the caller doesn't
/// explicitly persist. Preview and settlement call this identically, which
/// is what guarantees the same-block parity contract (§4.9) by
/// construction rather than by a special-cased snapshot-reuse path.
#[allow(clippy::too_many_arguments)]
pub fn price(
    reserves: Reserves,
    target_base_xstar: u128,
    cfg: &PricingConfig,
    state: PricingState,
    oracle_data: &OracleData,
    amount_in: u128,
    is_base_in: bool,
    block: BlockCursor,
    last_observed_ts_sec: u64,
    lvr_estimator: &dyn LvrEstimator,
) -> Result<(QuoteResult, PricingState)> {
    let ctx = resolve_context(oracle_data, cfg, state.confidence_state, block, last_observed_ts_sec)?;
    let (result, fee_state_final) = price_with_context(
        &ctx,
        reserves,
        target_base_xstar,
        cfg,
        state.fee_state,
        amount_in,
        is_base_in,
        block.block_number,
        lvr_estimator,
    )?;

    let next_state = PricingState {
        fee_state: fee_state_final,
        confidence_state: ctx.confidence_state_next,
    };

    Ok((result, next_state))
}
