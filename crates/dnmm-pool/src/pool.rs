use dnmm_core::{wad_div_down, BlockCursor, Clock, Event, Observer, BPS};
use dnmm_fee::{FeeConfig, FeeState, MakerConfig};
use dnmm_inventory::{InventoryConfig, Reserves, TokenConfig};
use dnmm_oracle::{ConfidenceState, OracleConfig, OracleData};
use dnmm_pricing::{
    drift_exceeds_threshold, price, price_with_context, recenter, regime_code, resolve_context,
    AomqConfig, FeatureFlags, LadderRung, LvrEstimator, PreviewConfig, PreviewSnapshot,
    PricingConfig, PricingState, QuoteReason, QuoteResult, ZeroLvrEstimator,
};

use serde::{Deserialize, Serialize};

use crate::error::{PoolError, Result};
use crate::params::ParamKind;

/// Every mutable parameter block a pool holds. Replaced wholesale, one
/// block at a time, via `update_params`. Deserializable as a whole so the
/// node binary can load one from a TOML pool-parameters file at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PoolConfig {
    pub tokens: TokenConfig,
    pub inventory: InventoryConfig,
    pub oracle: OracleConfig,
    pub fee: FeeConfig,
    pub maker: MakerConfig,
    pub aomq: AomqConfig,
    pub preview: PreviewConfig,
    pub flags: FeatureFlags,
}

impl PoolConfig {
    pub fn validate(&self) -> Result<()> {
        self.tokens.validate()?;
        self.inventory.validate()?;
        self.oracle.validate()?;
        self.fee.validate()?;
        self.maker.validate()?;
        self.aomq.validate()?;
        self.preview.validate()?;
        Ok(())
    }
}

/// RAII reentrancy guard: set on entry to a state-mutating method, cleared
/// on every exit path including early returns and panics. A pool's core
/// never suspends (§5) so in practice this only catches a bug where one
/// mutating method calls back into another; it costs one bool check.
struct ReentrancyGuard<'a> {
    flag: &'a mut bool,
}

impl<'a> ReentrancyGuard<'a> {
    fn enter(flag: &'a mut bool) -> Result<Self> {
        if *flag {
            return Err(PoolError::Reentrancy);
        }
        *flag = true;
        Ok(Self { flag })
    }
}

impl Drop for ReentrancyGuard<'_> {
    fn drop(&mut self) {
        *self.flag = false;
    }
}

/// A single oracle-guided DNMM pool: the single exclusively-owned state
/// object described in §9 — reserves, fee/confidence state, the frozen
/// preview snapshot, and every mutable config block, behind one `&mut
/// self` surface. Hosting many pools concurrently is the caller's job
/// (`dnmm_pool::PoolHandle` wraps one behind a `parking_lot::Mutex`).
pub struct Pool {
    reserves: Reserves,
    target_base_xstar: u128,
    config: PoolConfig,

    fee_state: FeeState,
    confidence_state: ConfidenceState,
    preview_snapshot: Option<PreviewSnapshot>,

    last_observed_ts_sec: u64,
    last_rebalance_price_wad: u128,
    last_recenter_ts_sec: u64,

    paused: bool,
    in_call: bool,

    clock: Box<dyn Clock>,
    observer: Box<dyn Observer>,
    lvr_estimator: Box<dyn LvrEstimator>,
}

impl Pool {
    pub fn new(
        reserves: Reserves,
        config: PoolConfig,
        clock: Box<dyn Clock>,
        observer: Box<dyn Observer>,
    ) -> Result<Self> {
        config.validate()?;
        let target_base_xstar = config.inventory.target_base_xstar;
        Ok(Self {
            reserves,
            target_base_xstar,
            config,
            fee_state: FeeState::default(),
            confidence_state: ConfidenceState::default(),
            preview_snapshot: None,
            last_observed_ts_sec: 0,
            last_rebalance_price_wad: 0,
            last_recenter_ts_sec: 0,
            paused: false,
            in_call: false,
            clock,
            observer,
            lvr_estimator: Box::new(ZeroLvrEstimator),
        })
    }

    pub fn reserves(&self) -> Reserves {
        self.reserves
    }

    pub fn target_base_xstar(&self) -> u128 {
        self.target_base_xstar
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn preview_snapshot(&self) -> Option<&PreviewSnapshot> {
        self.preview_snapshot.as_ref()
    }

    fn pricing_config(&self) -> PricingConfig<'_> {
        PricingConfig {
            tokens: self.config.tokens,
            inventory: self.config.inventory,
            oracle: &self.config.oracle,
            fee: &self.config.fee,
            maker: &self.config.maker,
            aomq: &self.config.aomq,
            flags: &self.config.flags,
        }
    }

    fn pricing_state(&self) -> PricingState {
        PricingState {
            fee_state: self.fee_state,
            confidence_state: self.confidence_state,
        }
    }

    fn price_at(
        &self,
        oracle_data: &OracleData,
        amount_in: u128,
        is_base_in: bool,
        block: BlockCursor,
        state: PricingState,
    ) -> Result<(QuoteResult, PricingState)> {
        Ok(price(
            self.reserves,
            self.target_base_xstar,
            &self.pricing_config(),
            state,
            oracle_data,
            amount_in,
            is_base_in,
            block,
            self.last_observed_ts_sec,
            self.lvr_estimator.as_ref(),
        )?)
    }

    /// Pure view: prices a hypothetical swap without mutating any pool
    /// state. Same pipeline `swap_exact_in` runs, on a scratch copy of
    /// `(fee_state, confidence_state)` — this is what guarantees the §4.9
    /// parity contract by construction rather than by a cached result.
    pub fn quote_swap_exact_in(
        &self,
        amount_in: u128,
        is_base_in: bool,
        oracle_data: &OracleData,
    ) -> Result<QuoteResult> {
        let block = self.clock.now();
        let (result, _next_state) =
            self.price_at(oracle_data, amount_in, is_base_in, block, self.pricing_state())?;
        Ok(result)
    }

    /// State-mutating settlement. Applies the fill to reserves, persists
    /// `fee_state`/`confidence_state`, enforces the pause gate, the
    /// deadline, and slippage, then (if enabled) auto-recenters.
    #[allow(clippy::too_many_arguments)]
    pub fn swap_exact_in(
        &mut self,
        taker: &str,
        amount_in: u128,
        min_amount_out: u128,
        is_base_in: bool,
        oracle_data: &OracleData,
        deadline_sec: u64,
    ) -> Result<u128> {
        let _guard = ReentrancyGuard::enter(&mut self.in_call)?;

        if self.paused {
            return Err(PoolError::Paused);
        }
        let block = self.clock.now();
        if block.block_ts_sec > deadline_sec {
            return Err(PoolError::DeadlineExpired {
                deadline_sec,
                block_ts_sec: block.block_ts_sec,
            });
        }

        let (result, next_state) =
            self.price_at(oracle_data, amount_in, is_base_in, block, self.pricing_state())?;

        if result.amount_out < min_amount_out {
            return Err(PoolError::Slippage {
                amount_out: result.amount_out,
                min_amount_out,
            });
        }

        self.reserves = if is_base_in {
            Reserves {
                base_units: self.reserves.base_units + result.applied_in,
                quote_units: self.reserves.quote_units - result.amount_out,
            }
        } else {
            Reserves {
                base_units: self.reserves.base_units - result.amount_out,
                quote_units: self.reserves.quote_units + result.applied_in,
            }
        };
        self.fee_state = next_state.fee_state;
        self.confidence_state = next_state.confidence_state;
        self.last_observed_ts_sec = block.block_ts_sec;

        self.observer.emit(Event::SwapExecuted {
            taker: taker.to_string(),
            is_base_in,
            amount_in: result.applied_in,
            amount_out: result.amount_out,
            mid_wad: result.mid_used_wad,
            fee_bps: result.fee_bps_used,
            is_partial: result.is_partial,
            reason: format!("{:?}", result.reason),
        });
        if self.config.flags.debug_emit {
            self.observer.emit(Event::ConfidenceDebug {
                conf_spread_bps: result.confidence.conf_spread_bps,
                conf_sigma_bps: result.confidence.conf_sigma_bps,
                conf_pyth_bps: result.confidence.conf_secondary_bps,
                conf_blended_bps: result.confidence.conf_blended_bps,
                sigma_bps: next_state.confidence_state.sigma_bps,
                fee_base_bps: result.fee_breakdown.base_bps,
                fee_vol_bps: result.fee_breakdown.conf_bps,
                fee_inv_bps: result.fee_breakdown.inv_bps,
                fee_size_bps: result.fee_breakdown.size_bps,
                fee_lvr_bps: result.fee_breakdown.lvr_bps,
                fee_total_bps: result.fee_breakdown.total_bps,
            });
        }
        match result.reason {
            QuoteReason::Aomq => {
                if let Some(trigger) = result.aomq_trigger {
                    self.observer.emit(Event::AomqActivated {
                        trigger,
                        is_base_in,
                        spread_bps: oracle_data.primary.spread_bps,
                        quote_notional: result.amount_out,
                    });
                }
            }
            _ => {}
        }
        if let Some(delta_bps) = result.divergence_bps {
            if result.haircut_bps > 0 {
                self.observer.emit(Event::DivergenceHaircut {
                    delta_bps,
                    fee_bps: result.fee_bps_used,
                });
            }
        }

        if self.config.flags.enable_auto_recenter {
            self.try_auto_recenter(result.mid_used_wad, block.block_ts_sec)?;
        }

        Ok(result.amount_out)
    }

    fn try_auto_recenter(&mut self, mid_wad: u128, now_sec: u64) -> Result<()> {
        let cooldown_elapsed =
            now_sec.saturating_sub(self.last_recenter_ts_sec) >= self.config.inventory.recenter_cooldown_sec;
        let qualifies = drift_exceeds_threshold(
            mid_wad,
            self.last_rebalance_price_wad,
            self.config.inventory.recenter_threshold_pct,
        )?;
        if !qualifies || !cooldown_elapsed {
            return Ok(());
        }
        let outcome = recenter(self.reserves, self.target_base_xstar, mid_wad, self.config.tokens)?;
        let old = outcome.old_target_base;
        self.target_base_xstar = outcome.new_target_base;
        self.config.inventory.target_base_xstar = outcome.new_target_base;
        self.last_rebalance_price_wad = mid_wad;
        self.last_recenter_ts_sec = now_sec;
        self.observer.emit(Event::TargetBaseXstarUpdated {
            old,
            new: outcome.new_target_base,
            mid_wad,
            ts_sec: now_sec,
        });
        Ok(())
    }

    /// Permissionless manual recenter: applies the same rule as the auto
    /// path against a freshly-selected mid, subject to the same
    /// threshold/cooldown gates.
    pub fn rebalance_target(&mut self, caller: &str, oracle_data: &OracleData) -> Result<u128> {
        let _guard = ReentrancyGuard::enter(&mut self.in_call)?;
        if self.paused {
            return Err(PoolError::Paused);
        }
        let block = self.clock.now();
        let selection = dnmm_oracle::select_mid(oracle_data, &self.config.oracle)?;
        let mid_wad = selection.mid_wad;

        let cooldown_elapsed = block
            .block_ts_sec
            .saturating_sub(self.last_recenter_ts_sec)
            >= self.config.inventory.recenter_cooldown_sec;
        if !cooldown_elapsed {
            return Err(PoolError::RecenterCooldown);
        }
        let qualifies = drift_exceeds_threshold(
            mid_wad,
            self.last_rebalance_price_wad,
            self.config.inventory.recenter_threshold_pct,
        )?;
        if !qualifies {
            return Err(PoolError::RecenterThreshold);
        }

        let outcome = recenter(self.reserves, self.target_base_xstar, mid_wad, self.config.tokens)?;
        let old = outcome.old_target_base;
        self.target_base_xstar = outcome.new_target_base;
        self.config.inventory.target_base_xstar = outcome.new_target_base;
        self.last_rebalance_price_wad = mid_wad;
        self.last_recenter_ts_sec = block.block_ts_sec;

        self.observer.emit(Event::ManualRebalanceExecuted {
            caller: caller.to_string(),
            price_wad: mid_wad,
            ts_sec: block.block_ts_sec,
        });
        self.observer.emit(Event::TargetBaseXstarUpdated {
            old,
            new: outcome.new_target_base,
            mid_wad,
            ts_sec: block.block_ts_sec,
        });

        Ok(outcome.new_target_base)
    }

    /// Resolves a fresh oracle context (mid, confidence, divergence,
    /// regime) at zero notional and freezes it if the cooldown has
    /// elapsed; otherwise a no-op that returns the existing snapshot's
    /// timestamp. Uses `resolve_context` directly rather than a full
    /// `price_at` pass — a snapshot refresh has no trade size, so there is
    /// nothing for the fee/fill half of the pipeline to do here.
    pub fn refresh_preview_snapshot(&mut self, caller: &str, oracle_data: &OracleData) -> Result<u64> {
        let _guard = ReentrancyGuard::enter(&mut self.in_call)?;

        let block = self.clock.now();
        if let Some(existing) = &self.preview_snapshot {
            if !existing.cooldown_elapsed(block.block_ts_sec, &self.config.preview) {
                return Ok(existing.ts_sec);
            }
        }

        let ctx = resolve_context(
            oracle_data,
            &self.pricing_config(),
            self.confidence_state,
            block,
            self.last_observed_ts_sec,
        )?;
        self.confidence_state = ctx.confidence_state_next;
        self.last_observed_ts_sec = block.block_ts_sec;

        let regime = regime_code(ctx.regime);
        let snapshot = PreviewSnapshot {
            ts_sec: block.block_ts_sec,
            mid_wad: ctx.mid_wad,
            sigma_bps: ctx.confidence_state_next.sigma_bps,
            conf_bps: ctx.confidence.conf_blended_bps,
            confidence: ctx.confidence,
            divergence_bps: ctx.divergence_bps,
            haircut_bps: ctx.haircut_bps,
            soft_routed: ctx.soft_routed,
            used_fallback: ctx.used_fallback,
            select_reason: ctx.select_reason,
            primary_spread_bps: ctx.primary_spread_bps,
            regime,
            reason: QuoteReason::from(ctx.select_reason),
            fee_state_copy: self.fee_state,
        };
        self.preview_snapshot = Some(snapshot);

        self.observer.emit(Event::PreviewSnapshotRefreshed {
            caller: caller.to_string(),
            ts_sec: block.block_ts_sec,
            mid_wad: ctx.mid_wad,
            regime,
        });

        Ok(block.block_ts_sec)
    }

    /// Default notional ladder, expressed as bps multiples of
    /// `s0_override_wad`: 0.25x/0.5x/1x/2x/4x.
    const LADDER_MULTIPLIERS_BPS: [u32; 5] = [2_500, 5_000, 10_000, 20_000, 40_000];

    /// Quotes a notional ladder around `s0_override_wad` on both sides,
    /// gated on the frozen preview snapshot being fresh
    /// (`PreviewSnapshotStale` otherwise, per `preview.revert_on_stale`).
    /// Every rung runs through `price_with_context` against the snapshot's
    /// frozen oracle context — never against a live `OracleData` — which is
    /// what makes "frozen" mean something: a mid, divergence outcome, or
    /// regime that has moved since the snapshot was taken cannot leak into
    /// the ladder. Never mutates pool state.
    pub fn preview_ladder(&self, s0_override_wad: u128) -> Result<Vec<LadderRung>> {
        let block = self.clock.now();
        let snapshot = self.preview_snapshot.as_ref().ok_or(PoolError::MidUnset)?;
        snapshot.check_fresh(block.block_ts_sec, &self.config.preview)?;

        let ctx = snapshot.to_context();
        let cfg = self.pricing_config();
        let mut rungs = Vec::with_capacity(Self::LADDER_MULTIPLIERS_BPS.len());
        for mult_bps in Self::LADDER_MULTIPLIERS_BPS {
            let size_wad = (s0_override_wad * mult_bps as u128) / BPS;
            let amount_in_base = wad_div_down(size_wad, ctx.mid_wad).unwrap_or(size_wad);
            let (ask, _) = price_with_context(
                &ctx,
                self.reserves,
                self.target_base_xstar,
                &cfg,
                snapshot.fee_state_copy,
                size_wad,
                false,
                block.block_number,
                self.lvr_estimator.as_ref(),
            )?;
            let (bid, _) = price_with_context(
                &ctx,
                self.reserves,
                self.target_base_xstar,
                &cfg,
                snapshot.fee_state_copy,
                amount_in_base,
                true,
                block.block_number,
                self.lvr_estimator.as_ref(),
            )?;
            rungs.push(LadderRung {
                size_wad,
                ask_fee_bps: ask.fee_bps_used,
                bid_fee_bps: bid.fee_bps_used,
                ask_clamped: ask.is_partial || matches!(ask.reason, QuoteReason::Aomq),
                bid_clamped: bid.is_partial || matches!(bid.reason, QuoteReason::Aomq),
                snapshot_ts_sec: snapshot.ts_sec,
                snapshot_mid_wad: snapshot.mid_wad,
            });
        }
        Ok(rungs)
    }

    /// Governance-only: replaces one parameter block wholesale after
    /// validating it. `is_governance` is the caller's authorization
    /// decision; this crate does not itself implement access control.
    pub fn update_params(&mut self, is_governance: bool, kind: ParamKind) -> Result<()> {
        if !is_governance {
            return Err(PoolError::NotGovernance);
        }
        match kind {
            ParamKind::Tokens(tokens) => {
                tokens.validate()?;
                self.config.tokens = tokens;
            }
            ParamKind::Inventory(inventory) => {
                inventory.validate()?;
                self.target_base_xstar = inventory.target_base_xstar;
                self.config.inventory = inventory;
            }
            ParamKind::Oracle(oracle) => {
                oracle.validate()?;
                self.config.oracle = oracle;
            }
            ParamKind::Fee(fee) => {
                fee.validate()?;
                self.config.fee = fee;
            }
            ParamKind::Maker(maker) => {
                maker.validate()?;
                self.config.maker = maker;
            }
            ParamKind::Aomq(aomq) => {
                aomq.validate()?;
                self.config.aomq = aomq;
            }
            ParamKind::Preview(preview) => {
                preview.validate()?;
                self.config.preview = preview;
            }
            ParamKind::Flags(flags) => {
                self.config.flags = flags;
            }
        }
        Ok(())
    }

    pub fn pause(&mut self, is_governance: bool) -> Result<()> {
        if !is_governance {
            return Err(PoolError::NotGovernance);
        }
        self.paused = true;
        Ok(())
    }

    pub fn unpause(&mut self, is_governance: bool) -> Result<()> {
        if !is_governance {
            return Err(PoolError::NotGovernance);
        }
        self.paused = false;
        Ok(())
    }
}
