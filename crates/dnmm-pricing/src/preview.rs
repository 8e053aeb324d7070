use dnmm_fee::FeeState;
use dnmm_oracle::{CapRegime, ConfidenceBreakdown, ConfidenceState, SelectReason};

use crate::config::PreviewConfig;
use crate::engine::PricingContext;
use crate::error::{PricingError, Result};
use crate::types::QuoteReason;

fn regime_from_code(regime: u8) -> CapRegime {
    if regime == 0 {
        CapRegime::Spot
    } else {
        CapRegime::Strict
    }
}

/// A frozen pricing context, written only by `refresh_preview_snapshot`.
/// Ladder queries and (when `enable_preview_fresh`) strict preview calls
/// reconstruct a `PricingContext` from this instead of re-deriving one
/// against a live `OracleData` (§4.9) — every field here is exactly what
/// `price_with_context` consumes from `PricingContext`, so `to_context`
/// is a lossless round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewSnapshot {
    pub ts_sec: u64,
    pub mid_wad: u128,
    pub sigma_bps: u64,
    pub conf_bps: u32,
    pub confidence: ConfidenceBreakdown,
    pub divergence_bps: Option<u32>,
    pub haircut_bps: u32,
    pub soft_routed: bool,
    pub used_fallback: bool,
    pub select_reason: SelectReason,
    pub primary_spread_bps: u32,
    pub regime: u8,
    pub reason: QuoteReason,
    pub fee_state_copy: FeeState,
}

impl PreviewSnapshot {
    pub fn age_sec(&self, now_sec: u64) -> u64 {
        now_sec.saturating_sub(self.ts_sec)
    }

    /// Whether the snapshot is young enough to be refreshed again (the
    /// cooldown gate in `refresh_preview_snapshot`).
    pub fn cooldown_elapsed(&self, now_sec: u64, cfg: &PreviewConfig) -> bool {
        self.age_sec(now_sec) > cfg.snapshot_cooldown_sec
    }

    /// Enforces `PreviewSnapshotStale` per `cfg.revert_on_stale`; callers
    /// that tolerate staleness should use `age_sec` directly instead.
    pub fn check_fresh(&self, now_sec: u64, cfg: &PreviewConfig) -> Result<()> {
        let age = self.age_sec(now_sec);
        if age > cfg.max_age_sec && cfg.revert_on_stale {
            return Err(PricingError::PreviewSnapshotStale {
                age_sec: age,
                max_age_sec: cfg.max_age_sec,
            });
        }
        Ok(())
    }

    /// Rebuilds the `PricingContext` this snapshot froze. The recovered
    /// `ConfidenceState` only carries `sigma_bps` forward (the only field
    /// `price_with_context`'s LVR path reads); `last_block`/
    /// `last_observed_mid_wad` are not round-tripped since nothing in the
    /// ladder/preview path advances confidence state off a snapshot.
    pub fn to_context(&self) -> PricingContext {
        PricingContext {
            mid_wad: self.mid_wad,
            used_fallback: self.used_fallback,
            select_reason: self.select_reason,
            regime: regime_from_code(self.regime),
            primary_spread_bps: self.primary_spread_bps,
            haircut_bps: self.haircut_bps,
            divergence_bps: self.divergence_bps,
            soft_routed: self.soft_routed,
            confidence: self.confidence,
            confidence_state_next: ConfidenceState {
                sigma_bps: self.sigma_bps,
                last_observed_mid_wad: self.mid_wad,
                last_block: 0,
            },
        }
    }
}

/// One rung of `preview_ladder`: the result the same-block quote would
/// produce for `size_wad` on each side, evaluated against the frozen
/// snapshot context. `snapshot_ts_sec`/`snapshot_mid_wad` are carried so a
/// caller can attribute every rung to the exact snapshot it was priced
/// from without a second round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LadderRung {
    pub size_wad: u128,
    pub ask_fee_bps: u32,
    pub bid_fee_bps: u32,
    pub ask_clamped: bool,
    pub bid_clamped: bool,
    pub snapshot_ts_sec: u64,
    pub snapshot_mid_wad: u128,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> PreviewSnapshot {
        PreviewSnapshot {
            ts_sec: 100,
            mid_wad: dnmm_core::WAD,
            sigma_bps: 0,
            conf_bps: 0,
            confidence: ConfidenceBreakdown::default(),
            divergence_bps: None,
            haircut_bps: 0,
            soft_routed: false,
            used_fallback: false,
            select_reason: SelectReason::None,
            primary_spread_bps: 0,
            regime: 0,
            reason: QuoteReason::None,
            fee_state_copy: FeeState::default(),
        }
    }

    #[test]
    fn to_context_round_trips_frozen_fields() {
        let snap = PreviewSnapshot {
            divergence_bps: Some(42),
            haircut_bps: 3,
            soft_routed: true,
            used_fallback: true,
            select_reason: SelectReason::Ema,
            primary_spread_bps: 17,
            regime: 1,
            sigma_bps: 9,
            ..snapshot()
        };
        let ctx = snap.to_context();
        assert_eq!(ctx.mid_wad, snap.mid_wad);
        assert_eq!(ctx.divergence_bps, Some(42));
        assert_eq!(ctx.haircut_bps, 3);
        assert!(ctx.soft_routed);
        assert!(ctx.used_fallback);
        assert_eq!(ctx.select_reason, SelectReason::Ema);
        assert_eq!(ctx.primary_spread_bps, 17);
        assert_eq!(ctx.regime, CapRegime::Strict);
        assert_eq!(ctx.confidence_state_next.sigma_bps, 9);
    }

    #[test]
    fn fresh_within_max_age() {
        let snap = snapshot();
        let cfg = PreviewConfig {
            max_age_sec: 12,
            ..Default::default()
        };
        assert!(snap.check_fresh(110, &cfg).is_ok());
    }

    #[test]
    fn stale_past_max_age_reverts_when_configured() {
        let snap = snapshot();
        let cfg = PreviewConfig {
            max_age_sec: 5,
            revert_on_stale: true,
            ..Default::default()
        };
        let err = snap.check_fresh(110, &cfg).unwrap_err();
        assert_eq!(
            err,
            PricingError::PreviewSnapshotStale {
                age_sec: 10,
                max_age_sec: 5
            }
        );
    }

    #[test]
    fn stale_is_advisory_when_revert_disabled() {
        let snap = snapshot();
        let cfg = PreviewConfig {
            max_age_sec: 5,
            revert_on_stale: false,
            ..Default::default()
        };
        assert!(snap.check_fresh(110, &cfg).is_ok());
    }

    #[test]
    fn cooldown_blocks_refresh_until_elapsed() {
        let snap = snapshot();
        let cfg = PreviewConfig {
            snapshot_cooldown_sec: 6,
            max_age_sec: 12,
            ..Default::default()
        };
        assert!(!snap.cooldown_elapsed(103, &cfg));
        assert!(snap.cooldown_elapsed(107, &cfg));
    }
}
