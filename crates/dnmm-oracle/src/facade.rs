use dnmm_core::{abs_diff, to_bps};

use crate::config::OracleConfig;
use crate::error::{OracleError, Result};
use crate::readings::{OracleData, PrimaryReading, SecondaryReading};

/// Which source produced the selected mid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectReason {
    None,
    Ema,
    Secondary,
}

/// Which confidence-cap regime applies: tight when the primary book is
/// live, wide once any fallback is in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapRegime {
    Spot,
    Strict,
}

/// Outcome of `select_mid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub mid_wad: u128,
    pub reason: SelectReason,
    pub regime: CapRegime,
}

fn book_is_malformed(primary: &PrimaryReading) -> bool {
    matches!((primary.bid_wad, primary.ask_wad), (Some(bid), Some(ask)) if bid > ask)
}

/// Selection algorithm: primary book, then EMA fallback, then secondary
/// fallback, else a stale/malformed failure.
pub fn select_mid(data: &OracleData, cfg: &OracleConfig) -> Result<Selection> {
    let primary = &data.primary;
    let secondary = &data.secondary;

    if book_is_malformed(primary) {
        return Err(OracleError::InvalidOrderbook);
    }

    let primary_book_fresh = primary.mid_age_sec <= cfg.max_age_sec
        && primary.book_age_sec <= cfg.max_age_sec
        && primary.bid_wad.is_some()
        && primary.ask_wad.is_some()
        && primary.spread_bps <= cfg.conf_cap_bps_spot;

    if let (true, Some(mid)) = (primary_book_fresh, primary.mid_wad) {
        return Ok(Selection {
            mid_wad: mid,
            reason: SelectReason::None,
            regime: CapRegime::Spot,
        });
    }

    if cfg.allow_ema_fallback {
        if let Some(ema_mid) = primary.ema_mid_wad {
            if primary.ema_age_sec <= cfg.max_age_sec + cfg.stall_window_sec {
                return Ok(Selection {
                    mid_wad: ema_mid,
                    reason: SelectReason::Ema,
                    regime: CapRegime::Strict,
                });
            }
        }
    }

    if let Some(sec_mid) = secondary.pair_mid_wad {
        if secondary.age_sec <= cfg.max_age_sec && secondary.conf_bps <= cfg.conf_cap_bps_strict {
            return Ok(Selection {
                mid_wad: sec_mid,
                reason: SelectReason::Secondary,
                regime: CapRegime::Strict,
            });
        }
    }

    Err(OracleError::OracleStale)
}

/// Outcome of the inter-source divergence gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DivergenceOutcome {
    Accept,
    Haircut { fee_add_bps: u32, delta_bps: u32 },
    RouteToAomq { delta_bps: u32 },
    Reject { delta_bps: u32, cap_bps: u32 },
}

/// Compares primary and secondary mids and classifies the result into the
/// accept/soft-haircut/aomq/hard-reject tiers. Returns `Accept` outright
/// when no secondary mid is available to compare against.
pub fn divergence_gate(
    primary_mid_wad: u128,
    secondary: &SecondaryReading,
    cfg: &OracleConfig,
    enable_soft_divergence: bool,
) -> Result<DivergenceOutcome> {
    let Some(secondary_mid) = secondary.pair_mid_wad else {
        return Ok(DivergenceOutcome::Accept);
    };

    let lo = primary_mid_wad.min(secondary_mid);
    if lo == 0 {
        return Ok(DivergenceOutcome::Accept);
    }
    let delta = abs_diff(primary_mid_wad, secondary_mid);
    let delta_bps_u64 = to_bps(delta, lo)?;
    let delta_bps = u32::try_from(delta_bps_u64).unwrap_or(u32::MAX);

    if !enable_soft_divergence {
        return if delta_bps <= cfg.divergence_bps {
            Ok(DivergenceOutcome::Accept)
        } else {
            Ok(DivergenceOutcome::Reject {
                delta_bps,
                cap_bps: cfg.divergence_bps,
            })
        };
    }

    if delta_bps <= cfg.divergence_accept_bps {
        return Ok(DivergenceOutcome::Accept);
    }
    if delta_bps <= cfg.divergence_soft_bps {
        let span = cfg.divergence_soft_bps.max(1);
        let slope = (cfg.haircut_slope_bps as u64) * ((delta_bps - cfg.divergence_accept_bps) as u64)
            / span as u64;
        let fee_add_bps = cfg.haircut_min_bps + slope as u32;
        return Ok(DivergenceOutcome::Haircut {
            fee_add_bps,
            delta_bps,
        });
    }
    if delta_bps <= cfg.divergence_hard_bps {
        return Ok(DivergenceOutcome::RouteToAomq { delta_bps });
    }
    Ok(DivergenceOutcome::Reject {
        delta_bps,
        cap_bps: cfg.divergence_hard_bps,
    })
}

/// Raises `InvalidTs` if the observation's timestamp regressed relative to
/// the last one the facade observed.
pub fn guard_timestamp(block_ts_sec: u64, last_observed_ts_sec: u64) -> Result<()> {
    if block_ts_sec < last_observed_ts_sec {
        return Err(OracleError::InvalidTs);
    }
    Ok(())
}
