//! Wires `dnmm_core::Observer` into `tracing` events and the Prometheus
//! metrics in `metrics.rs` — the seam described in §9: the core calls
//! `emit(event)` and never learns how or where it is transported.

use dnmm_core::{AomqTrigger, Event, Observer};
use tracing::{info, warn};

use crate::metrics;

/// Forwards every core event into structured logs and the process-wide
/// metrics registry, labeling counters with `pool_label` so a host
/// running several pools can tell them apart.
pub struct TracingMetricsObserver {
    pool_label: String,
}

impl TracingMetricsObserver {
    pub fn new(pool_label: impl Into<String>) -> Self {
        Self {
            pool_label: pool_label.into(),
        }
    }
}

impl Observer for TracingMetricsObserver {
    fn emit(&self, event: Event) {
        match event {
            Event::SwapExecuted {
                taker,
                is_base_in,
                amount_in,
                amount_out,
                mid_wad,
                fee_bps,
                is_partial,
                reason,
            } => {
                info!(
                    pool = %self.pool_label,
                    taker = %taker,
                    is_base_in,
                    amount_in,
                    amount_out,
                    mid_wad,
                    fee_bps,
                    is_partial,
                    reason = %reason,
                    "swap executed"
                );
                metrics::SWAP_TOTAL.with_label_values(&[reason.as_str()]).inc();
                metrics::SWAP_VOLUME_WAD
                    .with_label_values(&[reason.as_str()])
                    .inc_by(amount_out as f64);
                metrics::FEE_BPS
                    .with_label_values(&[reason.as_str()])
                    .observe(fee_bps as f64);
            }
            Event::TargetBaseXstarUpdated { old, new, mid_wad, ts_sec } => {
                info!(
                    pool = %self.pool_label,
                    old,
                    new,
                    mid_wad,
                    ts_sec,
                    "target_base_xstar recentered"
                );
            }
            Event::ManualRebalanceExecuted { caller, price_wad, ts_sec } => {
                info!(
                    pool = %self.pool_label,
                    caller = %caller,
                    price_wad,
                    ts_sec,
                    "manual rebalance executed"
                );
            }
            Event::DivergenceHaircut { delta_bps, fee_bps } => {
                warn!(
                    pool = %self.pool_label,
                    delta_bps,
                    fee_bps,
                    "divergence haircut applied"
                );
                metrics::DIVERGENCE_HAIRCUT_TOTAL
                    .with_label_values(&[self.pool_label.as_str()])
                    .inc();
            }
            Event::DivergenceRejected { delta_bps } => {
                warn!(pool = %self.pool_label, delta_bps, "divergence rejected");
                metrics::DIVERGENCE_REJECTED_TOTAL
                    .with_label_values(&[self.pool_label.as_str()])
                    .inc();
            }
            Event::AomqActivated {
                trigger,
                is_base_in,
                spread_bps,
                quote_notional,
            } => {
                let trigger_label = match trigger {
                    AomqTrigger::Soft => "SOFT",
                    AomqTrigger::Floor => "FLOOR",
                    AomqTrigger::Fallback => "FALLBACK",
                };
                warn!(
                    pool = %self.pool_label,
                    trigger = trigger_label,
                    is_base_in,
                    spread_bps,
                    quote_notional,
                    "AOMQ activated"
                );
                metrics::AOMQ_ACTIVATED_TOTAL
                    .with_label_values(&[trigger_label])
                    .inc();
            }
            Event::PreviewSnapshotRefreshed { caller, ts_sec, mid_wad, regime } => {
                info!(
                    pool = %self.pool_label,
                    caller = %caller,
                    ts_sec,
                    mid_wad,
                    regime,
                    "preview snapshot refreshed"
                );
                metrics::PREVIEW_SNAPSHOT_AGE_SEC.set(0.0);
            }
            Event::ConfidenceDebug {
                conf_spread_bps,
                conf_sigma_bps,
                conf_pyth_bps,
                conf_blended_bps,
                sigma_bps,
                fee_base_bps,
                fee_vol_bps,
                fee_inv_bps,
                fee_size_bps,
                fee_lvr_bps,
                fee_total_bps,
            } => {
                info!(
                    pool = %self.pool_label,
                    conf_spread_bps,
                    conf_sigma_bps,
                    conf_pyth_bps,
                    conf_blended_bps,
                    sigma_bps,
                    fee_base_bps,
                    fee_vol_bps,
                    fee_inv_bps,
                    fee_size_bps,
                    fee_lvr_bps,
                    fee_total_bps,
                    "confidence/fee decomposition"
                );
                metrics::SIGMA_BPS
                    .with_label_values(&[self.pool_label.as_str()])
                    .set(sigma_bps as f64);
            }
            Event::QuoteFilled { taker, amount_out } => {
                info!(pool = %self.pool_label, taker = %taker, amount_out, "quote filled");
            }
        }
    }
}
