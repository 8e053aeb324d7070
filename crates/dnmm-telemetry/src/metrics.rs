//! Prometheus metrics (§10.3). Purely ambient observability: these are
//! fed *from* the core's `Observer` hook and never feed back into
//! pricing.
//!
//! # Panics
//!
//! Metric registration uses `unwrap()` intentionally. A duplicate-name
//! registration failure is a startup-time configuration bug and should
//! crash immediately rather than silently drop a metric.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_gauge, register_gauge_vec, register_histogram_vec,
    register_int_counter_vec, CounterVec, Gauge, GaugeVec, HistogramVec, IntCounterVec,
};

/// Settled swaps, labeled by `reason` (NONE/EMA/SECONDARY/FLOOR/AOMQ).
pub static SWAP_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!("dnmm_swap_total", "Total settled swaps by reason", &["reason"])
        .unwrap()
});

/// Settled swap output volume in WAD-normalized notional, by reason.
pub static SWAP_VOLUME_WAD: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "dnmm_swap_volume_wad",
        "Cumulative settled output volume (WAD) by reason",
        &["reason"]
    )
    .unwrap()
});

/// Distribution of applied fee, in bps, across settled swaps.
pub static FEE_BPS: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "dnmm_fee_bps",
        "Applied fee in bps across settled swaps",
        &["reason"]
    )
    .unwrap()
});

/// AOMQ activations by trigger (SOFT/FLOOR/FALLBACK).
pub static AOMQ_ACTIVATED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "dnmm_aomq_activated_total",
        "AOMQ activations by trigger",
        &["trigger"]
    )
    .unwrap()
});

/// Hard-divergence rejections.
pub static DIVERGENCE_REJECTED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "dnmm_divergence_rejected_total",
        "Hard-divergence rejections",
        &["pool"]
    )
    .unwrap()
});

/// Soft-divergence haircuts applied.
pub static DIVERGENCE_HAIRCUT_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "dnmm_divergence_haircut_total",
        "Soft-divergence haircuts applied",
        &["pool"]
    )
    .unwrap()
});

/// Age (seconds) of the most recently refreshed preview snapshot.
pub static PREVIEW_SNAPSHOT_AGE_SEC: Lazy<Gauge> = Lazy::new(|| {
    register_gauge!(
        "dnmm_preview_snapshot_age_sec",
        "Age in seconds of the most recently refreshed preview snapshot"
    )
    .unwrap()
});

/// Current confidence sigma EWMA, in bps.
pub static SIGMA_BPS: Lazy<GaugeVec> = Lazy::new(|| {
    register_gauge_vec!("dnmm_sigma_bps", "Confidence sigma EWMA in bps", &["pool"]).unwrap()
});
