use thiserror::Error;

/// Fatal faults the pricing engine can raise. Soft regimes (haircut, AOMQ,
/// fallback) are never represented here — they are encoded in a successful
/// `QuoteResult` instead, per the recoverable/unrecoverable split in §7.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum PricingError {
    #[error(transparent)]
    Core(#[from] dnmm_core::CoreError),

    #[error(transparent)]
    Oracle(#[from] dnmm_oracle::OracleError),

    #[error(transparent)]
    Fee(#[from] dnmm_fee::FeeError),

    #[error(transparent)]
    Inventory(#[from] dnmm_inventory::InventoryError),

    #[error("no mid price has ever been observed")]
    MidUnset,

    #[error("sources diverged by {delta_bps} bps, cap is {cap_bps} bps")]
    OracleDiverged { delta_bps: u32, cap_bps: u32 },

    #[error("preview snapshot is stale: age {age_sec}s exceeds max {max_age_sec}s")]
    PreviewSnapshotStale { age_sec: u64, max_age_sec: u64 },

    #[error("invalid pricing config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = std::result::Result<T, PricingError>;
