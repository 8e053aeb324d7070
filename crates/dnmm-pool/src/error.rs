use thiserror::Error;

/// Fatal faults a pool entry point can raise. Mirrors the taxonomy split in
/// §7: everything here aborts the request with no partial state written.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum PoolError {
    #[error(transparent)]
    Pricing(#[from] dnmm_pricing::PricingError),

    #[error("amount_out {amount_out} below min_amount_out {min_amount_out}")]
    Slippage { amount_out: u128, min_amount_out: u128 },

    #[error("deadline {deadline_sec} expired at block_ts {block_ts_sec}")]
    DeadlineExpired { deadline_sec: u64, block_ts_sec: u64 },

    #[error("pool is paused")]
    Paused,

    #[error("reentrant call into a state-mutating entry point")]
    Reentrancy,

    #[error("recenter blocked: drift below recenter_threshold_pct")]
    RecenterThreshold,

    #[error("recenter blocked: cooldown has not elapsed")]
    RecenterCooldown,

    #[error("no mid price has ever been observed")]
    MidUnset,

    #[error(transparent)]
    InvalidOracleConfig(#[from] dnmm_oracle::OracleError),

    #[error(transparent)]
    InvalidFeeConfig(#[from] dnmm_fee::FeeError),

    #[error(transparent)]
    InvalidInventoryConfig(#[from] dnmm_inventory::InventoryError),

    #[error("governance-only entry point called by a non-governance caller")]
    NotGovernance,
}

pub type Result<T> = std::result::Result<T, PoolError>;
