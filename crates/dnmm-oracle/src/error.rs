use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum OracleError {
    #[error(transparent)]
    Core(#[from] dnmm_core::CoreError),

    #[error("oracle reading is stale")]
    OracleStale,

    #[error("orderbook reading is malformed")]
    InvalidOrderbook,

    #[error("no mid price could be derived")]
    MidUnset,

    #[error("observation timestamp went backwards")]
    InvalidTs,

    #[error("sources diverged by {delta_bps} bps, cap is {cap_bps} bps")]
    OracleDiverged { delta_bps: u32, cap_bps: u32 },

    #[error("invalid oracle config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = std::result::Result<T, OracleError>;
