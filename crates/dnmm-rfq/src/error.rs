use thiserror::Error;

/// Fatal faults raised at the RFQ boundary, before or instead of a pool
/// error. Everything a settled swap can raise is folded in unchanged via
/// `#[from]` so a caller only ever matches one error type.
#[derive(Debug, Error)]
pub enum RfqError {
    #[error("quote signature does not recover to the configured maker")]
    InvalidSignature,

    #[error("quote expired at {expiry_sec}, block_ts is {block_ts_sec}")]
    Expired { expiry_sec: u64, block_ts_sec: u64 },

    #[error("salt {salt} already settled for taker {taker}")]
    Replay { taker: String, salt: u64 },

    #[error("quote pool {quote_pool} does not match this envelope's pool {envelope_pool}")]
    WrongPool {
        quote_pool: String,
        envelope_pool: String,
    },

    #[error("quote chain_id {quote_chain_id} does not match this envelope's chain_id {envelope_chain_id}")]
    WrongChain {
        quote_chain_id: u64,
        envelope_chain_id: u64,
    },

    #[error(transparent)]
    Pool(#[from] dnmm_pool::PoolError),
}

pub type Result<T> = std::result::Result<T, RfqError>;
