//! The signed-quote RFQ envelope (§4.10): a maker-signed, single-use typed
//! quote that settles into a pool's `swap_exact_in` with `min_amount_out`
//! enforced by the caller rather than re-derived here.

pub mod envelope;
pub mod error;
pub mod quote;

pub use envelope::RfqEnvelope;
pub use error::{RfqError, Result};
pub use quote::RfqQuote;
