//! Fixed-point arithmetic, the injected time source, and the event sink
//! shared by every layer of the pricing and settlement pipeline.
//!
//! ```text
//!            dnmm-core (this crate: WAD math, clock, events)
//!                 |
//!        +--------+--------+
//!        |                 |
//!  dnmm-inventory      dnmm-oracle
//!        |                 |       dnmm-fee
//!        +--------+--------+--------+
//!                 |
//!           dnmm-pricing
//!                 |
//!             dnmm-pool
//!            /        \
//!      dnmm-rfq    dnmm-watcher
//! ```

pub mod clock;
pub mod error;
pub mod events;
pub mod wad;

pub use clock::{BlockCursor, Clock, ManualClock};
pub use error::{CoreError, Result};
pub use events::{AomqTrigger, Event, NullObserver, Observer, RecordingObserver};
pub use wad::{
    abs_diff, clamp_i64, clamp_u128, mul_div_down, mul_div_up, to_bps, wad_div_down, wad_div_up,
    wad_mul_down, wad_mul_up, BPS, WAD,
};
