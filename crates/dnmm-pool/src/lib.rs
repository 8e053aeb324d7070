//! The pool: the single exclusively-owned state object that wires
//! reserves, fee/confidence state, and the preview snapshot to the
//! pricing pipeline behind settlement, preview, recenter, and governance
//! entry points.

pub mod error;
pub mod handle;
pub mod params;
pub mod pool;

pub use error::{PoolError, Result};
pub use handle::PoolHandle;
pub use params::ParamKind;
pub use pool::{Pool, PoolConfig};
