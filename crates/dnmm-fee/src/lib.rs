//! The fee state machine (decay, composition, cap), the BBO floor, and the
//! signed inventory tilt.

pub mod bbo_tilt;
pub mod config;
pub mod error;
pub mod policy;

pub use bbo_tilt::{bbo_floor, inventory_tilt, Tilt};
pub use config::{FeeConfig, MakerConfig};
pub use error::{FeeError, Result};
pub use policy::{apply_haircut, preview, FeeBreakdown, FeeInputs, FeeState};
