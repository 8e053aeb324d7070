//! Scale conversion between native token units and WAD, floor/deviation
//! accounting, and the exact-in partial-fill solver.

pub mod config;
pub mod error;
pub mod inventory;

pub use config::{InventoryConfig, TokenConfig};
pub use error::{InventoryError, Result};
pub use inventory::{
    available_inventory, deviation_bps, fifty_fifty_target_base, input_notional_wad,
    solve_exact_in, solve_exact_in_capped, Deviation, FillResult, Reserves,
};
