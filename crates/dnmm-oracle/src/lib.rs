//! Canonicalizes dual-source price readings into a safe mid, enforces
//! freshness/confidence caps, computes inter-source divergence, and blends
//! confidence from spread, rolling sigma, and secondary-source confidence.

pub mod confidence;
pub mod config;
pub mod error;
pub mod facade;
pub mod readings;

pub use confidence::{blend_confidence, ConfidenceBreakdown, ConfidenceState};
pub use config::OracleConfig;
pub use error::{OracleError, Result};
pub use facade::{
    divergence_gate, guard_timestamp, select_mid, CapRegime, DivergenceOutcome, SelectReason,
    Selection,
};
pub use readings::{OracleData, PrimaryReading, SecondaryReading};
