//! The pricing pipeline: oracle selection and divergence gating, confidence
//! blending, fee composition, the inventory solver, AOMQ overrides, preview
//! snapshots, and manual recentering. `engine::price` is the single entry
//! point both quoting and settlement call into — same inputs, same output,
//! by construction.

pub mod aomq;
pub mod config;
pub mod engine;
pub mod error;
pub mod lvr;
pub mod preview;
pub mod recenter;
pub mod types;

pub use config::{AomqConfig, FeatureFlags, PreviewConfig};
pub use engine::{price, price_with_context, resolve_context, PricingConfig, PricingContext, PricingState};
pub use error::{PricingError, Result};
pub use lvr::{LvrEstimator, ZeroLvrEstimator};
pub use preview::{LadderRung, PreviewSnapshot};
pub use recenter::{drift_exceeds_threshold, recenter, RecenterOutcome};
pub use types::{regime_code, PricingStateDelta, QuoteReason, QuoteResult};
