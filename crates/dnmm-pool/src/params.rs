use dnmm_fee::{FeeConfig, MakerConfig};
use dnmm_inventory::{InventoryConfig, TokenConfig};
use dnmm_oracle::OracleConfig;
use dnmm_pricing::{AomqConfig, FeatureFlags, PreviewConfig};

/// Typed governance update, one variant per mutable parameter block. The
/// boundary (`Pool::update_params`) decodes nothing — callers already hold
/// a concrete value — it only validates and dispatches, matching the
/// re-architected "decode once, then dispatch" pattern for what used to be
/// opaque-encoded parameter bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Tokens(TokenConfig),
    Inventory(InventoryConfig),
    Oracle(OracleConfig),
    Fee(FeeConfig),
    Maker(MakerConfig),
    Aomq(AomqConfig),
    Preview(PreviewConfig),
    Flags(FeatureFlags),
}
