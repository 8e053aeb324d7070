use dnmm_core::AomqTrigger;
use dnmm_fee::{FeeBreakdown, FeeState};
use dnmm_oracle::{CapRegime, ConfidenceBreakdown, ConfidenceState, SelectReason};

/// Why the selected mid and fee ended up the way they did. Carried on
/// `QuoteResult` and mirrored into `SwapExecuted`/`QuoteFilled` events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteReason {
    /// Primary book mid, no divergence adjustment, no AOMQ.
    None,
    /// Primary EMA fallback supplied the mid.
    Ema,
    /// Secondary source supplied the mid (strict-cap regime).
    Secondary,
    /// Full-size output would have breached the floor; solver clamped.
    Floor,
    /// AOMQ micro-quote clamp activated.
    Aomq,
}

impl From<SelectReason> for QuoteReason {
    fn from(reason: SelectReason) -> Self {
        match reason {
            SelectReason::None => QuoteReason::None,
            SelectReason::Ema => QuoteReason::Ema,
            SelectReason::Secondary => QuoteReason::Secondary,
        }
    }
}

/// `regime` as carried on events: 0 = spot/primary, 1 = strict/fallback.
pub fn regime_code(regime: CapRegime) -> u8 {
    match regime {
        CapRegime::Spot => 0,
        CapRegime::Strict => 1,
    }
}

/// The end-to-end result of one pricing pass (§4.6 step 9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteResult {
    pub mid_used_wad: u128,
    pub fee_bps_used: u32,
    pub applied_in: u128,
    pub amount_out: u128,
    pub is_partial: bool,
    pub used_fallback: bool,
    pub reason: QuoteReason,
    pub regime: u8,
    pub aomq_trigger: Option<AomqTrigger>,
    pub divergence_bps: Option<u32>,
    pub haircut_bps: u32,
    pub confidence: ConfidenceBreakdown,
    pub inv_dev_bps: u32,
    /// The raw fee composition by term, pre-decay-floor and pre-cap.
    /// Carried through to `Event::ConfidenceDebug` when `debug_emit` is set.
    pub fee_breakdown: FeeBreakdown,
}

/// The state a mutating pricing pass would leave behind. Callers that only
/// previewed discard this; `swap_exact_in` and `refresh_preview_snapshot`
/// persist it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingStateDelta {
    pub fee_state: FeeState,
    pub confidence_state: ConfidenceState,
}
