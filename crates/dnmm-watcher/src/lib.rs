//! `OracleWatcher` (§2 component 10): an observer that samples
//! `OracleFacade` independent of any pending swap and fires critical
//! alerts — stale, hard-diverged, or fallback-sourced — into an optional
//! pause handler. It never touches pool state itself; it only decides
//! whether to ask something else to.

use dnmm_core::{Event, Observer};
use dnmm_oracle::{divergence_gate, select_mid, DivergenceOutcome, OracleConfig, OracleData, SelectReason};
use tracing::{error, info, warn};

/// What the watcher observed on one sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchAlert {
    /// Neither the primary book nor any fallback produced a mid.
    Stale,
    /// Malformed primary book (`bid > ask`).
    InvalidOrderbook,
    /// Inter-source divergence crossed the hard tier.
    Divergent { delta_bps: u32, cap_bps: u32 },
    /// The mid came from EMA or the secondary source rather than the
    /// primary book — not fatal, but worth a heads-up.
    Fallback { used_ema: bool },
}

impl WatchAlert {
    /// Stale, malformed-book, and hard-divergence are critical: they are
    /// exactly the conditions under which a live pool would reject every
    /// quote, so a watcher wired to a pause handler pages on these.
    /// Fallback sourcing is advisory only.
    pub fn is_critical(&self) -> bool {
        !matches!(self, WatchAlert::Fallback { .. })
    }
}

/// Receives critical alerts. Production wires this to the pool's
/// governance-only `pause` entry point (§6); tests use a recording stub.
/// The watcher does not call `pause` itself — pausing is a policy surface
/// out of this crate's scope (§1) — it only decides when to ask.
pub trait PauseHandler: Send + Sync {
    fn on_critical(&self, alert: WatchAlert);
}

/// A pause handler that does nothing, for watchers with no wired policy.
#[derive(Debug, Default)]
pub struct NullPauseHandler;

impl PauseHandler for NullPauseHandler {
    fn on_critical(&self, _alert: WatchAlert) {}
}

/// Samples an `OracleData` reading against one oracle configuration and
/// reports what it saw, forwarding critical alerts to `pause_handler` and
/// mirroring every alert into `observer` as a `tracing` event.
pub struct OracleWatcher {
    oracle_config: OracleConfig,
    enable_soft_divergence: bool,
    pause_handler: Box<dyn PauseHandler>,
    observer: Box<dyn Observer>,
}

impl OracleWatcher {
    pub fn new(
        oracle_config: OracleConfig,
        enable_soft_divergence: bool,
        pause_handler: Box<dyn PauseHandler>,
        observer: Box<dyn Observer>,
    ) -> Self {
        Self {
            oracle_config,
            enable_soft_divergence,
            pause_handler,
            observer,
        }
    }

    /// One sample. Returns the alert raised, if any — `None` means the
    /// primary book was fresh, tight, and in agreement with the secondary
    /// source, the calm-path outcome.
    pub fn sample(&self, data: &OracleData) -> Option<WatchAlert> {
        let selection = match select_mid(data, &self.oracle_config) {
            Ok(selection) => selection,
            Err(dnmm_oracle::OracleError::InvalidOrderbook) => {
                return Some(self.raise(WatchAlert::InvalidOrderbook));
            }
            Err(_) => return Some(self.raise(WatchAlert::Stale)),
        };

        if !matches!(selection.reason, SelectReason::None) {
            let alert = WatchAlert::Fallback {
                used_ema: matches!(selection.reason, SelectReason::Ema),
            };
            return Some(self.raise(alert));
        }

        match divergence_gate(
            selection.mid_wad,
            &data.secondary,
            &self.oracle_config,
            self.enable_soft_divergence,
        ) {
            Ok(DivergenceOutcome::Reject { delta_bps, cap_bps }) => {
                Some(self.raise(WatchAlert::Divergent { delta_bps, cap_bps }))
            }
            Ok(_) => None,
            Err(_) => Some(self.raise(WatchAlert::Stale)),
        }
    }

    fn raise(&self, alert: WatchAlert) -> WatchAlert {
        match alert {
            WatchAlert::Stale => warn!("oracle watcher: primary and every fallback are stale"),
            WatchAlert::InvalidOrderbook => warn!("oracle watcher: primary book is malformed"),
            WatchAlert::Divergent { delta_bps, cap_bps } => {
                error!(delta_bps, cap_bps, "oracle watcher: hard divergence");
                self.observer.emit(Event::DivergenceRejected { delta_bps });
            }
            WatchAlert::Fallback { used_ema } => {
                info!(used_ema, "oracle watcher: mid sourced from fallback");
            }
        }
        if alert.is_critical() {
            self.pause_handler.on_critical(alert);
        }
        alert
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dnmm_core::NullObserver;
    use dnmm_oracle::{PrimaryReading, SecondaryReading};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn fresh_primary(mid: u128, spread_bps: u32) -> PrimaryReading {
        PrimaryReading {
            mid_wad: Some(mid),
            mid_age_sec: 1,
            bid_wad: Some(mid - mid * spread_bps as u128 / 20_000),
            ask_wad: Some(mid + mid * spread_bps as u128 / 20_000),
            spread_bps,
            book_age_sec: 1,
            ema_mid_wad: None,
            ema_age_sec: 0,
        }
    }

    #[derive(Default)]
    struct CountingHandler {
        count: AtomicUsize,
    }

    impl PauseHandler for Arc<CountingHandler> {
        fn on_critical(&self, _alert: WatchAlert) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    const WAD: u128 = 1_000_000_000_000_000_000;

    #[test]
    fn calm_reading_raises_nothing() {
        let watcher = OracleWatcher::new(
            OracleConfig::default(),
            false,
            Box::new(NullPauseHandler),
            Box::new(NullObserver),
        );
        let data = OracleData {
            primary: fresh_primary(WAD, 0),
            secondary: SecondaryReading::default(),
        };
        assert_eq!(watcher.sample(&data), None);
    }

    #[test]
    fn stale_reading_pages_the_handler() {
        let handler = Arc::new(CountingHandler::default());
        let watcher = OracleWatcher::new(
            OracleConfig::default(),
            false,
            Box::new(handler.clone()),
            Box::new(NullObserver),
        );
        let data = OracleData::default();
        assert_eq!(watcher.sample(&data), Some(WatchAlert::Stale));
        assert_eq!(handler.count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn hard_divergence_pages_the_handler() {
        let handler = Arc::new(CountingHandler::default());
        let cfg = OracleConfig {
            divergence_bps: 200,
            ..Default::default()
        };
        let watcher = OracleWatcher::new(cfg, false, Box::new(handler.clone()), Box::new(NullObserver));
        let data = OracleData {
            primary: fresh_primary(WAD, 0),
            secondary: SecondaryReading {
                pair_mid_wad: Some(WAD + WAD * 12 / 100),
                conf_bps: 10,
                age_sec: 1,
            },
        };
        let alert = watcher.sample(&data).unwrap();
        assert!(matches!(alert, WatchAlert::Divergent { .. }));
        assert_eq!(handler.count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn fallback_is_not_critical() {
        let handler = Arc::new(CountingHandler::default());
        let cfg = OracleConfig {
            allow_ema_fallback: true,
            ..Default::default()
        };
        let watcher = OracleWatcher::new(cfg, false, Box::new(handler.clone()), Box::new(NullObserver));
        let mut primary = fresh_primary(WAD, 10_000);
        primary.ema_mid_wad = Some(WAD);
        primary.ema_age_sec = 5;
        let data = OracleData {
            primary,
            secondary: SecondaryReading::default(),
        };
        let alert = watcher.sample(&data).unwrap();
        assert!(matches!(alert, WatchAlert::Fallback { used_ema: true }));
        assert_eq!(handler.count.load(Ordering::SeqCst), 0);
    }
}
