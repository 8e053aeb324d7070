//! Event emission sink.
//!
//! The core never knows how or where events are transported; it calls
//! `Observer::emit` with a typed `Event` and moves on. Production wires an
//! observer that forwards into `tracing` and `prometheus`; tests use
//! `RecordingObserver`.

use serde::Serialize;

/// Discriminant carried on `AomqActivated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AomqTrigger {
    Soft,
    Floor,
    Fallback,
}

/// The minimum event set described by the external interface surface.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind")]
pub enum Event {
    SwapExecuted {
        taker: String,
        is_base_in: bool,
        amount_in: u128,
        amount_out: u128,
        mid_wad: u128,
        fee_bps: u32,
        is_partial: bool,
        reason: String,
    },
    TargetBaseXstarUpdated {
        old: u128,
        new: u128,
        mid_wad: u128,
        ts_sec: u64,
    },
    ManualRebalanceExecuted {
        caller: String,
        price_wad: u128,
        ts_sec: u64,
    },
    DivergenceHaircut {
        delta_bps: u32,
        fee_bps: u32,
    },
    DivergenceRejected {
        delta_bps: u32,
    },
    AomqActivated {
        trigger: AomqTrigger,
        is_base_in: bool,
        spread_bps: u32,
        quote_notional: u128,
    },
    PreviewSnapshotRefreshed {
        caller: String,
        ts_sec: u64,
        mid_wad: u128,
        regime: u8,
    },
    ConfidenceDebug {
        conf_spread_bps: u32,
        conf_sigma_bps: u32,
        conf_pyth_bps: u32,
        conf_blended_bps: u32,
        sigma_bps: u64,
        fee_base_bps: u32,
        fee_vol_bps: u32,
        fee_inv_bps: u32,
        fee_size_bps: u32,
        fee_lvr_bps: u32,
        fee_total_bps: u32,
    },
    QuoteFilled {
        taker: String,
        amount_out: u128,
    },
}

/// Sink for core-emitted events. Implementations must not re-enter the
/// pricing/pool core from inside `emit`.
pub trait Observer: Send + Sync {
    fn emit(&self, event: Event);
}

/// An observer that drops everything. Useful as a default when no
/// downstream telemetry is wired up.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl Observer for NullObserver {
    fn emit(&self, _event: Event) {}
}

/// An observer that records events in-memory, for assertions in tests.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: std::sync::Mutex<Vec<Event>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().expect("observer mutex poisoned").clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().expect("observer mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Observer for RecordingObserver {
    fn emit(&self, event: Event) {
        self.events.lock().expect("observer mutex poisoned").push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_observer_captures_in_order() {
        let obs = RecordingObserver::new();
        obs.emit(Event::DivergenceRejected { delta_bps: 1_200 });
        obs.emit(Event::DivergenceHaircut {
            delta_bps: 80,
            fee_bps: 30,
        });
        assert_eq!(obs.len(), 2);
        match &obs.events()[0] {
            Event::DivergenceRejected { delta_bps } => assert_eq!(*delta_bps, 1_200),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn null_observer_drops_everything() {
        let obs = NullObserver;
        obs.emit(Event::QuoteFilled {
            taker: "0xabc".into(),
            amount_out: 1,
        });
        // nothing to assert; this just must not panic
    }
}
