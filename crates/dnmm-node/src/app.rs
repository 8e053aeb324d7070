//! Application orchestration (§10.5): wires a pool, a watcher, and
//! telemetry together and drives one scripted scenario through them. This
//! is a minimal demonstration driver — it reads pre-recorded oracle
//! snapshots from a TOML file and issues quotes against them rather than
//! integrating with a live exchange.

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
#[allow(unused_imports)]
use alloy::signers::Signer as _;
use dnmm_core::NullObserver;
use dnmm_inventory::Reserves;
use dnmm_pool::{Pool, PoolHandle};
use dnmm_rfq::{RfqEnvelope, RfqQuote};
use dnmm_telemetry::TracingMetricsObserver;
use dnmm_watcher::{NullPauseHandler, OracleWatcher, WatchAlert};
use tracing::{info, warn};

use crate::clock::SystemClock;
use crate::config::NodeConfig;
use crate::error::NodeResult;
use crate::scenario::Scenario;
use std::sync::Arc;

/// Demo chain id the signed RFQ quote at the end of the run is domain
/// separated against; this binary never touches a real chain.
const DEMO_CHAIN_ID: u64 = 1337;

/// The running node: one pool, one watcher sharing the same oracle
/// config, an RFQ envelope settling into the same pool, and the clock
/// all three are driven from.
pub struct Application {
    pool: PoolHandle,
    watcher: OracleWatcher,
    envelope: RfqEnvelope,
    maker: PrivateKeySigner,
    clock: Arc<SystemClock>,
    scenario: Scenario,
}

impl Application {
    pub fn new(config: NodeConfig) -> NodeResult<Self> {
        let clock = Arc::new(SystemClock::new());
        let reserves = Reserves {
            base_units: config.reserves.base_units,
            quote_units: config.reserves.quote_units,
        };

        let pool_clock: Box<dyn dnmm_core::Clock> = Box::new(ClockHandle(clock.clone()));
        let observer = Box::new(TracingMetricsObserver::new(config.pool_label.clone()));
        let pool = Pool::new(reserves, config.pool, pool_clock, observer)?;
        let pool = PoolHandle::new(pool);

        let oracle_config = pool.with_config(|c| c.oracle);
        let enable_soft_divergence = pool.with_config(|c| c.flags.enable_soft_divergence);
        let watcher = OracleWatcher::new(
            oracle_config,
            enable_soft_divergence,
            Box::new(NullPauseHandler),
            Box::new(NullObserver),
        );

        let maker = PrivateKeySigner::random();
        let pool_address = Address::repeat_byte(0x11);
        let envelope_clock: Box<dyn dnmm_core::Clock> = Box::new(ClockHandle(clock.clone()));
        let envelope_observer = Box::new(TracingMetricsObserver::new(config.pool_label.clone()));
        let envelope = RfqEnvelope::new(
            pool.clone(),
            maker.address(),
            pool_address,
            DEMO_CHAIN_ID,
            envelope_clock,
            envelope_observer,
        );

        let scenario = Scenario::from_file(&config.scenario_path)?;

        Ok(Self {
            pool,
            watcher,
            envelope,
            maker,
            clock,
            scenario,
        })
    }

    /// Runs every tick in the scenario in order, advancing the clock one
    /// block between ticks. Logs the outcome of each tick; never returns
    /// early on a single tick's rejection, since a real host keeps serving
    /// quotes after one taker's request is rejected.
    pub async fn run(&self) -> NodeResult<()> {
        info!(ticks = self.scenario.ticks.len(), "starting scenario run");

        for (i, tick) in self.scenario.ticks.iter().enumerate() {
            let oracle_data = tick.oracle_data();

            if let Some(alert) = self.watcher.sample(&oracle_data) {
                warn!(tick = i, ?alert, "oracle watcher raised an alert");
                if matches!(
                    alert,
                    WatchAlert::Stale | WatchAlert::InvalidOrderbook | WatchAlert::Divergent { .. }
                ) {
                    self.clock.tick();
                    continue;
                }
            }

            match self
                .pool
                .quote_swap_exact_in(tick.amount_in, tick.is_base_in, &oracle_data)
            {
                Ok(quote) => {
                    info!(
                        tick = i,
                        taker = %tick.taker,
                        mid_wad = quote.mid_used_wad,
                        fee_bps = quote.fee_bps_used,
                        amount_out = quote.amount_out,
                        is_partial = quote.is_partial,
                        ?quote.reason,
                        "quoted"
                    );

                    let deadline_sec = self.clock.now().block_ts_sec + 30;
                    match self.pool.swap_exact_in(
                        &tick.taker,
                        tick.amount_in,
                        0,
                        tick.is_base_in,
                        &oracle_data,
                        deadline_sec,
                    ) {
                        Ok(amount_out) => {
                            info!(tick = i, taker = %tick.taker, amount_out, "settled")
                        }
                        Err(err) => {
                            warn!(tick = i, taker = %tick.taker, %err, "settlement rejected")
                        }
                    }
                }
                Err(err) => warn!(tick = i, taker = %tick.taker, %err, "quote rejected"),
            }

            self.clock.tick();
        }

        info!(reserves = ?self.pool.reserves(), "scenario run complete");

        self.run_signed_rfq_demo();

        Ok(())
    }

    /// Settles one maker-signed RFQ quote against the final scenario tick's
    /// oracle reading, demonstrating the signed settlement path alongside
    /// the plain `swap_exact_in` calls the scenario loop above exercises.
    fn run_signed_rfq_demo(&self) {
        let Some(last_tick) = self.scenario.ticks.last() else {
            return;
        };
        let oracle_data = last_tick.oracle_data();
        let now = self.clock.now();

        let quote = RfqQuote {
            taker: Address::repeat_byte(0x66),
            amount_in: last_tick.amount_in,
            min_amount_out: 0,
            is_base_in: last_tick.is_base_in,
            expiry_sec: now.block_ts_sec + 30,
            salt: now.block_number + 1,
            pool: Address::repeat_byte(0x11),
            chain_id: DEMO_CHAIN_ID,
        };
        let signature = match self.maker.sign_hash_sync(&quote.signing_hash()) {
            Ok(signature) => signature,
            Err(err) => {
                warn!(%err, "failed to sign demo RFQ quote");
                return;
            }
        };

        match self.envelope.verify_and_swap(&quote, &signature, &oracle_data) {
            Ok(amount_out) => info!(amount_out, "signed RFQ quote settled"),
            Err(err) => warn!(%err, "signed RFQ quote rejected"),
        }
    }
}

/// `PoolHandle` takes an owned `Box<dyn Clock>`; this adapts the
/// `Arc<SystemClock>` the application keeps for its own tick-driving into
/// that owned form without cloning the underlying counter.
struct ClockHandle(Arc<SystemClock>);

impl dnmm_core::Clock for ClockHandle {
    fn now(&self) -> dnmm_core::BlockCursor {
        self.0.now()
    }
}
