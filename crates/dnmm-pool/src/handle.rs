use std::sync::Arc;

use dnmm_oracle::OracleData;
use parking_lot::Mutex;

use crate::error::Result;
use crate::params::ParamKind;
use crate::pool::{Pool, PoolConfig};

/// A cheaply-cloneable handle to a pool shared across a host's async
/// runtime. The pool's own pricing core never suspends (§5); this type
/// exists so a Tokio-hosted process can run many pools concurrently
/// without giving each one its own OS thread. The lock is always taken,
/// used, and dropped within one synchronous method call here — it never
/// crosses an `.await` point.
#[derive(Clone)]
pub struct PoolHandle {
    inner: Arc<Mutex<Pool>>,
}

impl PoolHandle {
    pub fn new(pool: Pool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(pool)),
        }
    }

    pub fn quote_swap_exact_in(
        &self,
        amount_in: u128,
        is_base_in: bool,
        oracle_data: &OracleData,
    ) -> Result<dnmm_pricing::QuoteResult> {
        self.inner.lock().quote_swap_exact_in(amount_in, is_base_in, oracle_data)
    }

    pub fn swap_exact_in(
        &self,
        taker: &str,
        amount_in: u128,
        min_amount_out: u128,
        is_base_in: bool,
        oracle_data: &OracleData,
        deadline_sec: u64,
    ) -> Result<u128> {
        self.inner.lock().swap_exact_in(
            taker,
            amount_in,
            min_amount_out,
            is_base_in,
            oracle_data,
            deadline_sec,
        )
    }

    pub fn refresh_preview_snapshot(&self, caller: &str, oracle_data: &OracleData) -> Result<u64> {
        self.inner.lock().refresh_preview_snapshot(caller, oracle_data)
    }

    pub fn preview_ladder(&self, s0_override_wad: u128) -> Result<Vec<dnmm_pricing::LadderRung>> {
        self.inner.lock().preview_ladder(s0_override_wad)
    }

    pub fn rebalance_target(&self, caller: &str, oracle_data: &OracleData) -> Result<u128> {
        self.inner.lock().rebalance_target(caller, oracle_data)
    }

    pub fn update_params(&self, is_governance: bool, kind: ParamKind) -> Result<()> {
        self.inner.lock().update_params(is_governance, kind)
    }

    pub fn pause(&self, is_governance: bool) -> Result<()> {
        self.inner.lock().pause(is_governance)
    }

    pub fn unpause(&self, is_governance: bool) -> Result<()> {
        self.inner.lock().unpause(is_governance)
    }

    /// Snapshot of reserves for read-only callers (metrics, dashboards).
    pub fn reserves(&self) -> dnmm_inventory::Reserves {
        self.inner.lock().reserves()
    }

    pub fn with_config<R>(&self, f: impl FnOnce(&PoolConfig) -> R) -> R {
        f(self.inner.lock().config())
    }
}
