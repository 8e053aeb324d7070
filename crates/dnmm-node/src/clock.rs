//! Production `dnmm_core::Clock`: wall-clock seconds plus a block counter
//! that advances once per scenario tick, since this demonstration driver
//! has no chain to read a real block number from.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use dnmm_core::{BlockCursor, Clock};

#[derive(Debug, Default)]
pub struct SystemClock {
    block_number: AtomicU64,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&self) {
        self.block_number.fetch_add(1, Ordering::Relaxed);
    }
}

impl Clock for SystemClock {
    fn now(&self) -> BlockCursor {
        let block_ts_sec = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before Unix epoch")
            .as_secs();
        BlockCursor::new(self.block_number.load(Ordering::Relaxed), block_ts_sec)
    }
}
