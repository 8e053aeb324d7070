/// Raw primary-source reading: book/mid/EMA endpoints, ages in seconds.
/// The wire format that produced this struct is opaque to the core; only
/// these decoded fields matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PrimaryReading {
    pub mid_wad: Option<u128>,
    pub mid_age_sec: u64,
    pub bid_wad: Option<u128>,
    pub ask_wad: Option<u128>,
    pub spread_bps: u32,
    pub book_age_sec: u64,
    pub ema_mid_wad: Option<u128>,
    pub ema_age_sec: u64,
}

/// Raw secondary-source reading, pre-combined into a single pair mid. The
/// spec describes the secondary source reporting both legs of the pair
/// (e.g. base/usd and quote/usd); combining them into one pair mid and a
/// single confidence figure is this crate's responsibility at the ingest
/// boundary, not the core pricing logic's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SecondaryReading {
    pub pair_mid_wad: Option<u128>,
    pub conf_bps: u32,
    pub age_sec: u64,
}

/// Full input bundle for one oracle selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OracleData {
    pub primary: PrimaryReading,
    pub secondary: SecondaryReading,
}
