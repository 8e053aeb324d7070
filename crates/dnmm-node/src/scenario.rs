//! Scripted oracle ticks for the demonstration run loop (§10.5): this
//! stands in for a live oracle feed with a TOML file of pre-recorded
//! readings, each paired with the swap request to quote against it.

use dnmm_oracle::{OracleData, PrimaryReading, SecondaryReading};
use serde::{Deserialize, Serialize};

use crate::error::{NodeError, NodeResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub ticks: Vec<Tick>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tick {
    pub taker: String,
    pub amount_in: u128,
    pub is_base_in: bool,

    #[serde(default)]
    pub mid_wad: Option<u128>,
    #[serde(default)]
    pub mid_age_sec: u64,
    #[serde(default)]
    pub bid_wad: Option<u128>,
    #[serde(default)]
    pub ask_wad: Option<u128>,
    #[serde(default)]
    pub spread_bps: u32,
    #[serde(default)]
    pub book_age_sec: u64,
    #[serde(default)]
    pub ema_mid_wad: Option<u128>,
    #[serde(default)]
    pub ema_age_sec: u64,

    #[serde(default)]
    pub secondary_mid_wad: Option<u128>,
    #[serde(default)]
    pub secondary_conf_bps: u32,
    #[serde(default)]
    pub secondary_age_sec: u64,
}

impl Tick {
    pub fn oracle_data(&self) -> OracleData {
        OracleData {
            primary: PrimaryReading {
                mid_wad: self.mid_wad,
                mid_age_sec: self.mid_age_sec,
                bid_wad: self.bid_wad,
                ask_wad: self.ask_wad,
                spread_bps: self.spread_bps,
                book_age_sec: self.book_age_sec,
                ema_mid_wad: self.ema_mid_wad,
                ema_age_sec: self.ema_age_sec,
            },
            secondary: SecondaryReading {
                pair_mid_wad: self.secondary_mid_wad,
                conf_bps: self.secondary_conf_bps,
                age_sec: self.secondary_age_sec,
            },
        }
    }
}

impl Scenario {
    pub fn from_file(path: &str) -> NodeResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| NodeError::ScenarioRead {
            path: path.to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| NodeError::ScenarioParse {
            path: path.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_scenario() {
        let toml = r#"
            [[ticks]]
            taker = "0xabc"
            amount_in = 1000
            is_base_in = true
            mid_wad = 2000000000000000000
        "#;
        let scenario: Scenario = toml::from_str(toml).unwrap();
        assert_eq!(scenario.ticks.len(), 1);
        let data = scenario.ticks[0].oracle_data();
        assert_eq!(data.primary.mid_wad, Some(2_000_000_000_000_000_000));
        assert_eq!(data.secondary.pair_mid_wad, None);
    }
}
