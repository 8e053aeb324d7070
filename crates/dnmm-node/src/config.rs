//! Host process configuration (§10.4): one `PoolConfig` plus the starting
//! reserves, loaded from TOML with CLI > env var > built-in default
//! resolution, the same order `hip3-bot` resolves its config path in.

use std::path::Path;

use dnmm_pool::PoolConfig;
use serde::{Deserialize, Serialize};

use crate::error::{NodeError, NodeResult};

/// Starting token balances, in native (non-WAD) units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservesConfig {
    #[serde(default = "default_base_units")]
    pub base_units: u128,
    #[serde(default = "default_quote_units")]
    pub quote_units: u128,
}

fn default_base_units() -> u128 {
    100_000 * dnmm_core::WAD
}

fn default_quote_units() -> u128 {
    10_000_000 * dnmm_core::WAD
}

impl Default for ReservesConfig {
    fn default() -> Self {
        Self {
            base_units: default_base_units(),
            quote_units: default_quote_units(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    #[serde(default = "default_pool_label")]
    pub pool_label: String,
    #[serde(default = "default_scenario_path")]
    pub scenario_path: String,
    #[serde(default)]
    pub reserves: ReservesConfig,
    #[serde(default)]
    pub pool: PoolConfig,
}

fn default_pool_label() -> String {
    "dnmm-demo".to_string()
}

fn default_scenario_path() -> String {
    "demos/scenario.toml".to_string()
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            pool_label: default_pool_label(),
            scenario_path: default_scenario_path(),
            reserves: ReservesConfig::default(),
            pool: PoolConfig::default(),
        }
    }
}

impl NodeConfig {
    /// Resolves `cli_path` > `DNMM_CONFIG` env var > `config/default.toml`,
    /// falling back to built-in defaults when no file exists at the
    /// resolved path rather than failing startup.
    pub fn load(cli_path: Option<String>) -> NodeResult<Self> {
        let path = cli_path
            .or_else(|| std::env::var("DNMM_CONFIG").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        if Path::new(&path).exists() {
            Self::from_file(&path)
        } else {
            tracing::warn!(path = %path, "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn from_file(path: &str) -> NodeResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| NodeError::ConfigRead {
            path: path.to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| NodeError::ConfigParse {
            path: path.to_string(),
            source,
        })
    }
}
