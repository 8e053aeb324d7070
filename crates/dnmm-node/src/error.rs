//! Node-level error aggregation (§10.1): every sub-crate error folds into
//! one enum at the binary boundary via `#[from]`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to read scenario file {path}: {source}")]
    ScenarioRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scenario file {path}: {source}")]
    ScenarioParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Pool(#[from] dnmm_pool::PoolError),
}

pub type NodeResult<T> = Result<T, NodeError>;
