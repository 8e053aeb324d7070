use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum FeeError {
    #[error(transparent)]
    Core(#[from] dnmm_core::CoreError),

    #[error("invalid fee config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = std::result::Result<T, FeeError>;
