use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum InventoryError {
    #[error(transparent)]
    Core(#[from] dnmm_core::CoreError),

    #[error("requested input is zero")]
    ZeroInput,

    #[error("invalid token scale: {0}")]
    InvalidScale(&'static str),

    #[error("invalid inventory config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = std::result::Result<T, InventoryError>;
