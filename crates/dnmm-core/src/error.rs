use thiserror::Error;

/// Errors raised by the fixed-point math primitives.
///
/// These are the only errors that can originate below the pricing layer;
/// everything above treats them as unrecoverable.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum CoreError {
    #[error("division by zero in fixed-point math")]
    DivisionByZero,

    #[error("fixed-point overflow: {0}")]
    Overflow(&'static str),

    #[error("invalid scale: {0}")]
    InvalidScale(&'static str),
}

pub type Result<T> = std::result::Result<T, CoreError>;
