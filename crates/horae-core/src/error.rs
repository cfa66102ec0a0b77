use thiserror::Error;

/// Core-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Malformed input handed to a parse or format helper.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A structural precondition was violated by the caller.
    #[error("Logic error: {0}")]
    LogicError(&'static str),

    /// An internal reconstruction step did not produce a value.
    #[error("Unexpected value: {0}")]
    UnexpectedValue(String),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
