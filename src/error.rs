use thiserror::Error;

use crate::evaluate::EvalError;
use crate::parse::ParseError;
use crate::serial::{DeserializeError, SerializeError};

/// Unified error type covering parsing, evaluation and persistence.
///
/// Returned by the top-level [`run()`](crate::run) entry point; each phase
/// keeps its own error type underneath.
#[derive(Debug, Error)]
pub enum EdictError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error(transparent)]
    Serialize(#[from] SerializeError),

    #[error(transparent)]
    Deserialize(#[from] DeserializeError),
}
