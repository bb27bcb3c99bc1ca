use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use thiserror::Error;

use super::Value;

/// Error type host closures may return.
pub type HostError = Box<dyn std::error::Error + Send + Sync>;

/// Why a host call failed, before the evaluator wraps it into an eval error.
#[derive(Debug, Error)]
pub enum CallError {
    #[error("expected {expected} arguments, got {got}")]
    Arity { expected: usize, got: usize },

    #[error("{0}")]
    Failed(String),

    #[error("function panicked: {0}")]
    Panicked(String),
}

/// A host-supplied function callable from rule expressions.
///
/// Arguments are passed positionally as [`Value`]s and the call returns a
/// single [`Value`]. The declared arity is checked before the closure runs,
/// and panics inside the closure are caught rather than unwinding through
/// the engine.
///
/// # Example
///
/// ```
/// use edict::{Function, Value};
///
/// let days = Function::new(1, |args: &[Value]| match args[0] {
///     Value::Number(n) => Ok(Value::Number(n * 24.0 * 60.0 * 60.0)),
///     ref other => Err(format!("days() wants a number, got {other}").into()),
/// });
/// assert_eq!(days.arity(), 1);
/// ```
#[derive(Clone)]
pub struct Function {
    arity: usize,
    call: Arc<dyn Fn(&[Value]) -> Result<Value, HostError> + Send + Sync>,
}

impl Function {
    /// Wrap a closure taking `arity` positional arguments.
    pub fn new<F>(arity: usize, call: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, HostError> + Send + Sync + 'static,
    {
        Self {
            arity,
            call: Arc::new(call),
        }
    }

    /// The number of arguments this function expects.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Run the host closure, converting arity mismatches, returned errors and
    /// panics into a [`CallError`].
    pub(crate) fn invoke(&self, args: &[Value]) -> Result<Value, CallError> {
        if args.len() != self.arity {
            return Err(CallError::Arity {
                expected: self.arity,
                got: args.len(),
            });
        }
        match catch_unwind(AssertUnwindSafe(|| (self.call)(args))) {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => Err(CallError::Failed(err.to_string())),
            Err(payload) => Err(CallError::Panicked(panic_message(&*payload))),
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_owned()
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}
