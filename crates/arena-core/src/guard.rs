use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

/// Error a strategy reports from its decision callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyError(String);

impl StrategyError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StrategyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for StrategyError {}

/// Why a guarded strategy call produced no usable value.
#[derive(Debug, Clone, PartialEq)]
pub enum CallFailure {
    /// The strategy returned an error.
    Error(StrategyError),
    /// The strategy panicked; carries the panic message when it was a string.
    Panicked(String),
    /// The strategy returned, but after its wall-clock budget ran out.
    Overran { elapsed: Duration, budget: Duration },
}

impl CallFailure {
    /// Short machine-friendly label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Error(_) => "error",
            Self::Panicked(_) => "panic",
            Self::Overran { .. } => "timeout",
        }
    }
}

impl fmt::Display for CallFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error(e) => write!(f, "strategy error: {e}"),
            Self::Panicked(msg) => write!(f, "strategy panicked: {msg}"),
            Self::Overran { elapsed, budget } => write!(
                f,
                "strategy overran its budget: {}ms > {}ms",
                elapsed.as_millis(),
                budget.as_millis()
            ),
        }
    }
}

impl std::error::Error for CallFailure {}

/// Invoke an untrusted strategy callback on the current thread.
///
/// Errors and panics are captured. When `budget` is set, a call that returns
/// later than the budget is reported as [`CallFailure::Overran`] and its value
/// is discarded. The call itself is never preempted: a callback that does not
/// return blocks the caller.
pub fn guarded_call<T>(
    budget: Option<Duration>,
    f: impl FnOnce() -> Result<T, StrategyError>,
) -> Result<T, CallFailure> {
    let started = Instant::now();
    let outcome = panic::catch_unwind(AssertUnwindSafe(f));
    let elapsed = started.elapsed();

    let value = match outcome {
        Ok(Ok(value)) => value,
        Ok(Err(e)) => return Err(CallFailure::Error(e)),
        Err(payload) => return Err(CallFailure::Panicked(panic_message(payload.as_ref()))),
    };

    if let Some(budget) = budget
        && elapsed > budget
    {
        return Err(CallFailure::Overran { elapsed, budget });
    }
    Ok(value)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
