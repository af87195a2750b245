use shared::errors::{GasError, Result};
use shared::TransportError;
use tracing::{error, warn};

/// What an operation does with a transport failure.
///
/// Validation and marshal errors are never subject to a policy; they always
/// reach the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Report through tracing and hand back [`Settled::Contained`].
    ContainAndReport,
    /// Return the failure to the caller as [`GasError::Transport`].
    Propagate,
}

#[derive(Debug)]
pub enum Settled<T> {
    Completed(T),
    Contained(TransportError),
}

impl<T> Settled<T> {
    /// Collapses a contained failure back into an error for operations that
    /// must produce a value.
    pub fn into_result(self) -> Result<T> {
        match self {
            Settled::Completed(value) => Ok(value),
            Settled::Contained(err) => Err(GasError::Transport(err)),
        }
    }
}

impl FailurePolicy {
    pub fn settle<T>(
        self,
        operation: &'static str,
        result: std::result::Result<T, TransportError>,
    ) -> Result<Settled<T>> {
        match (self, result) {
            (_, Ok(value)) => Ok(Settled::Completed(value)),
            (FailurePolicy::ContainAndReport, Err(err)) => {
                error!(operation, error = %err, "Request failed; failure contained");
                Ok(Settled::Contained(err))
            }
            (FailurePolicy::Propagate, Err(err)) => {
                warn!(operation, error = %err, "Request failed; returning error to caller");
                Err(GasError::Transport(err))
            }
        }
    }
}
