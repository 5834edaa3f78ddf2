//! Errors a system callback can report.

use engine_component::ComponentError;

/// Failure of a single `init`, `update` or `free` call.
///
/// The registry logs the error and moves on to the next entity; one failing
/// callback never aborts the rest of the pass.
#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    /// A component the callback relied on was missing.
    #[error(transparent)]
    Component(#[from] ComponentError),

    /// Any other failure, described by the system.
    #[error("{0}")]
    Failed(String),
}

impl SystemError {
    /// Build a [`SystemError::Failed`] from a message.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Result type returned by system callbacks.
pub type SystemResult = Result<(), SystemError>;
