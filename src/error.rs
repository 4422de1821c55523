use std::{io, path::PathBuf, time::Duration};

use thiserror::Error;

/// Shared `Result` alias for scenario runs.
pub type Result<T> = std::result::Result<T, ScenarioError>;

/// Everything that terminates a scenario run.
///
/// None of these are retried; each propagates to the top of the run.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// Malformed or incomplete test input.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The system under test broke its API contract.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The system under test did not finish in time.
    #[error("{operation} timed out after {}s (deadline {}s)", .elapsed.as_secs(), .deadline.as_secs())]
    Timeout {
        operation: &'static str,
        elapsed: Duration,
        deadline: Duration,
    },

    /// A verification predicate evaluated false.
    #[error("assertion failed: {0}")]
    Assertion(String),

    #[error("I/O failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An external collaborator (admin API, dump retrieval, reference model) failed.
    #[error("{collaborator} failed: {details}")]
    Collaborator {
        collaborator: &'static str,
        details: String,
    },
}

/// Coarse classification of a [`ScenarioError`] for reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    Protocol,
    Timeout,
    Assertion,
    Io,
    Collaborator,
}

impl ScenarioError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Protocol(_) => ErrorKind::Protocol,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Assertion(_) => ErrorKind::Assertion,
            Self::Io { .. } => ErrorKind::Io,
            Self::Collaborator { .. } => ErrorKind::Collaborator,
        }
    }

    /// Wrap a collaborator failure.
    pub fn collaborator(collaborator: &'static str, details: impl ToString) -> Self {
        Self::Collaborator { collaborator, details: details.to_string() }
    }
}
