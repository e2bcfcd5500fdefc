use std::fmt;

use thiserror::Error;

use crate::core::VideoPokerError;

/// Identifies one worker of a run by its partition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkerId(pub usize);

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "worker {}", self.0)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    #[error("Merge failed at `{path}`: {into} vs {from}")]
    TypeMismatch {
        path: String,
        into: &'static str,
        from: &'static str,
    },
    #[error("Merge failed at `{path}`: unable to merge {kind} values")]
    UnsupportedLeaf { path: String, kind: &'static str },
    #[error("Merge failed at `{path}`: sum is out of range")]
    Overflow { path: String },
}

/// Ends a worker early.
#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Aborted after another worker failed")]
    Aborted,
    #[error(transparent)]
    Core(#[from] VideoPokerError),
}

/// Why a run produced no statistics.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{worker} failed: {message}")]
    Worker {
        worker: WorkerId,
        message: String,
        detail: String,
    },
    #[error(transparent)]
    Merge(#[from] MergeError),
    #[error("Unable to decode merged statistics: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Workers stopped reporting before all of them finished")]
    Disconnected,
    #[error("There is no work to partition")]
    NoWork,
}
