//! Runs that play many hands: the exhaustive return to player over every
//! deal and the monte carlo simulator. Both split their work over threads
//! that report back over a channel, and partial statistics are combined
//! with a structural merge.

/// Errors for runs, workers and merges.
mod errors;
pub use self::errors::{EngineError, MergeError, WorkerError, WorkerId};

mod merge;
pub use self::merge::merge_values;

/// The worker protocol and the coordinator.
mod worker;
pub use self::worker::{
    DEFAULT_PROGRESS_STEPS, EngineConfig, Progress, WorkerContext, WorkerMessage,
    default_worker_count, run_partitioned, split_count, split_range,
};

mod rtp;
pub use self::rtp::{RtpBreakdown, RtpCalculator, RtpResult, RtpStatistics, hand_count};

mod simulator;
pub use self::simulator::{Simulator, SimulatorStatistics};
