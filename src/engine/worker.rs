use std::any::Any;
use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{Level, event};

use super::{EngineError, WorkerError, WorkerId, merge_values};

/// Default number of progress reports per worker.
pub const DEFAULT_PROGRESS_STEPS: u64 = 1000;

/// Half the logical cores, rounded up, and never less than one.
pub fn default_worker_count() -> usize {
    num_cpus::get().div_ceil(2).max(1)
}

/// How a run is spread over threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub workers: usize,
    /// Seed for the first worker. Worker `i` uses `seed + i`. `None` seeds
    /// every worker from the operating system.
    pub seed: Option<u64>,
    /// How many progress messages each worker sends over its partition.
    pub progress_steps: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workers: default_worker_count(),
            seed: None,
            progress_steps: DEFAULT_PROGRESS_STEPS,
        }
    }
}

impl EngineConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_progress_steps(mut self, progress_steps: u64) -> Self {
        self.progress_steps = progress_steps.max(1);
        self
    }

    /// The seed for one worker's random number generator.
    pub fn worker_seed(&self, worker: WorkerId) -> Option<u64> {
        self.seed.map(|s| s.wrapping_add(worker.0 as u64))
    }
}

/// What a worker tells the coordinator. Every worker ends with exactly one
/// `Done` or `Error`.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerMessage {
    Progress {
        worker: WorkerId,
        processed: u64,
        target: u64,
    },
    Done {
        worker: WorkerId,
        statistics: Value,
    },
    Error {
        worker: WorkerId,
        message: String,
        detail: String,
    },
}

/// Units processed across every worker of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub processed: u64,
    pub target: u64,
}

impl Progress {
    pub fn fraction(&self) -> f64 {
        if self.target == 0 {
            return 1.0;
        }
        self.processed as f64 / self.target as f64
    }
}

/// Contiguous ranges covering `0..total`. The last range takes the
/// remainder.
///
/// ```
/// use rs_video_poker::engine::split_range;
///
/// assert_eq!(vec![0..3, 3..6, 6..10], split_range(10, 3));
/// ```
pub fn split_range(total: u64, workers: usize) -> Vec<Range<u64>> {
    if workers == 0 {
        return vec![];
    }
    let w = workers as u64;
    let chunk = total / w;
    (0..w)
        .map(|i| {
            let end = if i + 1 == w { total } else { (i + 1) * chunk };
            i * chunk..end
        })
        .collect()
}

/// Per worker counts summing to `total`. The first worker takes the
/// remainder.
///
/// ```
/// use rs_video_poker::engine::split_count;
///
/// assert_eq!(vec![4, 3, 3], split_count(10, 3));
/// ```
pub fn split_count(total: u64, workers: usize) -> Vec<u64> {
    if workers == 0 {
        return vec![];
    }
    let w = workers as u64;
    let chunk = total / w;
    (0..w)
        .map(|i| if i == 0 { total - chunk * (w - 1) } else { chunk })
        .collect()
}

/// A worker's handle on the coordinator.
#[derive(Debug)]
pub struct WorkerContext<'a> {
    id: WorkerId,
    target: u64,
    step: u64,
    sender: mpsc::Sender<WorkerMessage>,
    abort: &'a AtomicBool,
}

impl WorkerContext<'_> {
    pub fn id(&self) -> WorkerId {
        self.id
    }

    /// Units of work in this worker's partition.
    pub fn target(&self) -> u64 {
        self.target
    }

    /// Record that `processed` units are done. Every so often this reports
    /// progress and stops the worker when the run has been aborted.
    pub fn tick(&self, processed: u64) -> Result<(), WorkerError> {
        if processed % self.step != 0 && processed != self.target {
            return Ok(());
        }
        if self.abort.load(Ordering::Relaxed) {
            return Err(WorkerError::Aborted);
        }
        self.sender
            .send(WorkerMessage::Progress {
                worker: self.id,
                processed,
                target: self.target,
            })
            .map_err(|_| WorkerError::Aborted)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}

fn run_worker<J, T, F>(context: WorkerContext<'_>, job: J, work: &F) -> WorkerMessage
where
    T: Serialize,
    F: Fn(&WorkerContext<'_>, J) -> Result<T, WorkerError>,
{
    let worker = context.id;
    match panic::catch_unwind(AssertUnwindSafe(|| work(&context, job))) {
        Ok(Ok(partial)) => match serde_json::to_value(&partial) {
            Ok(statistics) => WorkerMessage::Done { worker, statistics },
            Err(e) => WorkerMessage::Error {
                worker,
                message: "unable to encode partial statistics".to_string(),
                detail: e.to_string(),
            },
        },
        Ok(Err(e)) => WorkerMessage::Error {
            worker,
            message: e.to_string(),
            detail: format!("{e:?}"),
        },
        Err(payload) => WorkerMessage::Error {
            worker,
            message: panic_message(payload.as_ref()),
            detail: "panicked".to_string(),
        },
    }
}

/// Run one worker thread per job and merge what they produce.
///
/// Each job is paired with the number of units it covers. Workers send
/// their partial statistics as JSON, which are summed with
/// [`merge_values`] and decoded back into `T`. The first failure raises an
/// abort flag that the other workers notice at their next progress point.
/// The run only returns once every worker has finished, and any failure
/// means no statistics are returned.
pub fn run_partitioned<J, T, F, P>(
    config: &EngineConfig,
    jobs: Vec<(u64, J)>,
    work: F,
    mut on_progress: P,
) -> Result<T, EngineError>
where
    J: Send,
    T: Serialize + DeserializeOwned,
    F: Fn(&WorkerContext<'_>, J) -> Result<T, WorkerError> + Sync,
    P: FnMut(Progress),
{
    if jobs.is_empty() {
        return Err(EngineError::NoWork);
    }
    let worker_count = jobs.len();
    let target: u64 = jobs.iter().map(|(units, _)| units).sum();
    let abort = AtomicBool::new(false);
    let (sender, receiver) = mpsc::channel();

    event!(Level::INFO, workers = worker_count, target, "starting run");
    let start = Instant::now();

    let result = thread::scope(|scope| {
        for (i, (units, job)) in jobs.into_iter().enumerate() {
            event!(Level::DEBUG, worker = i, units, "spawning worker");
            let context = WorkerContext {
                id: WorkerId(i),
                target: units,
                step: (units / config.progress_steps.max(1)).max(1),
                sender: sender.clone(),
                abort: &abort,
            };
            let work = &work;
            scope.spawn(move || {
                let sender = context.sender.clone();
                let message = run_worker(context, job, work);
                // The coordinator only hangs up after every terminal message.
                let _ = sender.send(message);
            });
        }
        drop(sender);

        let mut processed = vec![0u64; worker_count];
        let mut merged = Value::Null;
        let mut failure: Option<EngineError> = None;
        let mut finished = 0;
        while finished < worker_count {
            let Ok(message) = receiver.recv() else {
                return Err(failure.unwrap_or(EngineError::Disconnected));
            };
            match message {
                WorkerMessage::Progress {
                    worker,
                    processed: done,
                    ..
                } => {
                    processed[worker.0] = done;
                    let gross = Progress {
                        processed: processed.iter().sum(),
                        target,
                    };
                    event!(Level::TRACE, %worker, done, gross = gross.processed, "progress");
                    on_progress(gross);
                }
                WorkerMessage::Done { worker, statistics } => {
                    finished += 1;
                    event!(Level::DEBUG, %worker, "worker finished");
                    if failure.is_none() {
                        if let Err(e) = merge_values(&mut merged, &statistics) {
                            abort.store(true, Ordering::Relaxed);
                            failure = Some(e.into());
                        }
                    }
                }
                WorkerMessage::Error {
                    worker,
                    message,
                    detail,
                } => {
                    finished += 1;
                    event!(Level::WARN, %worker, %message, %detail, "worker failed");
                    abort.store(true, Ordering::Relaxed);
                    if failure.is_none() {
                        failure = Some(EngineError::Worker {
                            worker,
                            message,
                            detail,
                        });
                    }
                }
            }
        }
        match failure {
            Some(e) => Err(e),
            None => Ok(merged),
        }
    });

    let merged = result?;
    event!(
        Level::INFO,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "run finished"
    );
    Ok(serde_json::from_value(merged)?)
}
