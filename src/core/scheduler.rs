/// Bounded parallel job runner
///
/// Submits independent jobs to a work-stealing pool and waits for them up to a
/// fixed ceiling. Jobs still running when the ceiling passes are abandoned:
/// nothing cancels them, the caller simply stops waiting.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use indicatif::ProgressBar;
use log::{debug, error, warn};

use crate::config::RunConfig;

/// One independent unit of work
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Error raised while running a batch of jobs
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("Failed to build thread pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    /// Every completion handle was dropped before all jobs reported back
    #[error("Interrupted while waiting for {pending} of {submitted} jobs")]
    Interrupted { pending: usize, submitted: usize },
}

/// Outcome of a batch
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub submitted: usize,
    pub completed: usize,
    /// Jobs still running when the wait ceiling passed
    pub abandoned: usize,
}

impl RunSummary {
    pub fn timed_out(&self) -> bool {
        self.abandoned > 0
    }
}

/// Work-stealing scheduler with a join timeout
#[derive(Debug, Clone)]
pub struct Scheduler {
    workers: usize,
    wait_ceiling: Duration,
}

impl Scheduler {
    pub fn new(config: &RunConfig) -> Self {
        Self {
            workers: config.worker_count(),
            wait_ceiling: config.wait_ceiling,
        }
    }

    /// Run all jobs and block until they finish or the wait ceiling passes.
    ///
    /// A panicking job is logged and counted as completed; the others keep
    /// running.
    ///
    /// # Arguments
    ///
    /// * `jobs` - Independent units of work
    /// * `progress` - Advanced once per finished job
    ///
    /// # Returns
    ///
    /// How many jobs finished in time
    pub fn run(&self, jobs: Vec<Job>, progress: &ProgressBar) -> Result<RunSummary, SchedulerError> {
        let submitted = jobs.len();
        if submitted == 0 {
            return Ok(RunSummary::default());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("sequence-worker-{}", i))
            .build()?;
        debug!("Submitting {} jobs to {} workers", submitted, self.workers);

        let (done_tx, done_rx) = mpsc::channel::<usize>();
        for (id, job) in jobs.into_iter().enumerate() {
            let done_tx = done_tx.clone();
            pool.spawn(move || {
                if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
                    error!("Job {} panicked", id);
                }
                let _ = done_tx.send(id);
            });
        }
        drop(done_tx);

        gather(&done_rx, submitted, self.wait_ceiling, progress)
    }
}

/// Wait for `submitted` completion signals until the ceiling passes.
///
/// The channel disconnects early only when a job is dropped without running,
/// e.g. when the pool shuts its workers down before reaching it. Every job
/// that runs reports back, even if it panicked.
fn gather(
    done_rx: &Receiver<usize>,
    submitted: usize,
    wait_ceiling: Duration,
    progress: &ProgressBar,
) -> Result<RunSummary, SchedulerError> {
    let deadline = Instant::now() + wait_ceiling;
    let mut completed = 0;
    while completed < submitted {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match done_rx.recv_timeout(remaining) {
            Ok(id) => {
                debug!("Job {} finished", id);
                completed += 1;
                progress.inc(1);
            }
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    "Stopped waiting after {:?} with {} jobs still running",
                    wait_ceiling,
                    submitted - completed
                );
                break;
            }
            Err(RecvTimeoutError::Disconnected) => {
                return Err(SchedulerError::Interrupted {
                    pending: submitted - completed,
                    submitted,
                });
            }
        }
    }

    Ok(RunSummary {
        submitted,
        completed,
        abandoned: submitted - completed,
    })
}
