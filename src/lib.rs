/// Word Sequence Frequency - reports the most common three-word sequences
///
/// This library tokenizes text sources, counts every overlapping three-word
/// window, and renders the 100 most frequent sequences per source. Several
/// files can be processed in parallel.

// Re-export core modules
pub mod core;
pub mod utils;

// Re-export main entry points for convenience
pub use crate::core::aggregator::{count_sequences, FrequencyTable, SequenceError};
pub use crate::core::report::{frequent_sequences, Report};
pub use crate::core::source::{process_source, ReportSink};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Fixed counting policy and run settings
pub mod config {
    use std::time::Duration;

    /// Number of consecutive tokens in a sequence
    pub const WINDOW_SIZE: usize = 3;

    /// Maximum number of lines in a report
    pub const TOP_K: usize = 100;

    /// How long to wait for parallel jobs before abandoning them
    pub const DEFAULT_WAIT_CEILING: Duration = Duration::from_secs(5 * 60);

    /// Settings for a multi-file run
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RunConfig {
        /// Number of worker threads, 0 for one per logical core
        pub workers: usize,
        /// Upper bound on waiting for the whole batch
        pub wait_ceiling: Duration,
    }

    impl Default for RunConfig {
        fn default() -> Self {
            Self {
                workers: 0,
                wait_ceiling: DEFAULT_WAIT_CEILING,
            }
        }
    }

    impl RunConfig {
        /// Resolve the worker count, using available parallelism for 0
        pub fn worker_count(&self) -> usize {
            if self.workers == 0 {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1)
            } else {
                self.workers
            }
        }
    }
}

/// Command-line application functionality
pub mod app {
    use std::io::BufRead;
    use std::sync::Arc;

    use anyhow::Result;
    use indicatif::ProgressBar;
    use log::info;

    use crate::config::RunConfig;
    use crate::core::scheduler::{Job, RunSummary, Scheduler, SchedulerError};
    use crate::core::source::{self, ReportSink, STDIN_DESCRIPTOR};
    use crate::utils::file_utils;
    use crate::utils::output_formatter::NO_INPUT;

    /// Report on a single input stream on the calling thread
    ///
    /// An absent or empty stream delivers the no-input message instead of a
    /// report.
    ///
    /// # Arguments
    ///
    /// * `input` - Piped standard input, or `None` for an interactive terminal
    /// * `sink` - Receiver of the message
    ///
    /// # Returns
    ///
    /// Whether a report was produced
    pub fn process_input<R: BufRead>(input: Option<R>, sink: &dyn ReportSink) -> Result<bool> {
        if let Some(mut input) = input {
            if file_utils::has_pending_input(&mut input)? {
                return Ok(source::process_source(Some(STDIN_DESCRIPTOR), Some(input), Some(sink)));
            }
        }
        sink.deliver(NO_INPUT.to_string());
        Ok(false)
    }

    /// Report on every readable file, in parallel
    ///
    /// Paths that are not existing regular files are skipped. Each file gets
    /// its own job, and reports reach the sink in completion order.
    ///
    /// # Arguments
    ///
    /// * `paths` - File paths as given on the command line
    /// * `config` - Worker count and wait ceiling
    /// * `sink` - Receiver shared by all jobs
    /// * `progress` - Advanced once per finished file
    ///
    /// # Returns
    ///
    /// How many files were submitted and finished in time
    pub fn process_files<S: AsRef<str>>(
        paths: &[S],
        config: &RunConfig,
        sink: Arc<dyn ReportSink>,
        progress: &ProgressBar,
    ) -> Result<RunSummary, SchedulerError> {
        let sources = file_utils::collect_sources(paths);
        info!("{} of {} paths selected for processing", sources.len(), paths.len());
        progress.set_length(sources.len() as u64);

        let jobs: Vec<Job> = sources
            .into_iter()
            .map(|file_utils::Source { descriptor, reader }| {
                let sink = Arc::clone(&sink);
                Box::new(move || {
                    source::process_source(Some(descriptor.as_str()), Some(reader), Some(&*sink));
                }) as Job
            })
            .collect();

        Scheduler::new(config).run(jobs, progress)
    }
}
