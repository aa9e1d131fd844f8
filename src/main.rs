/// Word Sequence Frequency - prints the 100 most common three-word sequences
///
/// The main entry point for the command-line tool. It parses arguments, sets
/// up logging, and dispatches to either standard input or the file runner.

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, LevelFilter};
use std::fs::File;
use std::sync::Arc;
use std::time::{Duration, Instant};

use word_sequence_frequency::app;
use word_sequence_frequency::config::RunConfig;
use word_sequence_frequency::core::scheduler::SchedulerError;
use word_sequence_frequency::utils::file_utils;
use word_sequence_frequency::utils::output_formatter::{self, StdoutSink};

/// Command line argument structure
#[derive(Parser, Debug)]
#[command(
    name = "word_sequence_frequency",
    version,
    about = "Reports the 100 most frequent three-word sequences",
    long_about = "Reads each file given as an argument, or standard input when no files are given,
and prints the 100 most frequent three-word sequences found in each source.
Words are lowercased and stripped of punctuation before counting."
)]
struct Args {
    /// Path(s) to the file(s) to process
    #[arg(name = "file_paths")]
    file_paths: Vec<String>,

    /// Number of parallel workers (0=auto, default: auto)
    #[arg(long = "parallel", default_value = "0")]
    parallel: usize,

    /// Seconds to wait for all files before giving up on the rest (default: 300)
    #[arg(long = "wait-timeout", default_value = "300")]
    wait_timeout: u64,

    /// Set logging level (default: WARN)
    #[arg(long = "log-level", default_value = "warn")]
    log_level: LevelFilter,

    /// Write logs to this file instead of standard error
    #[arg(long = "log-file")]
    log_file: Option<String>,

    /// Show a progress bar on standard error while processing files
    #[arg(long = "progress", action = ArgAction::SetTrue)]
    progress: bool,
}

/// Main entry point function
fn main() -> Result<()> {
    let start_time = Instant::now();

    let args = Args::parse();

    if let Err(e) = setup_logging(&args) {
        eprintln!(
            "{}",
            output_formatter::format_warning(&format!("Failed to set up logging: {:#}", e))
        );
    }

    if !args.file_paths.is_empty() {
        process_files(&args)?;
    } else {
        app::process_input(file_utils::piped_stdin(), &StdoutSink)?;
    }

    info!("Finished in {:.2} seconds", start_time.elapsed().as_secs_f64());
    Ok(())
}

/// Set up logging with optional file output
fn setup_logging(args: &Args) -> Result<()> {
    let mut builder = env_logger::Builder::new();

    builder.filter_level(args.log_level);

    builder.format(|buf, record| {
        use chrono::Local;
        use std::io::Write;
        writeln!(
            buf,
            "{} - {} - {} - {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.target(),
            record.args()
        )
    });

    if let Some(log_file) = &args.log_file {
        let file = File::create(log_file)
            .with_context(|| format!("Cannot create log file {}", log_file))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.try_init()?;

    Ok(())
}

/// Process every file argument in parallel and report stragglers
fn process_files(args: &Args) -> Result<()> {
    let config = RunConfig {
        workers: args.parallel,
        wait_ceiling: Duration::from_secs(args.wait_timeout),
    };

    let progress_bar = if args.progress {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({eta})")
                .map_err(|e| anyhow!("Invalid progress template: {}", e))?
                .progress_chars("#>-"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    match app::process_files(&args.file_paths, &config, Arc::new(StdoutSink), &progress_bar) {
        Ok(summary) => {
            progress_bar.finish_and_clear();
            if summary.timed_out() {
                eprintln!(
                    "{}",
                    output_formatter::format_abandoned(summary.abandoned, summary.submitted)
                );
            }
            Ok(())
        }
        Err(e @ SchedulerError::Interrupted { .. }) => {
            progress_bar.abandon();
            output_formatter::write_line(&mut std::io::stdout().lock(), &e.to_string());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
