/// Output formatting for frequency reports
///
/// This module frames report bodies for the console and provides the standard
/// output sink. Report text is always plain; color is reserved for diagnostics
/// written to standard error.

use std::io::{self, Write};

use colored::Colorize;
use log::{debug, warn};

use crate::core::source::ReportSink;

/// Printed when neither file paths nor piped input were given
pub const NO_INPUT: &str = "No valid input provided";

/// Frame a report body with the source header
///
/// # Arguments
///
/// * `descriptor` - Name of the source (file path or `System.in`)
/// * `body` - Rendered report or sentinel message
///
/// # Returns
///
/// The message handed to the sink
pub fn format_message(descriptor: &str, body: &str) -> String {
    format!("\n'{}' frequent sequences: \n\n{}", descriptor, body)
}

/// Write one message as a line, logging instead of failing on write errors.
///
/// A closed pipe (e.g. output piped into `head`) is expected and only logged
/// at debug level.
///
/// # Returns
///
/// Whether the message was written
pub fn write_line<W: Write>(out: &mut W, message: &str) -> bool {
    match writeln!(out, "{}", message).and_then(|_| out.flush()) {
        Ok(()) => true,
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            debug!("Output closed early: {}", e);
            false
        }
        Err(e) => {
            warn!("Failed to write report: {}", e);
            false
        }
    }
}

/// Sink that prints every message on standard output
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl ReportSink for StdoutSink {
    fn deliver(&self, message: String) {
        write_line(&mut io::stdout().lock(), &message);
    }
}

/// Colored one-line warning for standard error
pub fn format_warning(message: &str) -> String {
    format!("{} {}", "Warning:".yellow().bold(), message)
}

/// Diagnostic for a batch that outlived the wait ceiling
pub fn format_abandoned(abandoned: usize, submitted: usize) -> String {
    format_warning(&format!(
        "{} of {} files did not finish in time",
        abandoned, submitted
    ))
}
