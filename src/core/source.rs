/// Per-source orchestration
///
/// Runs tokenizer, aggregator and reporter for one source and hands the framed
/// message to a sink.

use std::io::BufRead;

use log::{debug, info};

use crate::core::report;
use crate::utils::output_formatter::format_message;

/// Descriptor used for standard input
pub const STDIN_DESCRIPTOR: &str = "System.in";

/// Receiver of rendered reports.
///
/// Sinks can be shared between concurrently running jobs.
pub trait ReportSink: Send + Sync {
    fn deliver(&self, message: String);
}

impl<F> ReportSink for F
where
    F: Fn(String) + Send + Sync,
{
    fn deliver(&self, message: String) {
        self(message)
    }
}

/// Produce the report for one source and deliver it.
///
/// Nothing happens when the descriptor, the reader or the sink is missing.
/// Read failures are reported as the error body; they never propagate.
///
/// # Arguments
///
/// * `descriptor` - Name of the source shown in the header
/// * `reader` - Buffered source of text lines, released when this returns
/// * `sink` - Receiver of the framed message
///
/// # Returns
///
/// Whether a message was delivered
pub fn process_source<R: BufRead>(
    descriptor: Option<&str>,
    reader: Option<R>,
    sink: Option<&dyn ReportSink>,
) -> bool {
    let (Some(descriptor), Some(reader), Some(sink)) = (descriptor, reader, sink) else {
        debug!("Skipping source with missing descriptor, reader or sink");
        return false;
    };

    info!("Processing source: {}", descriptor);
    let body = report::frequent_sequences(Some(reader));
    sink.deliver(format_message(descriptor, &body));
    true
}
