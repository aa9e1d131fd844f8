/// Top-K ranking and report rendering
///
/// Selects the most frequent sequences from a frequency table and renders them
/// as `"<count> - <sequence>"` lines.

use std::cmp::Ordering;
use std::fmt;
use std::io::BufRead;

use log::error;

use crate::config::TOP_K;
use crate::core::aggregator::{self, FrequencyTable};

/// Body used when a source produced no sequences
pub const NO_SEQUENCES: &str = "No word sequences found";

/// Body used when reading or counting a source failed
pub const PROCESSING_ERROR: &str = "An error occurred";

/// Body used when no reader was supplied
pub const INVALID_INPUT: &str = "Invalid input";

/// A single ranked report line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedSequence {
    pub count: u64,
    pub sequence: String,
}

impl fmt::Display for RankedSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.count, self.sequence)
    }
}

/// Rendered result for one source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    /// Highest counts first, at most `TOP_K` entries
    Ranked(Vec<RankedSequence>),
    /// The source had fewer than three tokens
    Empty,
    /// Reading or counting the source failed
    Failed,
    /// No source was supplied
    Invalid,
}

impl Report {
    /// Rank a frequency table.
    ///
    /// Entries are ordered by count descending, equal counts by sequence
    /// ascending, and truncated to `TOP_K`.
    pub fn from_table(table: FrequencyTable) -> Self {
        if table.is_empty() {
            return Report::Empty;
        }

        let mut entries: Vec<(String, u64)> = table.into_iter().collect();
        entries.sort_unstable_by(|(a_seq, a_count), (b_seq, b_count)| {
            match b_count.cmp(a_count) {
                Ordering::Equal => a_seq.cmp(b_seq),
                other => other,
            }
        });
        entries.truncate(TOP_K);

        Report::Ranked(
            entries
                .into_iter()
                .map(|(sequence, count)| RankedSequence { count, sequence })
                .collect(),
        )
    }

    /// Ranked entries, empty for every sentinel variant
    pub fn entries(&self) -> &[RankedSequence] {
        match self {
            Report::Ranked(entries) => entries,
            _ => &[],
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Ranked(entries) => {
                for (i, entry) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str("\n")?;
                    }
                    write!(f, "{}", entry)?;
                }
                Ok(())
            }
            Report::Empty => f.write_str(NO_SEQUENCES),
            Report::Failed => f.write_str(PROCESSING_ERROR),
            Report::Invalid => f.write_str(INVALID_INPUT),
        }
    }
}

/// Count and rank a line source in one step
pub fn build_report<R: BufRead>(reader: Option<R>) -> Report {
    if reader.is_none() {
        return Report::Invalid;
    }

    match aggregator::count_sequences(reader) {
        Ok(table) => Report::from_table(table),
        Err(e) => {
            error!("{}", e);
            Report::Failed
        }
    }
}

/// Report body for a line source: ranked lines or one of the sentinel messages
pub fn frequent_sequences<R: BufRead>(reader: Option<R>) -> String {
    build_report(reader).to_string()
}
