/// Sliding-window sequence aggregation
///
/// Consumes a token stream through a fixed-size window and counts every
/// window's joined text. Windows overlap: tokens `[a, b, c, d]` produce the
/// keys `"a b c"` and `"b c d"`.

use std::collections::hash_map;
use std::collections::{HashMap, VecDeque};
use std::io::{self, BufRead};

use log::debug;

use crate::config::WINDOW_SIZE;
use crate::core::tokenizer;

/// Error raised while building a frequency table
#[derive(Debug, thiserror::Error)]
pub enum SequenceError {
    /// The underlying line source failed
    #[error("Failed to read source: {0}")]
    Read(#[from] io::Error),
}

/// Read-only mapping from sequence key to occurrence count
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: HashMap<String, u64>,
}

impl FrequencyTable {
    /// Count for a sequence key, if it was seen
    pub fn get(&self, sequence: &str) -> Option<u64> {
        self.counts.get(sequence).copied()
    }

    pub fn contains(&self, sequence: &str) -> bool {
        self.counts.contains_key(sequence)
    }

    /// Number of distinct sequence keys
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts, i.e. the number of windows observed
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Iterate over `(sequence, count)` pairs in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(sequence, count)| (sequence.as_str(), *count))
    }
}

impl IntoIterator for FrequencyTable {
    type Item = (String, u64);
    type IntoIter = hash_map::IntoIter<String, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.counts.into_iter()
    }
}

/// Incremental window counter.
///
/// Tokens must be pushed in source order since a sequence is defined by
/// adjacency. Call [`SequenceCounter::finish`] to obtain the table.
#[derive(Debug, Default)]
pub struct SequenceCounter {
    window: VecDeque<String>,
    counts: HashMap<String, u64>,
}

impl SequenceCounter {
    pub fn new() -> Self {
        Self {
            window: VecDeque::with_capacity(WINDOW_SIZE),
            counts: HashMap::new(),
        }
    }

    /// Add the next token and count the window if it is full
    pub fn push(&mut self, token: String) {
        self.window.push_back(token);
        if self.window.len() < WINDOW_SIZE {
            return;
        }

        let sequence = self
            .window
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        *self.counts.entry(sequence).or_insert(0) += 1;

        self.window.pop_front();
    }

    /// Stop counting and hand over the table
    pub fn finish(self) -> FrequencyTable {
        FrequencyTable {
            counts: self.counts,
        }
    }
}

/// Build a frequency table from already-normalized tokens
pub fn count_tokens<I>(tokens: I) -> FrequencyTable
where
    I: IntoIterator<Item = String>,
{
    let mut counter = SequenceCounter::new();
    for token in tokens {
        counter.push(token);
    }
    counter.finish()
}

/// Build a frequency table from a line source.
///
/// An absent reader yields an empty table. The first read failure stops the
/// pass and is returned.
///
/// # Arguments
///
/// * `reader` - Buffered source of text lines
///
/// # Returns
///
/// The frequency table of every window in the source
pub fn count_sequences<R: BufRead>(reader: Option<R>) -> Result<FrequencyTable, SequenceError> {
    let Some(reader) = reader else {
        return Ok(FrequencyTable::default());
    };

    let mut counter = SequenceCounter::new();
    for token in tokenizer::tokenize(tokenizer::lossy_lines(reader)) {
        counter.push(token?);
    }

    let table = counter.finish();
    debug!(
        "Counted {} windows across {} distinct sequences",
        table.total(),
        table.len()
    );
    Ok(table)
}

/// Reader that always fails, for exercising read errors
#[cfg(test)]
pub(crate) struct FailingReader;

#[cfg(test)]
impl io::Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "device unplugged"))
    }
}
