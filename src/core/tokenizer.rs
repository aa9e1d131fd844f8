/// Line tokenizer and word normalizer
///
/// Turns raw text lines into a lazy stream of normalized word tokens. Lines are
/// split on runs of ASCII whitespace, every fragment has its punctuation removed
/// and is lowercased. Tokens flow across line boundaries without any separator.
/// Bytes that are not valid UTF-8 are replaced with U+FFFD rather than failing
/// the whole source.

use std::io::{self, BufRead};
use std::vec;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Runs of ASCII whitespace (space, tab, newline, vertical tab, form feed, carriage return)
    static ref WHITESPACE: Regex = Regex::new(r"(?-u:\s)+").unwrap();

    /// POSIX punctuation class
    static ref PUNCTUATION: Regex = Regex::new(r"[[:punct:]]").unwrap();
}

/// Normalize a single word fragment.
///
/// Removes every punctuation character and lowercases what is left. A fragment
/// made only of punctuation normalizes to the empty string.
///
/// # Arguments
///
/// * `fragment` - A whitespace-free piece of a line
///
/// # Returns
///
/// The normalized token
pub fn normalize(fragment: &str) -> String {
    PUNCTUATION.replace_all(fragment, "").to_lowercase()
}

/// Split a line into its non-empty whitespace-delimited fragments
pub fn split_fragments(line: &str) -> impl Iterator<Item = &str> {
    WHITESPACE.split(line).filter(|fragment| !fragment.is_empty())
}

/// Lines of a buffered reader, decoded lossily.
///
/// Line terminators (`\n` or `\r\n`) are stripped. Only genuine read errors
/// are yielded as `Err`.
pub struct LossyLines<R> {
    reader: R,
    buffer: Vec<u8>,
}

impl<R: BufRead> Iterator for LossyLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buffer.clear();
        match self.reader.read_until(b'\n', &mut self.buffer) {
            Ok(0) => None,
            Ok(_) => {
                if self.buffer.last() == Some(&b'\n') {
                    self.buffer.pop();
                    if self.buffer.last() == Some(&b'\r') {
                        self.buffer.pop();
                    }
                }
                Some(Ok(String::from_utf8_lossy(&self.buffer).into_owned()))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

/// Read lines without rejecting invalid UTF-8
pub fn lossy_lines<R: BufRead>(reader: R) -> LossyLines<R> {
    LossyLines {
        reader,
        buffer: Vec::new(),
    }
}

/// Lazy, single-pass token stream over a sequence of lines.
///
/// Read errors coming from the line source are passed through as `Err` items so
/// the consumer decides how to handle them.
pub struct Tokens<L> {
    lines: L,
    pending: vec::IntoIter<String>,
}

impl<L> Tokens<L>
where
    L: Iterator<Item = io::Result<String>>,
{
    pub fn new(lines: L) -> Self {
        Self {
            lines,
            pending: Vec::new().into_iter(),
        }
    }
}

impl<L> Iterator for Tokens<L>
where
    L: Iterator<Item = io::Result<String>>,
{
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(token) = self.pending.next() {
                return Some(Ok(token));
            }

            match self.lines.next()? {
                Ok(line) => {
                    if line.is_empty() {
                        continue;
                    }
                    let tokens: Vec<String> = split_fragments(&line).map(normalize).collect();
                    self.pending = tokens.into_iter();
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Tokenize any source of lines, e.g. [`lossy_lines`]
pub fn tokenize<I>(lines: I) -> Tokens<I::IntoIter>
where
    I: IntoIterator<Item = io::Result<String>>,
{
    Tokens::new(lines.into_iter())
}
