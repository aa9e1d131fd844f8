/// File and stream handling utilities
///
/// This module selects which command-line paths can be processed, opens them,
/// and checks whether standard input carries any data.

use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal};
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, error};

/// A file selected for processing, opened before its job is submitted
pub struct Source {
    /// The path exactly as given on the command line
    pub descriptor: String,
    pub reader: BufReader<File>,
}

/// Whether a path names an existing regular file
pub fn is_regular_file(path: &Path) -> bool {
    path.metadata().map(|m| m.is_file()).unwrap_or(false)
}

/// Open a file for line-by-line reading
pub fn open_source(path: &str) -> Result<Source> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path))?;
    Ok(Source {
        descriptor: path.to_string(),
        reader: BufReader::new(file),
    })
}

/// Keep the paths that name regular files and open them.
///
/// Missing paths, directories and files that fail to open are skipped without
/// any user-facing message.
///
/// # Arguments
///
/// * `paths` - File paths as given on the command line
///
/// # Returns
///
/// Opened sources in argument order
pub fn collect_sources<S: AsRef<str>>(paths: &[S]) -> Vec<Source> {
    paths
        .iter()
        .map(AsRef::as_ref)
        .filter(|path| {
            let keep = is_regular_file(Path::new(path));
            if !keep {
                debug!("Skipping {}: not an existing regular file", path);
            }
            keep
        })
        .filter_map(|path| match open_source(path) {
            Ok(source) => Some(source),
            Err(e) => {
                error!("{:#}", e);
                None
            }
        })
        .collect()
}

/// Whether a buffered stream has at least one byte available.
///
/// Blocks until data arrives or the stream ends.
pub fn has_pending_input<R: BufRead>(reader: &mut R) -> Result<bool> {
    let buffer = reader.fill_buf().context("Failed to inspect input stream")?;
    Ok(!buffer.is_empty())
}

/// Standard input, unless it is an interactive terminal
pub fn piped_stdin() -> Option<io::StdinLock<'static>> {
    let stdin = io::stdin().lock();
    if stdin.is_terminal() {
        debug!("Standard input is a terminal");
        return None;
    }
    Some(stdin)
}
