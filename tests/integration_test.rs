/// Integration tests for the word sequence frequency tool
///
/// These tests run whole sources through the public API, including the
/// parallel multi-file runner.

use std::collections::HashMap;
use std::io::{BufReader, Cursor};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use indicatif::ProgressBar;

use word_sequence_frequency::app;
use word_sequence_frequency::config::{RunConfig, TOP_K};
use word_sequence_frequency::core::report::NO_SEQUENCES;
use word_sequence_frequency::{count_sequences, frequent_sequences, process_source, ReportSink};

#[derive(Default)]
struct CollectingSink {
    messages: Mutex<Vec<String>>,
}

impl ReportSink for CollectingSink {
    fn deliver(&self, message: String) {
        self.messages.lock().unwrap().push(message);
    }
}

impl CollectingSink {
    fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.messages.lock().unwrap())
    }
}

/// Split a delivered message into its descriptor and body
fn parse_message(message: &str) -> (String, String) {
    let rest = message.strip_prefix("\n'").expect("message starts with header");
    let (descriptor, body) = rest
        .split_once("' frequent sequences: \n\n")
        .expect("header is followed by a blank line");
    (descriptor.to_string(), body.to_string())
}

fn write_file(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("Failed to write test file");
    path.to_string_lossy().to_string()
}

#[test]
fn test_punctuation_example() {
    let table = count_sequences(Some(Cursor::new(
        "It's a test. It's, a test. Its; a test!!!",
    )))
    .expect("Failed to count sequences");
    assert_eq!(table.get("its a test"), Some(3));
}

#[test]
fn test_file_report_counts() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = write_file(
        temp_dir.path(),
        "story.txt",
        "The quick brown fox.\nThe quick brown fox!\nthe QUICK brown dog",
    );

    let reader = BufReader::new(std::fs::File::open(&path).unwrap());
    let body = frequent_sequences(Some(reader));
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines[0], "3 - the quick brown");
    assert_eq!(lines[1], "2 - brown fox the");
    assert!(lines.contains(&"1 - quick brown dog"));
    assert!(!body.ends_with('\n'));
}

#[test]
fn test_report_is_capped() {
    let text: String = (0..500).map(|i| format!("word{} ", i)).collect();
    let body = frequent_sequences(Some(Cursor::new(text)));
    assert_eq!(body.lines().count(), TOP_K);
}

#[test]
fn test_multiple_files_in_parallel() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let mut expected = HashMap::new();
    let mut paths = Vec::new();
    for i in 0..8 {
        // Each file repeats its own triple a different number of times
        let triple = format!("alpha{} beta{} gamma{}", i, i, i);
        let content = vec![triple.as_str(); i + 1].join("\n");
        let path = write_file(temp_dir.path(), &format!("file{}.txt", i), &content);
        expected.insert(path.clone(), (triple, i + 1));
        paths.push(path);
    }
    paths.push(temp_dir.path().join("missing.txt").to_string_lossy().to_string());
    paths.push(temp_dir.path().to_string_lossy().to_string());

    let sink = Arc::new(CollectingSink::default());
    let config = RunConfig {
        workers: 4,
        wait_ceiling: Duration::from_secs(60),
    };
    let summary = app::process_files(&paths, &config, sink.clone(), &ProgressBar::hidden())
        .expect("Failed to process files");
    assert_eq!(summary.submitted, 8);
    assert_eq!(summary.completed, 8);

    let messages = sink.take();
    assert_eq!(messages.len(), 8);
    for message in messages {
        let (descriptor, body) = parse_message(&message);
        let (triple, count) = &expected[&descriptor];
        assert_eq!(body.lines().next().unwrap(), format!("{} - {}", count, triple));

        // Every word belongs to this file
        let index = file_index(&descriptor);
        for line in body.lines() {
            let (_, sequence) = line.split_once(" - ").unwrap();
            assert!(sequence.split(' ').all(|word| word.ends_with(&index)), "{}", line);
        }
    }
}

/// Digit that every word of a generated test file ends with
fn file_index(descriptor: &str) -> String {
    let stem = Path::new(descriptor).file_stem().unwrap().to_string_lossy();
    stem.trim_start_matches("file").to_string()
}

#[test]
fn test_empty_file_and_no_valid_paths() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let empty = write_file(temp_dir.path(), "empty.txt", "");

    let sink = Arc::new(CollectingSink::default());
    app::process_files(&[empty.clone()], &RunConfig::default(), sink.clone(), &ProgressBar::hidden())
        .expect("Failed to process files");
    let messages = sink.take();
    assert_eq!(messages.len(), 1);
    assert_eq!(parse_message(&messages[0]), (empty, NO_SEQUENCES.to_string()));

    let summary = app::process_files(
        &["/definitely/not/here.txt"],
        &RunConfig::default(),
        sink.clone(),
        &ProgressBar::hidden(),
    )
    .expect("Failed to process files");
    assert_eq!(summary.submitted, 0);
    assert!(sink.take().is_empty());
}

#[test]
fn test_process_source_with_closure() {
    let out = Mutex::new(String::new());
    let sink = |message: String| out.lock().unwrap().push_str(&message);
    let delivered = process_source(Some("inline"), Some(Cursor::new("a b c d")), Some(&sink));
    assert!(delivered);
    assert_eq!(
        out.into_inner().unwrap(),
        "\n'inline' frequent sequences: \n\n1 - a b c\n1 - b c d"
    );
}

#[test]
fn test_latin1_file_still_reported() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("latin1.txt");
    std::fs::write(&path, b"caf\xe9 au lait\ncaf\xe9 au lait\n").expect("Failed to write test file");

    let reader = BufReader::new(std::fs::File::open(&path).unwrap());
    let body = frequent_sequences(Some(reader));
    assert_eq!(body.lines().next(), Some("2 - caf\u{fffd} au lait"));
}
