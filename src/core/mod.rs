/// Core module for word sequence counting
///
/// This module contains the tokenizer, the sliding-window aggregator, the top-K
/// reporter, per-source orchestration and the parallel job scheduler.

pub mod aggregator;
pub mod report;
pub mod scheduler;
pub mod source;
pub mod tokenizer;
