/// Utility modules for the sequence frequency tool
///
/// This module contains utility functions for opening sources, inspecting
/// standard input, and formatting console output.

pub mod file_utils;
pub mod output_formatter;
