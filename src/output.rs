//! Terminal output and styling.
//!
//! Provides the CLI's [`ProgressSink`] implementation: colored log lines
//! printed behind an indicatif spinner that tracks the status line and the
//! processed-file counter. Also holds static helpers for final messages and
//! the per-category summary table.

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;

use crate::progress::{LogLevel, ProgressEvent, ProgressSink};

/// Progress sink that renders the event stream to the terminal.
pub struct TerminalSink {
    bar: ProgressBar,
}

impl TerminalSink {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg} [{pos} files]")
                .expect("Invalid progress bar template"),
        );
        Self { bar }
    }

    /// Stop the spinner and clear its line; call before printing the final
    /// summary.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for TerminalSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for TerminalSink {
    fn emit(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::Log { level, message } => {
                let line = match level {
                    LogLevel::Info => message,
                    LogLevel::Success => format!("{} {}", "✓".green(), message),
                    LogLevel::Error => format!("{} {}", "✗".red(), message),
                    LogLevel::DryRun => format!("[DRY RUN] {}", message).yellow().to_string(),
                };
                self.bar.println(line);
            }
            ProgressEvent::Status(message) => {
                self.bar.set_message(message);
            }
            ProgressEvent::FileProcessed(count) => {
                self.bar.set_position(count);
            }
        }
    }
}

/// Static helpers for output outside the progress stream.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a summary table with file counts by category.
    pub fn summary_table(category_counts: &BTreeMap<String, usize>, total_files: usize) {
        Self::header("SUMMARY");

        let max_category_len = category_counts
            .keys()
            .map(|name| name.len())
            .max()
            .unwrap_or(0)
            .max(8); // At least "Category" width

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = max_category_len
        );
        println!("{}", "-".repeat(max_category_len + 10));

        for (category, count) in category_counts {
            let file_word = if *count == 1 { "file" } else { "files" };
            println!(
                "{:<width$} | {} {}",
                category,
                count.to_string().green(),
                file_word,
                width = max_category_len
            );
        }

        println!("{}", "-".repeat(max_category_len + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            if total_files == 1 { "file" } else { "files" },
            width = max_category_len
        );
    }
}
