//! Progress event stream consumed by the caller's shell.
//!
//! The engine never prints directly. Every operation takes a [`ProgressSink`]
//! and emits structured events through it: log lines with a severity, status
//! line updates, and a running processed-file counter. The CLI wires in a
//! terminal implementation; tests use [`NullSink`] or a collecting fake.

/// Severity attached to a log event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Routine progress information.
    Info,
    /// A completed action (a file moved, a directory created).
    Success,
    /// A per-file or per-directory failure; the pass continues.
    Error,
    /// A planned action reported during a dry run.
    DryRun,
}

/// A single event in the progress stream.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// A log line with its severity.
    Log { level: LogLevel, message: String },
    /// A status line update (replaces the previous status).
    Status(String),
    /// The running count of processed files.
    FileProcessed(u64),
}

/// Receiver for the engine's progress events.
///
/// Implementations must be cheap: the engine emits one or more events per
/// file and expects `emit` to never fail or block for long.
pub trait ProgressSink {
    fn emit(&self, event: ProgressEvent);
}

/// A sink that discards every event.
pub struct NullSink;

impl ProgressSink for NullSink {
    fn emit(&self, _event: ProgressEvent) {}
}

/// Convenience constructors over any sink, so call sites read as
/// `sink.info(...)` instead of assembling events by hand.
pub trait ProgressSinkExt {
    fn log(&self, level: LogLevel, message: impl Into<String>);
    fn info(&self, message: impl Into<String>);
    fn success(&self, message: impl Into<String>);
    fn error(&self, message: impl Into<String>);
    fn dry_run(&self, message: impl Into<String>);
    fn status(&self, message: impl Into<String>);
    fn file_processed(&self, count: u64);
}

impl<S: ProgressSink + ?Sized> ProgressSinkExt for S {
    fn log(&self, level: LogLevel, message: impl Into<String>) {
        self.emit(ProgressEvent::Log {
            level,
            message: message.into(),
        });
    }

    fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    fn success(&self, message: impl Into<String>) {
        self.log(LogLevel::Success, message);
    }

    fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    fn dry_run(&self, message: impl Into<String>) {
        self.log(LogLevel::DryRun, message);
    }

    fn status(&self, message: impl Into<String>) {
        self.emit(ProgressEvent::Status(message.into()));
    }

    fn file_processed(&self, count: u64) {
        self.emit(ProgressEvent::FileProcessed(count));
    }
}
