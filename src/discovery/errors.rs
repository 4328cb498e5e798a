//! Discovery error types.
//!
//! Only [`DiscoveryError`] ever escapes `discover`; [`LoadError`]s are collected per pass and
//! exposed through `TestDiscoverer::errors`.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Configuration problems that abort a whole discovery call.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("duplicate test suites: '{name}' - {} and {}", .first.display(), .duplicate.display())]
    DuplicateSuite {
        name: String,
        first: PathBuf,
        duplicate: PathBuf,
    },
}

/// What went wrong while loading a test source.
#[derive(Debug, Error)]
pub enum LoadFailure {
    #[error("cannot read test source: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Lua(#[from] mlua::Error),

    #[error("cannot derive a test case name from the file name")]
    InvalidName,
}

/// A test source failed to load.
///
/// Carries the original failure plus the interpreter's stack trace cut down to the frames between
/// the failure and the test file's own main chunk.
#[derive(Debug, Error)]
#[error("{}: {}", .path.display(), .message)]
pub struct LoadError {
    path: PathBuf,
    message: String,
    backtrace: Vec<String>,
    #[source]
    original: LoadFailure,
}

impl LoadError {
    pub fn new(path: &Path, original: impl Into<LoadFailure>) -> Self {
        let original = original.into();
        let (message, frames) = split_traceback(&original.to_string());
        let backtrace = match path.file_name().and_then(|n| n.to_str()) {
            Some(file_name) => filter_frames(frames, file_name),
            None => frames,
        };
        Self {
            path: path.to_path_buf(),
            message,
            backtrace,
            original,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The error message without the stack trace.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Filtered stack frames, innermost first.
    pub fn backtrace(&self) -> &[String] {
        &self.backtrace
    }

    pub fn original_error(&self) -> &LoadFailure {
        &self.original
    }

    /// Message followed by the filtered trace, one frame per line.
    pub fn report(&self) -> String {
        let mut report = format!("{}: {}", self.path.display(), self.message);
        for frame in &self.backtrace {
            report.push('\n');
            report.push_str(frame);
        }
        report
    }
}

/// Split interpreter error text into the message and its `stack traceback:` frames.
fn split_traceback(text: &str) -> (String, Vec<String>) {
    match text.split_once("stack traceback:") {
        Some((message, trace)) => (
            message.trim_end().to_string(),
            trace
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from)
                .collect(),
        ),
        None => (text.trim_end().to_string(), Vec::new()),
    }
}

/// Keep frames up to and including the last one inside the test file.
///
/// Anything past it belongs to the loader itself. When no frame mentions the file the trace is
/// returned untouched.
fn filter_frames(frames: Vec<String>, file_name: &str) -> Vec<String> {
    match frames.iter().rposition(|frame| frame.contains(file_name)) {
        Some(last) => frames.into_iter().take(last + 1).collect(),
        None => frames,
    }
}
