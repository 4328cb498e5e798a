//! Plain console reporter used outside the host UI.

use std::io::{self, Write};
use std::time::Instant;

use super::observer::{RunObserver, Statistics};
use super::outcome::{FailureKind, TestOutcome};

/// Progress dots (or one line per test when verbose) plus a one-line tally.
pub struct ConsoleReporter {
    pub verbose: bool,
    io: Box<dyn Write>,
    statistics: Statistics,
    started: Option<Instant>,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        Self::with_output(verbose, io::stderr())
    }

    pub fn with_output(verbose: bool, io: impl Write + 'static) -> Self {
        Self {
            verbose,
            io: Box::new(io),
            statistics: Statistics::default(),
            started: None,
        }
    }

    pub fn statistics(&self) -> Statistics {
        self.statistics
    }

    fn status(&self, outcome: &TestOutcome) -> String {
        let ms = outcome.time.as_millis();
        match (outcome.result_kind(), self.verbose) {
            (None, true) => format!("\x1b[32mPASSED\x1b[0m ({ms}ms)"),
            (None, false) => "\x1b[32m.\x1b[0m".to_string(),
            (Some(FailureKind::Assertion), true) => format!("\x1b[31mFAILED\x1b[0m ({ms}ms)"),
            (Some(FailureKind::Assertion), false) => "\x1b[31mF\x1b[0m".to_string(),
            (Some(FailureKind::Error), true) => format!("\x1b[31mERROR\x1b[0m ({ms}ms)"),
            (Some(FailureKind::Error), false) => "\x1b[31mE\x1b[0m".to_string(),
            (Some(FailureKind::Skip), true) => "\x1b[33mSKIPPED\x1b[0m".to_string(),
            (Some(FailureKind::Skip), false) => "\x1b[33mS\x1b[0m".to_string(),
        }
    }

    fn write_outcome(&mut self, outcome: &TestOutcome) -> io::Result<()> {
        let status = self.status(outcome);
        if self.verbose {
            writeln!(self.io, "{} ... {}", outcome.qualified_name(), status)?;
        } else {
            write!(self.io, "{status}")?;
        }

        for failure in outcome.failures.iter().filter(|f| f.kind != FailureKind::Skip) {
            writeln!(self.io, "\n\x1b[31m{}\x1b[0m [{}]", outcome.qualified_name(), failure.location)?;
            writeln!(self.io, "{}: {}", failure.kind.result_label(), failure.message)?;
        }
        Ok(())
    }
}

impl RunObserver for ConsoleReporter {
    fn start(&mut self) {
        self.statistics = Statistics::default();
        self.started = Some(Instant::now());
    }

    fn record(&mut self, outcome: &TestOutcome) {
        self.statistics.record(outcome);
        if let Err(err) = self.write_outcome(outcome) {
            tracing::warn!("console reporter could not write result: {err}");
        }
    }

    fn report(&mut self) -> io::Result<()> {
        if !self.verbose {
            writeln!(self.io)?;
        }
        writeln!(self.io)?;

        let stats = self.statistics;
        if stats.count == 0 {
            writeln!(self.io, "No tests run")?;
        }

        let mut parts = Vec::new();
        if stats.passed() > 0 {
            parts.push(format!("\x1b[32m{} passed\x1b[0m", stats.passed()));
        }
        if stats.failures > 0 {
            parts.push(format!("\x1b[31m{} failed\x1b[0m", stats.failures));
        }
        if stats.errors > 0 {
            parts.push(format!("\x1b[31m{} errors\x1b[0m", stats.errors));
        }
        if stats.skips > 0 {
            parts.push(format!("\x1b[33m{} skipped\x1b[0m", stats.skips));
        }

        let elapsed = self.started.take().map(|t| t.elapsed().as_secs_f64()).unwrap_or_default();
        writeln!(self.io, "====== {} in {:.2}s ======", parts.join(", "), elapsed)?;
        self.io.flush()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::report::outcome::Failure;

    #[derive(Clone, Default)]
    struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_console_tally() {
        let buffer = SharedBuffer::default();
        let mut reporter = ConsoleReporter::with_output(false, buffer.clone());

        reporter.start();
        reporter.record(&TestOutcome::new("TC_A", "test_ok"));
        reporter.record(&TestOutcome::new("TC_A", "test_bad").with_failure(Failure::assertion("nope", "TC_A.lua:2")));
        reporter.report().unwrap();

        let out = String::from_utf8_lossy(&buffer.0.borrow()).into_owned();
        assert!(out.contains("TC_A#test_bad"));
        assert!(out.contains("Failure: nope"));
        assert!(out.contains("1 passed"));
        assert!(out.contains("1 failed"));
        assert_eq!(reporter.statistics().count, 2);
    }

    #[test]
    fn test_console_verbose_lines() {
        let buffer = SharedBuffer::default();
        let mut reporter = ConsoleReporter::with_output(true, buffer.clone());

        reporter.start();
        reporter.record(&TestOutcome::new("TC_A", "test_skip").with_failure(Failure::skip("later", "TC_A.lua:9")));
        reporter.report().unwrap();

        let out = String::from_utf8_lossy(&buffer.0.borrow()).into_owned();
        assert!(out.contains("TC_A#test_skip ... "));
        assert!(out.contains("SKIPPED"));
        assert!(!out.contains("later"));
    }
}
