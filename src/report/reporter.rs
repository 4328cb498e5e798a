//! The TestUp reporter: accumulates result records, drives UI progress, prints the summary.

use std::fmt;
use std::io::{self, Write};

use super::observer::{RunObserver, Statistics};
use super::outcome::{ResultRecord, TestOutcome};
use super::progress::{NoProgress, ProgressSink};

const SUMMARY_WIDTH: usize = 40;
const SUMMARY_TITLE: &str = "TestUp Results";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Idle,
    Running,
}

/// Reporter used when tests run inside the host UI.
///
/// Records survive `report` so the UI can read them after the run; they are
/// only cleared by the next `start`.
pub struct ResultReporter {
    io: Box<dyn Write>,
    progress: Box<dyn ProgressSink>,
    results: Vec<ResultRecord>,
    statistics: Statistics,
    state: RunState,
}

impl ResultReporter {
    /// Reporter writing its summary to `io` and notifying `progress` after every test.
    pub fn new(io: impl Write + 'static, progress: impl ProgressSink + 'static) -> Self {
        Self {
            io: Box::new(io),
            progress: Box::new(progress),
            results: Vec::new(),
            statistics: Statistics::default(),
            state: RunState::Idle,
        }
    }

    /// Records of the current (or last) run, in completion order.
    pub fn results(&self) -> &[ResultRecord] {
        &self.results
    }

    pub fn statistics(&self) -> Statistics {
        self.statistics
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }
}

impl Default for ResultReporter {
    fn default() -> Self {
        Self::new(io::stdout(), NoProgress)
    }
}

impl fmt::Debug for ResultReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultReporter")
            .field("results", &self.results.len())
            .field("statistics", &self.statistics)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl RunObserver for ResultReporter {
    fn start(&mut self) {
        self.results.clear();
        self.statistics = Statistics::default();
        self.state = RunState::Running;
    }

    /// # Panics
    ///
    /// Panics when called outside `start`/`report`; the execution engine owns that ordering.
    fn record(&mut self, outcome: &TestOutcome) {
        assert!(
            self.state == RunState::Running,
            "INVARIANT: result recorded for '{}' outside of a test run",
            outcome.qualified_name()
        );
        self.statistics.record(outcome);
        self.results.push(ResultRecord::from(outcome));
        self.progress.update_testing_progress(self.results.len());
    }

    fn report(&mut self) -> io::Result<()> {
        self.state = RunState::Idle;
        self.io.write_all(render_summary(&self.statistics).as_bytes())?;
        self.io.flush()
    }
}

/// The fixed-width summary block printed at the end of a run.
pub fn render_summary(stats: &Statistics) -> String {
    let separator = "-".repeat(SUMMARY_WIDTH);
    let mut out = String::new();
    out.push_str(&format!("{separator}\n\n"));
    out.push_str(&format!("{:^width$}\n\n", SUMMARY_TITLE, width = SUMMARY_WIDTH));
    out.push_str(&format!("{separator}\n\n"));
    for (label, value) in [
        ("Tests", stats.count),
        ("Assertions", stats.assertions),
        ("Failures", stats.failures),
        ("Errors", stats.errors),
        ("Skips", stats.skips),
    ] {
        out.push_str(&format!("{label:>10}: {value}\n"));
    }
    out.push_str(&format!("\n{separator}\n"));
    out
}
