//! Active reporter selection.

use std::io;

use super::console::ConsoleReporter;
use super::observer::RunObserver;
use super::outcome::{ResultRecord, TestOutcome};
use super::reporter::ResultReporter;
use crate::settings::Settings;

/// A reporter the execution engine can be wired to.
pub enum Reporter {
    Console(ConsoleReporter),
    TestUp(ResultReporter),
}

impl Reporter {
    fn observer(&mut self) -> &mut dyn RunObserver {
        match self {
            Reporter::Console(r) => r,
            Reporter::TestUp(r) => r,
        }
    }
}

/// Fans run events out to every active reporter, in insertion order.
#[derive(Default)]
pub struct ReporterSet {
    reporters: Vec<Reporter>,
}

impl ReporterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Console reporting by default. When running inside the host UI, the
    /// default reporters are replaced by a single TestUp reporter built by `gui`.
    pub fn for_settings(settings: &Settings, gui: impl FnOnce() -> ResultReporter) -> Self {
        let mut set = Self::new();
        set.push(Reporter::Console(ConsoleReporter::new(settings.verbose)));
        if settings.run_in_gui {
            set.clear();
            set.push(Reporter::TestUp(gui()));
        }
        set
    }

    pub fn push(&mut self, reporter: Reporter) {
        self.reporters.push(reporter);
    }

    pub fn clear(&mut self) {
        self.reporters.clear();
    }

    pub fn len(&self) -> usize {
        self.reporters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reporters.is_empty()
    }

    pub fn reporters(&self) -> &[Reporter] {
        &self.reporters
    }

    /// The TestUp reporter, if one is active.
    pub fn result_reporter(&self) -> Option<&ResultReporter> {
        self.reporters.iter().find_map(|r| match r {
            Reporter::TestUp(reporter) => Some(reporter),
            Reporter::Console(_) => None,
        })
    }

    /// Records kept by the active TestUp reporter; empty when none is active.
    pub fn results(&self) -> &[ResultRecord] {
        self.result_reporter().map(ResultReporter::results).unwrap_or_default()
    }
}

impl RunObserver for ReporterSet {
    fn start(&mut self) {
        for reporter in &mut self.reporters {
            reporter.observer().start();
        }
    }

    fn record(&mut self, outcome: &TestOutcome) {
        for reporter in &mut self.reporters {
            reporter.observer().record(outcome);
        }
    }

    fn report(&mut self) -> io::Result<()> {
        for reporter in &mut self.reporters {
            reporter.observer().report()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::progress::NoProgress;

    #[test]
    fn test_console_by_default() {
        let set = ReporterSet::for_settings(&Settings::default(), ResultReporter::default);
        assert_eq!(set.len(), 1);
        assert!(matches!(set.reporters()[0], Reporter::Console(_)));
        assert!(set.result_reporter().is_none());
        assert!(set.results().is_empty());
    }

    #[test]
    fn test_gui_replaces_default_reporters() {
        let settings = Settings::default().with_run_in_gui(true);
        let mut set = ReporterSet::for_settings(&settings, || ResultReporter::new(io::sink(), NoProgress));
        assert_eq!(set.len(), 1);

        set.start();
        set.record(&TestOutcome::new("TC_A", "test_a"));
        set.report().unwrap();

        assert_eq!(set.results().len(), 1);
        assert_eq!(set.results()[0].testname, "TC_A#test_a");
    }
}
