//! The execution engine's reporting hooks.

use std::io;

use super::outcome::{FailureKind, TestOutcome};

/// Observes one test run at a time: `start`, one `record` per completed test, then `report`.
pub trait RunObserver {
    /// A run is about to begin.
    fn start(&mut self);

    /// A test completed.
    fn record(&mut self, outcome: &TestOutcome);

    /// The run finished; emit whatever summary this observer produces.
    fn report(&mut self) -> io::Result<()>;
}

/// Aggregate counters over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Statistics {
    pub count: usize,
    pub assertions: usize,
    pub failures: usize,
    pub errors: usize,
    pub skips: usize,
}

impl Statistics {
    /// Count a test under the kind of its first failure.
    pub fn record(&mut self, outcome: &TestOutcome) {
        self.count += 1;
        self.assertions += outcome.assertions;
        match outcome.result_kind() {
            Some(FailureKind::Assertion) => self.failures += 1,
            Some(FailureKind::Error) => self.errors += 1,
            Some(FailureKind::Skip) => self.skips += 1,
            None => {}
        }
    }

    pub fn passed(&self) -> usize {
        self.count - self.failures - self.errors - self.skips
    }

    /// Whether the run had no failures and no errors.
    pub fn is_success(&self) -> bool {
        self.failures == 0 && self.errors == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::outcome::Failure;

    #[test]
    fn test_statistics_classify_by_first_failure() {
        let mut stats = Statistics::default();
        stats.record(&TestOutcome::new("A", "test_pass").with_assertions(3));
        stats.record(
            &TestOutcome::new("A", "test_fail")
                .with_assertions(1)
                .with_failure(Failure::assertion("nope", "a.lua:1"))
                .with_failure(Failure::error("and boom", "a.lua:2")),
        );
        stats.record(&TestOutcome::new("A", "test_skip").with_failure(Failure::skip("later", "a.lua:3")));

        assert_eq!(
            stats,
            Statistics {
                count: 3,
                assertions: 4,
                failures: 1,
                errors: 0,
                skips: 1,
            }
        );
        assert_eq!(stats.passed(), 1);
        assert!(!stats.is_success());
    }
}
