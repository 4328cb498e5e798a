//! What the execution engine hands the reporters, and what the reporters keep.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use testup_core::qualified_test_name;

/// Why a test did not pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    /// An assertion did not hold.
    #[serde(rename = "Failure")]
    Assertion,
    /// The test raised an unexpected error.
    #[serde(rename = "Error")]
    Error,
    /// The test skipped itself.
    #[serde(rename = "Skipped")]
    Skip,
}

impl FailureKind {
    /// Label shown to users and stored in result records.
    pub fn result_label(self) -> &'static str {
        match self {
            FailureKind::Assertion => "Failure",
            FailureKind::Error => "Error",
            FailureKind::Skip => "Skipped",
        }
    }
}

/// One failure entry of a test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
    /// Source location, e.g. `TC_Edge.lua:12`.
    pub location: String,
}

impl Failure {
    pub fn new(kind: FailureKind, message: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            location: location.into(),
        }
    }

    pub fn assertion(message: impl Into<String>, location: impl Into<String>) -> Self {
        Self::new(FailureKind::Assertion, message, location)
    }

    pub fn error(message: impl Into<String>, location: impl Into<String>) -> Self {
        Self::new(FailureKind::Error, message, location)
    }

    pub fn skip(message: impl Into<String>, location: impl Into<String>) -> Self {
        Self::new(FailureKind::Skip, message, location)
    }
}

/// The result of one completed test, as reported by the execution engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestOutcome {
    /// Qualified name of the test case.
    pub case: String,
    /// Method identifier.
    pub name: String,
    pub time: Duration,
    pub assertions: usize,
    pub failures: Vec<Failure>,
}

impl TestOutcome {
    pub fn new(case: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            case: case.into(),
            name: name.into(),
            time: Duration::ZERO,
            assertions: 0,
            failures: Vec::new(),
        }
    }

    pub fn with_time(mut self, time: Duration) -> Self {
        self.time = time;
        self
    }

    pub fn with_assertions(mut self, assertions: usize) -> Self {
        self.assertions = assertions;
        self
    }

    pub fn with_failure(mut self, failure: Failure) -> Self {
        self.failures.push(failure);
        self
    }

    /// `Case#method`
    pub fn qualified_name(&self) -> String {
        qualified_test_name(&self.case, &self.name)
    }

    /// The kind that classifies this test: that of its first failure.
    pub fn result_kind(&self) -> Option<FailureKind> {
        self.failures.first().map(|failure| failure.kind)
    }

    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn skipped(&self) -> bool {
        self.result_kind() == Some(FailureKind::Skip)
    }

    pub fn error(&self) -> bool {
        self.failures.iter().any(|failure| failure.kind == FailureKind::Error)
    }
}

/// Failure detail kept in a [`ResultRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureRecord {
    #[serde(rename = "type")]
    pub kind: FailureKind,
    pub message: String,
    pub location: String,
}

/// Per-test record accumulated by the TestUp reporter and handed to the host UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRecord {
    pub testname: String,
    /// Elapsed seconds
    pub time: f64,
    pub skipped: bool,
    pub error: bool,
    pub passed: bool,
    pub assertions: usize,
    pub failures: Vec<FailureRecord>,
}

impl From<&TestOutcome> for ResultRecord {
    fn from(outcome: &TestOutcome) -> Self {
        Self {
            testname: outcome.qualified_name(),
            time: outcome.time.as_secs_f64(),
            skipped: outcome.skipped(),
            error: outcome.error(),
            passed: outcome.passed(),
            assertions: outcome.assertions,
            failures: outcome
                .failures
                .iter()
                .map(|failure| FailureRecord {
                    kind: failure.kind,
                    message: failure.message.clone(),
                    location: failure.location.clone(),
                })
                .collect(),
        }
    }
}
