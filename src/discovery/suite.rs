//! Discovered test suites.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::Serialize;

use super::coverage::TestCaseMap;

/// One suite root's discovery result. Rebuilt from scratch on every discovery pass.
#[derive(Debug, Clone, Serialize)]
pub struct TestSuite {
    pub name: String,
    pub path: PathBuf,
    pub test_cases: TestCaseMap,
    pub coverage: f64,
    pub missing_coverage: BTreeSet<String>,
}

impl TestSuite {
    /// Number of test methods across all cases.
    pub fn test_count(&self) -> usize {
        self.test_cases.values().map(Vec::len).sum()
    }
}
