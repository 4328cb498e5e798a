//! Seam for the external coverage collaborator.
//!
//! TestUp does not keep coverage bookkeeping itself. A host plugs in a [`CoverageProvider`] that is
//! asked, once per suite root, for a [`Coverage`] able to tell which expected tests were not found.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use testup_core::qualified_test_name;

use super::descriptor::TestMethod;

/// Discovered test methods keyed by test case name.
pub type TestCaseMap = BTreeMap<String, Vec<TestMethod>>;

/// Coverage of one suite.
pub trait Coverage {
    /// Expected tests that discovery did not find.
    fn missing_tests(&self, discovered: &TestCaseMap) -> BTreeSet<String>;

    /// Coverage percentage in `[0, 100]` given the missing tests.
    fn percent(&self, missing: &BTreeSet<String>) -> f64;
}

/// Builds a [`Coverage`] for a suite root.
pub trait CoverageProvider {
    fn coverage_for(&self, suite_root: &Path) -> Box<dyn Coverage>;
}

impl<F> CoverageProvider for F
where
    F: Fn(&Path) -> Box<dyn Coverage>,
{
    fn coverage_for(&self, suite_root: &Path) -> Box<dyn Coverage> {
        self(suite_root)
    }
}

/// Expects nothing, so nothing is ever missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCoverage;

impl Coverage for NullCoverage {
    fn missing_tests(&self, _discovered: &TestCaseMap) -> BTreeSet<String> {
        BTreeSet::new()
    }

    fn percent(&self, _missing: &BTreeSet<String>) -> f64 {
        100.0
    }
}

impl CoverageProvider for NullCoverage {
    fn coverage_for(&self, _suite_root: &Path) -> Box<dyn Coverage> {
        Box::new(NullCoverage)
    }
}

/// Coverage against an explicit list of expected tests, named `Case#method`.
#[derive(Debug, Clone, Default)]
pub struct ExpectedTests {
    expected: BTreeSet<String>,
}

impl ExpectedTests {
    pub fn new(expected: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            expected: expected.into_iter().map(Into::into).collect(),
        }
    }

    pub fn expected(&self) -> &BTreeSet<String> {
        &self.expected
    }
}

impl Coverage for ExpectedTests {
    fn missing_tests(&self, discovered: &TestCaseMap) -> BTreeSet<String> {
        let found: BTreeSet<String> = discovered
            .values()
            .flatten()
            .map(|method| qualified_test_name(method.case_name(), method.method()))
            .collect();
        self.expected.difference(&found).cloned().collect()
    }

    fn percent(&self, missing: &BTreeSet<String>) -> f64 {
        if self.expected.is_empty() {
            return 100.0;
        }
        let missing = missing.intersection(&self.expected).count() as f64;
        let total = self.expected.len() as f64;
        ((total - missing) / total * 100.0).clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::case::CaseStyle;

    fn discovered() -> TestCaseMap {
        let mut map = TestCaseMap::new();
        map.insert(
            "TC_Edge".to_string(),
            vec![
                TestMethod::new("TC_Edge", CaseStyle::Plain, "test_length"),
                TestMethod::new("TC_Edge", CaseStyle::Plain, "test_start"),
            ],
        );
        map
    }

    #[test]
    fn test_null_coverage_is_complete() {
        let coverage = NullCoverage.coverage_for(Path::new("suite"));
        let missing = coverage.missing_tests(&discovered());
        assert!(missing.is_empty());
        assert_eq!(coverage.percent(&missing), 100.0);
    }

    #[test]
    fn test_expected_tests_reports_missing() {
        let coverage = ExpectedTests::new([
            "TC_Edge#test_length",
            "TC_Edge#test_start",
            "TC_Edge#test_end",
            "TC_Face#test_area",
        ]);

        let missing = coverage.missing_tests(&discovered());

        assert_eq!(
            missing.into_iter().collect::<Vec<_>>(),
            vec!["TC_Edge#test_end".to_string(), "TC_Face#test_area".to_string()]
        );
    }

    #[test]
    fn test_expected_tests_percent() {
        let coverage = ExpectedTests::new(["A#test_a", "A#test_b", "A#test_c", "A#test_d"]);
        let missing = BTreeSet::from(["A#test_a".to_string()]);
        assert_eq!(coverage.percent(&missing), 75.0);
        assert_eq!(ExpectedTests::default().percent(&BTreeSet::new()), 100.0);
    }

    #[test]
    fn test_closure_provider() {
        let provider = |_: &Path| -> Box<dyn Coverage> { Box::new(ExpectedTests::new(["A#test_a"])) };
        let coverage = provider.coverage_for(Path::new("suite"));
        assert_eq!(coverage.missing_tests(&TestCaseMap::new()).len(), 1);
    }
}
