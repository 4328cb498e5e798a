//! Walks suite roots and assembles their test cases.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::coverage::{CoverageProvider, NullCoverage, TestCaseMap};
use super::errors::{DiscoveryError, LoadError};
use super::loader::TestCaseLoader;
use super::suite::TestSuite;
use crate::host::TestHost;
use crate::settings::DiscoveryConfig;

/// Discovers the test suites below a list of root directories.
///
/// Per-file problems never abort a pass: load failures are collected in [`errors`](Self::errors)
/// and the rest of the suite is still discovered. Only a configuration error, such as two roots
/// sharing a suite name, fails the call.
pub struct TestDiscoverer {
    roots: Vec<PathBuf>,
    config: DiscoveryConfig,
    coverage: Box<dyn CoverageProvider>,
    errors: Vec<LoadError>,
}

impl TestDiscoverer {
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
            config: DiscoveryConfig::default(),
            coverage: Box::new(NullCoverage),
            errors: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: DiscoveryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_coverage(mut self, provider: impl CoverageProvider + 'static) -> Self {
        self.coverage = Box::new(provider);
        self
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Load errors from the most recent [`discover`](Self::discover) call.
    pub fn errors(&self) -> &[LoadError] {
        &self.errors
    }

    /// Discover every suite, keyed by suite name.
    ///
    /// ## Errors
    ///
    /// Returns [`DiscoveryError::DuplicateSuite`] before loading anything when two roots share a
    /// directory name.
    #[tracing::instrument(skip_all, fields(roots = self.roots.len()))]
    pub fn discover(&mut self, host: &TestHost) -> Result<BTreeMap<String, TestSuite>, DiscoveryError> {
        self.errors.clear();
        let suite_roots = self.suite_roots()?;
        let loader = TestCaseLoader::new(host);

        let mut suites = BTreeMap::new();
        for (name, root) in suite_roots {
            let test_cases = self.discover_test_cases(&loader, &root);
            let coverage = self.coverage.coverage_for(&root);
            let missing_coverage = coverage.missing_tests(&test_cases);
            let percent = coverage.percent(&missing_coverage);
            tracing::debug!(suite = %name, cases = test_cases.len(), coverage = percent, "discovered suite");

            suites.insert(
                name.clone(),
                TestSuite {
                    name,
                    path: root,
                    test_cases,
                    coverage: percent,
                    missing_coverage,
                },
            );
        }
        Ok(suites)
    }

    /// Valid roots with their suite names, rejecting duplicate names up front.
    fn suite_roots(&self) -> Result<Vec<(String, PathBuf)>, DiscoveryError> {
        let mut seen: BTreeMap<String, &PathBuf> = BTreeMap::new();
        let mut suite_roots = Vec::new();

        for root in &self.roots {
            if !root.is_dir() {
                tracing::warn!("Not a valid directory: {}", root.display());
                continue;
            }
            let name = suite_name(root);
            if let Some(first) = seen.get(&name) {
                return Err(DiscoveryError::DuplicateSuite {
                    name,
                    first: (*first).clone(),
                    duplicate: root.clone(),
                });
            }
            seen.insert(name.clone(), root);
            suite_roots.push((name, root.clone()));
        }
        Ok(suite_roots)
    }

    fn discover_test_cases(&mut self, loader: &TestCaseLoader<'_>, root: &Path) -> TestCaseMap {
        let mut test_cases = TestCaseMap::new();

        for file in discover_test_source_files(root, &self.config) {
            let case = match loader.load(&file) {
                Ok(Some(case)) => case,
                Ok(None) => continue,
                Err(error) => {
                    tracing::warn!("{}", error.report());
                    self.errors.push(error);
                    continue;
                }
            };

            let methods = case.test_methods();
            if methods.is_empty() {
                // Base classes and helpers legitimately define no tests.
                tracing::debug!(case = case.name(), "skipping test case without test methods");
                continue;
            }
            test_cases.insert(case.name().to_string(), methods);
        }
        test_cases
    }
}

impl std::fmt::Debug for TestDiscoverer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestDiscoverer")
            .field("roots", &self.roots)
            .field("config", &self.config)
            .field("errors", &self.errors.len())
            .finish()
    }
}

/// Test sources directly inside `root` (non-recursive), sorted by path.
pub fn discover_test_source_files(root: &Path, config: &DiscoveryConfig) -> Vec<PathBuf> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Cannot list test suite {}: {}", root.display(), e);
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| config.matches(name))
        })
        .collect();
    files.sort();
    files
}

/// Suite name of a root directory: its base name.
fn suite_name(root: &Path) -> String {
    let base_name = |path: &Path| path.file_name().map(|name| name.to_string_lossy().into_owned());
    base_name(root)
        // `.` and `..` have no file name of their own.
        .or_else(|| fs::canonicalize(root).ok().and_then(|path| base_name(&path)))
        .unwrap_or_else(|| root.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_files_filtered_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["TC_b.lua", "TC_a.lua", "helper.lua", "TC_c.txt", "tc_d.lua"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        fs::create_dir(dir.path().join("TC_nested.lua")).unwrap();

        let files = discover_test_source_files(dir.path(), &DiscoveryConfig::default());
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();

        assert_eq!(names, vec!["TC_a.lua", "TC_b.lua"]);
    }

    #[test]
    fn test_source_files_of_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_test_source_files(&dir.path().join("nope"), &DiscoveryConfig::default()).is_empty());
    }

    #[test]
    fn test_suite_name_is_base_name() {
        assert_eq!(suite_name(Path::new("tests/unit")), "unit");
        assert_eq!(suite_name(Path::new("tests/unit/")), "unit");
        assert!(!suite_name(Path::new(".")).is_empty());
    }

    #[test]
    fn test_invalid_root_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let host = TestHost::new().unwrap();
        let mut discoverer = TestDiscoverer::new([dir.path().join("missing")]);

        let suites = discoverer.discover(&host).unwrap();

        assert!(suites.is_empty());
        assert!(discoverer.errors().is_empty());
    }
}
