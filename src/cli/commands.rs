//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::discovery::{TestDiscoverer, TestSuite};
use crate::host::TestHost;
use crate::report::{
    Failure, FailureKind, ReporterSet, ResultReporter, RunObserver, Statistics, TestOutcome,
};
use crate::settings::Settings;

use super::{CliError, CliResult, ExitCode};

// ============================================================================
// discover
// ============================================================================

/// How `discover` prints its results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFormat {
    /// Display names, grouped by suite and case
    Names,
    /// Run selectors, grouped by suite and case
    Selectors,
    /// The full suite map as JSON
    Json,
}

/// Load every test source under `roots` and print the suites found.
///
/// Load errors do not stop discovery; they are printed to stderr afterwards and
/// turn the exit code into [`ExitCode::LOAD_ERRORS`].
pub fn discover(roots: &[PathBuf], settings: &Settings, format: ListFormat) -> CliResult<ExitCode> {
    let host = TestHost::new().map_err(|e| CliError::failure(format!("Error: {e}")))?;
    let mut discoverer = TestDiscoverer::new(roots.iter().cloned()).with_config(settings.discovery.clone());

    let suites = discoverer
        .discover(&host)
        .map_err(|e| CliError::failure(format!("Error: {e}")))?;

    print!("{}", render_listing(&suites, format)?);

    for error in discoverer.errors() {
        eprintln!("{}", error.report());
    }
    if discoverer.errors().is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::LOAD_ERRORS)
    }
}

/// Render discovered suites in the requested format.
pub fn render_listing(suites: &BTreeMap<String, TestSuite>, format: ListFormat) -> CliResult<String> {
    if format == ListFormat::Json {
        let mut json = serde_json::to_string_pretty(suites)
            .map_err(|e| CliError::failure(format!("Error serializing suites: {e}")))?;
        json.push('\n');
        return Ok(json);
    }

    let mut out = String::new();
    for suite in suites.values() {
        let _ = writeln!(
            out,
            "{} ({}) - {} tests, {:.1}% coverage",
            suite.name,
            suite.path.display(),
            suite.test_count(),
            suite.coverage
        );
        for (case, methods) in &suite.test_cases {
            let _ = writeln!(out, "  {case}");
            for method in methods {
                let label = match format {
                    ListFormat::Selectors => method.selector(),
                    _ => method.display_name(),
                };
                let _ = writeln!(out, "    {label}");
            }
        }
        for missing in &suite.missing_coverage {
            let _ = writeln!(out, "  missing: {missing}");
        }
    }
    Ok(out)
}

// ============================================================================
// report
// ============================================================================

/// One completed test as recorded by an execution engine.
#[derive(Debug, Deserialize)]
struct RecordedOutcome {
    case: String,
    name: String,
    /// Elapsed seconds
    #[serde(default)]
    time: f64,
    #[serde(default)]
    assertions: usize,
    #[serde(default)]
    failures: Vec<RecordedFailure>,
}

#[derive(Debug, Deserialize)]
struct RecordedFailure {
    #[serde(rename = "type")]
    kind: FailureKind,
    #[serde(default)]
    message: String,
    #[serde(default)]
    location: String,
}

impl From<RecordedOutcome> for TestOutcome {
    fn from(recorded: RecordedOutcome) -> Self {
        let mut outcome = TestOutcome::new(recorded.case, recorded.name)
            .with_time(Duration::try_from_secs_f64(recorded.time).unwrap_or_default())
            .with_assertions(recorded.assertions);
        for failure in recorded.failures {
            outcome = outcome.with_failure(Failure::new(failure.kind, failure.message, failure.location));
        }
        outcome
    }
}

/// Parse a JSON array of recorded outcomes.
pub fn parse_outcomes(json: &str) -> CliResult<Vec<TestOutcome>> {
    let recorded: Vec<RecordedOutcome> =
        serde_json::from_str(json).map_err(|e| CliError::failure(format!("Error reading results: {e}")))?;
    Ok(recorded.into_iter().map(TestOutcome::from).collect())
}

/// Replay recorded results through the reporters selected by `settings`.
pub fn report(results: &Path, settings: &Settings) -> CliResult<ExitCode> {
    let json = fs::read_to_string(results)
        .map_err(|e| CliError::failure(format!("Error reading {}: {e}", results.display())))?;
    let outcomes = parse_outcomes(&json)?;

    let mut reporters = ReporterSet::for_settings(settings, || {
        ResultReporter::new(io::stdout(), |completed: usize| {
            tracing::debug!(completed, "testing progress");
        })
    });
    let stats = replay(&mut reporters, &outcomes).map_err(|e| CliError::failure(format!("Error: {e}")))?;

    if stats.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Drive one run over `observer`.
pub fn replay(observer: &mut dyn RunObserver, outcomes: &[TestOutcome]) -> io::Result<Statistics> {
    let mut stats = Statistics::default();
    observer.start();
    for outcome in outcomes {
        stats.record(outcome);
        observer.record(outcome);
    }
    observer.report()?;
    Ok(stats)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::discovery::{CaseStyle, TestMethod};

    fn sample_suites() -> BTreeMap<String, TestSuite> {
        let mut test_cases = BTreeMap::new();
        test_cases.insert(
            "TC_Edge".to_string(),
            vec![TestMethod::new("TC_Edge", CaseStyle::Plain, "test_length")],
        );
        test_cases.insert(
            "TC_Spec".to_string(),
            vec![TestMethod::new("TC_Spec::empty", CaseStyle::Spec, "test_0001_is empty")],
        );
        let suite = TestSuite {
            name: "TestUp".to_string(),
            path: PathBuf::from("tests/TestUp"),
            test_cases,
            coverage: 100.0,
            missing_coverage: Default::default(),
        };
        BTreeMap::from([("TestUp".to_string(), suite)])
    }

    #[test]
    fn test_render_names() {
        let out = render_listing(&sample_suites(), ListFormat::Names).unwrap();
        assert!(out.starts_with("TestUp (tests/TestUp) - 2 tests, 100.0% coverage\n"));
        assert!(out.contains("    test_length\n"));
        assert!(out.contains("    empty is empty\n"));
    }

    #[test]
    fn test_render_selectors() {
        let out = render_listing(&sample_suites(), ListFormat::Selectors).unwrap();
        assert!(out.contains("    test_length\n"));
        assert!(out.contains("    TC_Spec::empty#test_0001_is empty\n"));
    }

    #[test]
    fn test_render_json() {
        let out = render_listing(&sample_suites(), ListFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["TestUp"]["test_cases"]["TC_Edge"][0]["method"], "test_length");
    }

    #[test]
    fn test_parse_outcomes() {
        let outcomes = parse_outcomes(
            r#"[
                {"case": "TC_Edge", "name": "test_length", "time": 0.01, "assertions": 2},
                {"case": "TC_Edge", "name": "test_skip", "failures": [{"type": "Skipped", "message": "later"}]}
            ]"#,
        )
        .unwrap();
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].passed());
        assert!(outcomes[1].skipped());
    }

    #[test]
    fn test_parse_outcomes_rejects_unknown_kind() {
        let err = parse_outcomes(r#"[{"case": "A", "name": "test_a", "failures": [{"type": "Oops"}]}]"#).unwrap_err();
        assert_eq!(err.exit_code, ExitCode::FAILURE);
    }

    #[test]
    fn test_replay_counts() {
        let outcomes = vec![
            TestOutcome::new("A", "test_a"),
            TestOutcome::new("A", "test_b").with_failure(Failure::error("boom", "A.lua:1")),
        ];
        let mut reporter = ResultReporter::new(io::sink(), crate::report::NoProgress);
        let stats = replay(&mut reporter, &outcomes).unwrap();
        assert_eq!(stats.errors, 1);
        assert_eq!(reporter.results().len(), 2);
    }
}
