//! Reporter behavior as seen by an execution engine driving a run.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use std::time::Duration;

use testup::report::{Failure, Reporter, ReporterSet, ResultReporter, RunObserver, TestOutcome};
use testup::settings::Settings;

#[derive(Clone, Default)]
struct Captured(Rc<RefCell<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn gui_reporters(output: Captured, progress: Rc<RefCell<Vec<usize>>>) -> ReporterSet {
    let settings = Settings::new().with_run_in_gui(true);
    ReporterSet::for_settings(&settings, move || {
        ResultReporter::new(output, move |completed: usize| progress.borrow_mut().push(completed))
    })
}

#[test]
fn gui_run_reports_progress_records_and_summary() {
    let output = Captured::default();
    let progress = Rc::new(RefCell::new(Vec::new()));
    let mut reporters = gui_reporters(output.clone(), Rc::clone(&progress));

    reporters.start();
    reporters.record(&TestOutcome::new("TC_Edge", "test_length").with_assertions(1));
    reporters.record(
        &TestOutcome::new("TC_Edge", "test_reversed")
            .with_assertions(1)
            .with_time(Duration::from_millis(12))
            .with_failure(Failure::assertion("Expected [2, 1]", "TC_Edge.lua:21")),
    );
    reporters.record(&TestOutcome::new("TC_Edge", "test_start").with_assertions(1));
    reporters.report().unwrap();

    assert_eq!(*progress.borrow(), vec![1, 2, 3]);

    let summary = output.text();
    assert!(summary.contains("\n     Tests: 3\n"));
    assert!(summary.contains("\nAssertions: 3\n"));
    assert!(summary.contains("\n  Failures: 1\n"));
    assert!(summary.contains("\n    Errors: 0\n"));
    assert!(summary.contains("\n     Skips: 0\n"));

    let results = reporters.results();
    assert_eq!(results.len(), 3);
    assert!(results[0].passed);
    assert_eq!(results[1].failures[0].message, "Expected [2, 1]");
    assert_eq!(results[1].time, 0.012);
}

#[test]
fn results_survive_until_next_start() {
    let output = Captured::default();
    let mut reporters = gui_reporters(output, Rc::new(RefCell::new(Vec::new())));

    reporters.start();
    reporters.record(&TestOutcome::new("TC_A", "test_a"));
    reporters.report().unwrap();
    assert_eq!(reporters.results().len(), 1);

    reporters.start();
    assert!(reporters.results().is_empty());
}

#[test]
fn console_mode_keeps_console_reporter_only() {
    let reporters = ReporterSet::for_settings(&Settings::new(), || {
        panic!("the TestUp reporter must not be built outside the GUI")
    });
    assert_eq!(reporters.len(), 1);
    assert!(matches!(reporters.reporters()[0], Reporter::Console(_)));
}

#[test]
fn result_records_serialize_for_the_ui() {
    let mut reporters = gui_reporters(Captured::default(), Rc::new(RefCell::new(Vec::new())));
    reporters.start();
    reporters.record(&TestOutcome::new("TC_A", "test_skip").with_failure(Failure::skip("not yet", "TC_A.lua:4")));
    reporters.report().unwrap();

    let json = serde_json::to_value(reporters.results()).unwrap();
    assert_eq!(json[0]["testname"], "TC_A#test_skip");
    assert_eq!(json[0]["skipped"], true);
    assert_eq!(json[0]["passed"], false);
    assert_eq!(json[0]["failures"][0]["type"], "Skipped");
}
