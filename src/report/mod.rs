//! Result reporting: the channel from the execution engine back to the host UI.

mod console;
mod observer;
mod outcome;
mod progress;
mod reporter;
mod set;

pub use console::ConsoleReporter;
pub use observer::{RunObserver, Statistics};
pub use outcome::{Failure, FailureKind, FailureRecord, ResultRecord, TestOutcome};
pub use progress::{NoProgress, ProgressSink};
pub use reporter::{ResultReporter, render_summary};
pub use set::{Reporter, ReporterSet};
