#![forbid(unsafe_code)]
//! TestUp test discovery and reporting
//!
//! TestUp keeps a long-lived Lua interpreter around and repeatedly (re)loads `TC_*.lua` test
//! sources into it, so a host UI can list suites, cases and methods that always reflect the files on
//! disk. Results of a run flow back through the reporters in [`report`].
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module
//!   enforces `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: If a panic represents a caller bug (protocol misuse), panic with an
//!   `INVARIANT: reason` message.

pub mod cli;
pub mod discovery;
pub mod host;
pub mod report;
pub mod settings;
pub mod version;

pub use discovery::{DiscoveryError, LoadError, TestCase, TestDiscoverer, TestMethod, TestSuite};
pub use host::{HostError, TestHost};
pub use report::{ReporterSet, ResultRecord, ResultReporter, RunObserver, TestOutcome};
pub use settings::{DiscoveryConfig, Settings};
