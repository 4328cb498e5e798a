//! Test discovery and reload engine.
//!
//! ## Modules
//!
//! - `registry` - engine-owned registry of runnables and the reconcile step
//! - `case` / `descriptor` - tagged test cases and their method descriptors
//! - `loader` - loads one `TC_*.lua` file and resolves the case it introduced
//! - `discoverer` - walks suite roots, aggregates cases, asks the coverage collaborator
//! - `coverage` - the coverage collaborator seam
//! - `errors` - configuration and load errors

pub mod case;
pub mod coverage;
pub mod descriptor;
pub mod discoverer;
pub mod errors;
pub mod loader;
pub mod registry;
pub mod suite;

pub use case::{CaseStyle, PlainCase, SpecCase, TestCase};
pub use coverage::{Coverage, CoverageProvider, ExpectedTests, NullCoverage, TestCaseMap};
pub use descriptor::TestMethod;
pub use discoverer::{TestDiscoverer, discover_test_source_files};
pub use errors::{DiscoveryError, LoadError, LoadFailure};
pub use loader::TestCaseLoader;
pub use registry::{Runnable, RunnableRegistry};
pub use suite::TestSuite;
