//! Provide the naming conventions shared by every part of TestUp.
//!
//! TestUp discovers tests by convention rather than configuration: suites are directories, test
//! case sources are `TC_*.lua` files inside them, and test methods are functions whose name starts
//! with `test_`. Specification-style cases derive their method identifiers from `it` descriptions.
//!
//! ## Notes
//!
//! - This crate is pure: **no IO**, no interpreter types, no global state.
//! - Both the discovery engine and the reporting channel use these helpers so that display names,
//!   selectors and qualified names agree everywhere.

pub mod conventions;
pub mod naming;

pub use conventions::*;
pub use naming::*;
