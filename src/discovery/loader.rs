//! Loads a single test source into the host and resolves the test case it defines.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use testup_core::{is_nested, logical_name};

use super::case::{CaseStyle, PlainCase, SpecCase, TestCase};
use super::errors::{LoadError, LoadFailure};
use super::registry::RunnableRegistry;
use crate::host::TestHost;
use crate::host::introspect::{inherited_test_methods, own_test_methods};

/// Loads test sources into a [`TestHost`].
#[derive(Debug, Clone, Copy)]
pub struct TestCaseLoader<'h> {
    host: &'h TestHost,
}

impl<'h> TestCaseLoader<'h> {
    pub fn new(host: &'h TestHost) -> Self {
        Self { host }
    }

    /// Load `path` and return the test case it introduced.
    ///
    /// Any previous definition of the file's logical name is reconciled away first, so reloading an
    /// edited file never keeps methods the edit removed. Returns `Ok(None)` when the file introduced
    /// no new top-level case, or more than one.
    ///
    /// ## Errors
    ///
    /// Returns [`LoadError`] when the file cannot be read or fails to evaluate. Runnables the file
    /// declared before failing are rolled back, and classes it reopened get their fields back.
    #[tracing::instrument(skip_all, fields(path = %path.display()))]
    pub fn load(&self, path: &Path) -> Result<Option<TestCase>, LoadError> {
        let logical = logical_name(path).ok_or_else(|| LoadError::new(path, LoadFailure::InvalidName))?;

        self.host
            .reconcile(logical)
            .map_err(|e| LoadError::new(path, e))?;

        let existing = self.host.registry().names();
        let source = fs::read_to_string(path).map_err(|e| LoadError::new(path, e))?;
        let snapshot = self.host.snapshot_classes().map_err(|e| LoadError::new(path, e))?;

        if let Err(error) = self.host.evaluate(&source, &chunk_name(path)) {
            let introduced = self.introduced_since(&existing);
            let rollback = self
                .host
                .discard(&introduced)
                .and_then(|()| self.host.restore_classes(snapshot));
            if let Err(rollback) = rollback {
                tracing::warn!(%rollback, "failed to roll back partially loaded test case");
            }
            return Err(LoadError::new(path, error));
        }

        let introduced = self.introduced_since(&existing);
        let roots: Vec<&String> = introduced.iter().filter(|name| !is_nested(name)).collect();

        match roots.as_slice() {
            [] => {
                // Another source already declared a case with this name.
                tracing::warn!("'{logical}' - No new test cases loaded.");
                Ok(None)
            }
            [root] => self
                .resolve(root)
                .map(Some)
                .map_err(|e| LoadError::new(path, e)),
            many => {
                let names: Vec<&str> = many.iter().map(|name| name.as_str()).collect();
                tracing::warn!("'{logical}' - More than one test class loaded: {}", names.join(", "));
                Ok(None)
            }
        }
    }

    fn introduced_since(&self, existing: &BTreeSet<String>) -> BTreeSet<String> {
        self.host
            .registry()
            .names()
            .difference(existing)
            .cloned()
            .collect()
    }

    /// Build the tagged test case for a registered top-level runnable.
    fn resolve(&self, name: &str) -> mlua::Result<TestCase> {
        let registry = self.host.registry();
        let runnable = registry
            .get(name)
            .ok_or_else(|| mlua::Error::RuntimeError(format!("test case '{name}' vanished while loading")))?;

        match runnable.style() {
            CaseStyle::Plain => {
                let methods = inherited_test_methods(runnable.class())?;
                Ok(TestCase::Plain(PlainCase::new(name, methods)))
            }
            CaseStyle::Spec => Ok(TestCase::Spec(resolve_spec(&registry, name)?)),
        }
    }
}

fn resolve_spec(registry: &RunnableRegistry, name: &str) -> mlua::Result<SpecCase> {
    let runnable = registry
        .get(name)
        .ok_or_else(|| mlua::Error::RuntimeError(format!("spec '{name}' vanished while loading")))?;
    let methods = own_test_methods(runnable.class())?;
    let children = runnable
        .children()
        .iter()
        .map(|child| resolve_spec(registry, child))
        .collect::<mlua::Result<Vec<_>>>()?;
    Ok(SpecCase::new(name, methods, children))
}

/// Chunk name that makes the interpreter report the file path in errors and tracebacks.
fn chunk_name(path: &Path) -> String {
    format!("@{}", path.display())
}
