//! Engine-owned registry of runnable test cases.
//!
//! Every `TestUp.TestCase(...)` or `describe(...)` evaluated by a test source registers one
//! [`Runnable`] here, keyed by its qualified name. The loader diffs snapshots of this registry to
//! find what a file introduced, and the reconciler drops entries before a file is loaded again.
//!
//! A runnable owns its Lua class table and, through it, the `setup`/`teardown` functions a spec
//! installed with `before`/`after`. Removing the entry is all it takes to release them.

use std::collections::{BTreeMap, BTreeSet};

use mlua::Table;
use testup_core::is_within;

use super::case::CaseStyle;

/// A registered runnable: one class table declared by a test source.
#[derive(Debug, Clone)]
pub struct Runnable {
    name: String,
    style: CaseStyle,
    class: Table,
    /// Qualified names of nested spec children, in declaration order.
    children: Vec<String>,
    /// Number of `it` blocks declared so far.
    spec_count: usize,
}

impl Runnable {
    pub fn new(name: impl Into<String>, style: CaseStyle, class: Table) -> Self {
        Self {
            name: name.into(),
            style,
            class,
            children: Vec::new(),
            spec_count: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn style(&self) -> CaseStyle {
        self.style
    }

    /// The Lua table backing this runnable.
    pub fn class(&self) -> &Table {
        &self.class
    }

    pub fn children(&self) -> &[String] {
        &self.children
    }

    pub(crate) fn add_child(&mut self, child: &str) {
        if !self.children.iter().any(|c| c == child) {
            self.children.push(child.to_string());
        }
    }

    /// Reserve the ordinal for the next `it` block (1-based).
    pub(crate) fn next_spec_ordinal(&mut self) -> usize {
        self.spec_count += 1;
        self.spec_count
    }
}

/// Runnables currently alive in the interpreter, keyed by qualified name.
#[derive(Debug, Default)]
pub struct RunnableRegistry {
    entries: BTreeMap<String, Runnable>,
}

impl RunnableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Runnable> {
        self.entries.get(name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Runnable> {
        self.entries.get_mut(name)
    }

    /// Snapshot of every registered qualified name.
    pub fn names(&self) -> BTreeSet<String> {
        self.entries.keys().cloned().collect()
    }

    /// Register a runnable, replacing any entry with the same name.
    pub(crate) fn insert(&mut self, runnable: Runnable) -> Option<Runnable> {
        self.entries.insert(runnable.name.clone(), runnable)
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<Runnable> {
        let removed = self.entries.remove(name)?;
        // Detach from a surviving parent so enumeration never follows a dangling child.
        for entry in self.entries.values_mut() {
            entry.children.retain(|child| child != name);
        }
        Some(removed)
    }

    /// Remove `logical_name` and every nested child qualified as `logical_name::...`.
    ///
    /// Returns the removed runnables; empty when nothing matched.
    pub fn remove_within(&mut self, logical_name: &str) -> Vec<Runnable> {
        let doomed: Vec<String> = self
            .entries
            .keys()
            .filter(|name| is_within(name, logical_name))
            .cloned()
            .collect();
        doomed.iter().filter_map(|name| self.remove(name)).collect()
    }
}
