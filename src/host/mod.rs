//! The long-lived interpreter that test sources are loaded into.
//!
//! A [`TestHost`] lives as long as the host application. Discovery passes load and reload test
//! sources into the same Lua state over and over, so everything a source declares goes through the
//! `TestUp` API (see [`api`]) and lands in an engine-owned [`RunnableRegistry`] rather than being
//! recovered by scanning the interpreter afterwards.
//!
//! The host is deliberately `!Send`: discovery and reporting run on the host's UI thread only.

pub mod api;
pub mod introspect;

use std::cell::{Ref, RefCell, RefMut};
use std::collections::BTreeSet;
use std::rc::Rc;

use mlua::{Lua, Table, Value};
use thiserror::Error;

use crate::discovery::registry::RunnableRegistry;

/// Errors raised while preparing the interpreter.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("failed to install the TestUp API: {0}")]
    Api(#[source] mlua::Error),
}

/// Raw fields of every registered class table at one point in time.
pub(crate) struct ClassSnapshot(Vec<(Table, Vec<(Value, Value)>)>);

/// Owns the Lua state and the registry of runnables declared in it.
pub struct TestHost {
    lua: Lua,
    registry: Rc<RefCell<RunnableRegistry>>,
}

impl TestHost {
    /// Create a fresh interpreter with the `TestUp` API installed.
    pub fn new() -> Result<Self, HostError> {
        let lua = Lua::new();
        let registry = Rc::new(RefCell::new(RunnableRegistry::new()));
        api::install(&lua, Rc::clone(&registry)).map_err(HostError::Api)?;
        Ok(Self { lua, registry })
    }

    pub fn lua(&self) -> &Lua {
        &self.lua
    }

    pub fn registry(&self) -> Ref<'_, RunnableRegistry> {
        self.registry.borrow()
    }

    pub(crate) fn registry_mut(&self) -> RefMut<'_, RunnableRegistry> {
        self.registry.borrow_mut()
    }

    /// Evaluate `source` in the global scope under `chunk_name`.
    pub fn evaluate(&self, source: &str, chunk_name: &str) -> mlua::Result<()> {
        self.lua.load(source).set_name(chunk_name).exec()
    }

    /// Remove every trace of `logical_name` before a source defining it is loaded.
    ///
    /// Drops the registry entry named `logical_name` and all of its `logical_name::*` children, and
    /// clears the matching globals. Calling this when nothing matches is a no-op. Returns the
    /// qualified names that were removed.
    pub fn reconcile(&self, logical_name: &str) -> mlua::Result<Vec<String>> {
        let removed: Vec<String> = self
            .registry_mut()
            .remove_within(logical_name)
            .into_iter()
            .map(|runnable| runnable.name().to_string())
            .collect();

        let globals = self.lua.globals();
        let mut stale: BTreeSet<&str> = removed.iter().map(String::as_str).collect();
        stale.insert(logical_name);
        for name in stale {
            if globals.contains_key(name)? {
                globals.raw_set(name, Value::Nil)?;
            }
        }

        if !removed.is_empty() {
            tracing::debug!(logical_name, removed = ?removed, "reconciled stale test cases");
        }
        Ok(removed)
    }

    /// Capture the fields of every registered class, so a failed load that reopened a class
    /// owned by another source can be undone.
    pub(crate) fn snapshot_classes(&self) -> mlua::Result<ClassSnapshot> {
        let registry = self.registry();
        let mut classes = Vec::with_capacity(registry.len());
        for name in registry.names() {
            if let Some(runnable) = registry.get(&name) {
                let fields = runnable.class().pairs::<Value, Value>().collect::<mlua::Result<Vec<_>>>()?;
                classes.push((runnable.class().clone(), fields));
            }
        }
        Ok(ClassSnapshot(classes))
    }

    /// Put every snapshotted class back to exactly the captured fields.
    pub(crate) fn restore_classes(&self, snapshot: ClassSnapshot) -> mlua::Result<()> {
        for (class, fields) in snapshot.0 {
            let current = class
                .pairs::<Value, Value>()
                .map(|pair| pair.map(|(key, _)| key))
                .collect::<mlua::Result<Vec<_>>>()?;
            for key in current {
                class.raw_set(key, Value::Nil)?;
            }
            for (key, value) in fields {
                class.raw_set(key, value)?;
            }
        }
        Ok(())
    }

    /// Roll back runnables declared by a source that failed to evaluate.
    pub(crate) fn discard(&self, names: &BTreeSet<String>) -> mlua::Result<()> {
        let globals = self.lua.globals();
        for name in names {
            self.registry_mut().remove(name);
            if globals.contains_key(name.as_str())? {
                globals.raw_set(name.as_str(), Value::Nil)?;
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for TestHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestHost")
            .field("runnables", &self.registry.borrow().len())
            .finish()
    }
}
