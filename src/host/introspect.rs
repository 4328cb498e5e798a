//! Read test methods off class tables.

use std::collections::BTreeSet;

use mlua::{Table, Value};
use testup_core::is_test_method;

/// Upper bound on the metatable chain walked when collecting inherited methods.
const MAX_ANCESTRY_DEPTH: usize = 64;

/// Test methods defined directly on `class`, sorted.
pub fn own_test_methods(class: &Table) -> mlua::Result<Vec<String>> {
    let mut methods = BTreeSet::new();
    for pair in class.pairs::<Value, Value>() {
        let (key, value) = pair?;
        if let (Value::String(key), Value::Function(_)) = (&key, &value) {
            let key = String::from(key.to_string_lossy());
            if is_test_method(&key) {
                methods.insert(key);
            }
        }
    }
    Ok(methods.into_iter().collect())
}

/// Test methods visible on `class`, including those inherited through `__index` tables.
///
/// The chain is read from the raw metatables, so a `__metatable` field or a replaced
/// `getmetatable` global cannot hide ancestors.
pub fn inherited_test_methods(class: &Table) -> mlua::Result<Vec<String>> {
    let mut methods = BTreeSet::new();
    let mut current = Some(class.clone());
    let mut depth = 0;

    while let Some(table) = current.take() {
        methods.extend(own_test_methods(&table)?);
        depth += 1;
        if depth >= MAX_ANCESTRY_DEPTH {
            tracing::warn!("test case ancestry deeper than {MAX_ANCESTRY_DEPTH} levels, stopping");
            break;
        }
        current = match table.metatable() {
            Some(meta) => match meta.raw_get::<Value>("__index")? {
                Value::Table(parent) => Some(parent),
                _ => None,
            },
            None => None,
        };
    }

    Ok(methods.into_iter().collect())
}
