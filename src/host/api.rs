//! The `TestUp` Lua API that test sources declare their cases with.
//!
//! ```lua
//! TestUp.TestCase("TC_Edge")
//! function TC_Edge:test_length() end
//!
//! describe("TC_Mesh", function()
//!   before(function(self) self.mesh = {} end)
//!   describe("when empty", function()
//!     it("has no faces", function(self) end)
//!   end)
//! end)
//! ```
//!
//! Declarations register straight into the host's [`RunnableRegistry`]. Declaring a name that is
//! already registered reopens the existing class instead of creating a second one.

use std::cell::RefCell;
use std::rc::Rc;

use mlua::{Function, Lua, Table};
use testup_core::{
    API_TABLE, CLASS_NAME_FIELD, SETUP_FIELD, TEARDOWN_FIELD, is_nested, nested_name, spec_method_id,
};

use crate::discovery::case::CaseStyle;
use crate::discovery::registry::{Runnable, RunnableRegistry};

/// Shared declaration state captured by the API functions.
#[derive(Clone)]
struct Declarations {
    registry: Rc<RefCell<RunnableRegistry>>,
    /// Qualified names of the `describe` blocks currently being evaluated, innermost last.
    stack: Rc<RefCell<Vec<String>>>,
}

impl Declarations {
    fn existing_class(&self, name: &str) -> Option<Table> {
        self.registry.borrow().get(name).map(|r| r.class().clone())
    }

    fn current_spec(&self) -> mlua::Result<String> {
        self.stack.borrow().last().cloned().ok_or_else(|| {
            mlua::Error::RuntimeError("it/before/after called outside of a describe block".to_string())
        })
    }

    fn current_spec_class(&self) -> mlua::Result<Table> {
        let current = self.current_spec()?;
        self.existing_class(&current)
            .ok_or_else(|| mlua::Error::RuntimeError(format!("describe block '{current}' is no longer registered")))
    }

    fn declare_case(&self, lua: &Lua, name: String, base: Option<Table>) -> mlua::Result<Table> {
        if is_nested(&name) {
            return Err(mlua::Error::RuntimeError(format!(
                "test case name '{name}' must not contain '::'"
            )));
        }
        if let Some(class) = self.existing_class(&name) {
            return Ok(class);
        }

        let class = new_class(lua, &name, base.as_ref())?;
        lua.globals().raw_set(name.as_str(), class.clone())?;
        self.registry
            .borrow_mut()
            .insert(Runnable::new(name, CaseStyle::Plain, class.clone()));
        Ok(class)
    }

    fn declare_spec(&self, lua: &Lua, name: String, body: Function) -> mlua::Result<Table> {
        let parent = self.stack.borrow().last().cloned();
        let qualified = match &parent {
            Some(parent) => nested_name(parent, &name),
            None => name,
        };

        let class = match self.existing_class(&qualified) {
            Some(class) => class,
            None => {
                let parent_class = parent.as_deref().and_then(|p| self.existing_class(p));
                let class = new_class(lua, &qualified, parent_class.as_ref())?;
                let mut registry = self.registry.borrow_mut();
                registry.insert(Runnable::new(qualified.as_str(), CaseStyle::Spec, class.clone()));
                if let Some(entry) = parent.as_deref().and_then(|p| registry.get_mut(p)) {
                    entry.add_child(&qualified);
                }
                class
            }
        };

        self.stack.borrow_mut().push(qualified);
        let result = body.call::<()>(class.clone());
        self.stack.borrow_mut().pop();
        result?;
        Ok(class)
    }

    fn declare_it(&self, description: String, test: Function) -> mlua::Result<()> {
        let current = self.current_spec()?;
        let (class, ordinal) = {
            let mut registry = self.registry.borrow_mut();
            let entry = registry.get_mut(&current).ok_or_else(|| {
                mlua::Error::RuntimeError(format!("describe block '{current}' is no longer registered"))
            })?;
            (entry.class().clone(), entry.next_spec_ordinal())
        };
        class.raw_set(spec_method_id(ordinal, &description), test)
    }

    fn declare_hook(&self, field: &str, hook: Function) -> mlua::Result<()> {
        self.current_spec_class()?.raw_set(field, hook)
    }
}

/// Create a class table named `name`, inheriting from `base` when given.
fn new_class(lua: &Lua, name: &str, base: Option<&Table>) -> mlua::Result<Table> {
    let class = lua.create_table()?;
    class.raw_set(CLASS_NAME_FIELD, name)?;
    if let Some(base) = base {
        let meta = lua.create_table()?;
        meta.raw_set("__index", base.clone())?;
        // Set directly: test sources share these globals and may replace them.
        class.set_metatable(Some(meta));
    }
    Ok(class)
}

/// Install the `TestUp` table and the `describe`/`it`/`before`/`after` globals.
pub fn install(lua: &Lua, registry: Rc<RefCell<RunnableRegistry>>) -> mlua::Result<()> {
    let decls = Declarations {
        registry,
        stack: Rc::new(RefCell::new(Vec::new())),
    };

    let api = lua.create_table()?;

    let d = decls.clone();
    let test_case = lua.create_function(move |lua, (name, base): (String, Option<Table>)| {
        d.declare_case(lua, name, base)
    })?;

    let d = decls.clone();
    let describe = lua.create_function(move |lua, (name, body): (String, Function)| {
        d.declare_spec(lua, name, body)
    })?;

    let d = decls.clone();
    let it = lua.create_function(move |_, (description, test): (String, Function)| {
        d.declare_it(description, test)
    })?;

    let d = decls.clone();
    let before = lua.create_function(move |_, hook: Function| d.declare_hook(SETUP_FIELD, hook))?;

    let d = decls;
    let after = lua.create_function(move |_, hook: Function| d.declare_hook(TEARDOWN_FIELD, hook))?;

    api.raw_set("TestCase", test_case)?;
    let globals = lua.globals();
    for (name, function) in [("describe", describe), ("it", it), ("before", before), ("after", after)] {
        api.raw_set(name, function.clone())?;
        globals.raw_set(name, function)?;
    }
    globals.raw_set(API_TABLE, api)?;
    Ok(())
}
