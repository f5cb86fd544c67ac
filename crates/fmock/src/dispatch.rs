use fmock_value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{BoxError, MockError};
use crate::substitute::Substitute;
use crate::target::TargetIdentity;

/// Host capability that redirects calls for a target to a substitute.
///
/// The registry resolves target strings through it, installs a substitute
/// for every replaced function and for every declared method of a replaced
/// class, and restores the originals on teardown.
pub trait Interception {
    /// Resolve a raw target string to a declared function or method.
    fn resolve(&self, raw: &str) -> Option<TargetIdentity>;

    /// Methods declared on `class`, in declaration order.
    fn methods_of(&self, class: &str) -> Vec<String>;

    /// Original implementation of a declared target. A class substitute
    /// runs it for methods that were not replaced.
    fn original(&self, target: &TargetIdentity) -> Option<Original>;

    /// Route calls for `target` to `substitute`.
    fn install(&mut self, target: &TargetIdentity, substitute: &Substitute)
        -> Result<(), MockError>;

    /// Route calls for `target` back to the original implementation.
    fn restore(&mut self, target: &TargetIdentity);
}

/// Original implementation of a declared function or method.
pub type Original = Rc<dyn Fn(&[Value]) -> Result<Value, BoxError>>;

#[derive(Clone)]
struct Route {
    original: Original,
    substitute: Option<Substitute>,
}

#[derive(Default)]
struct Table {
    routes: HashMap<TargetIdentity, Route>,
    /// Declared methods per class, in declaration order.
    classes: HashMap<String, Vec<String>>,
}

/// Call-dispatch table: the host declares originals, code under test calls
/// through the table, and replaced targets are routed to their substitute.
///
/// Clones share the same table, so the mocker and the code under test can
/// each hold one.
#[derive(Clone, Default)]
pub struct DispatchTable {
    table: Rc<RefCell<Table>>,
}

impl DispatchTable {
    pub fn new() -> Self {
        DispatchTable::default()
    }

    pub fn define_function<F>(&self, name: &str, f: F) -> &Self
    where
        F: Fn(&[Value]) -> Value + 'static,
    {
        self.define(TargetIdentity::function(name), infallible(f))
    }

    pub fn try_define_function<F, E>(&self, name: &str, f: F) -> &Self
    where
        F: Fn(&[Value]) -> Result<Value, E> + 'static,
        E: Into<BoxError>,
    {
        self.define(TargetIdentity::function(name), fallible(f))
    }

    pub fn define_method<F>(&self, class: &str, method: &str, f: F) -> &Self
    where
        F: Fn(&[Value]) -> Value + 'static,
    {
        self.define(TargetIdentity::method(class, method), infallible(f))
    }

    pub fn try_define_method<F, E>(&self, class: &str, method: &str, f: F) -> &Self
    where
        F: Fn(&[Value]) -> Result<Value, E> + 'static,
        E: Into<BoxError>,
    {
        self.define(TargetIdentity::method(class, method), fallible(f))
    }

    fn define(&self, target: TargetIdentity, original: Original) -> &Self {
        let mut table = self.table.borrow_mut();
        if let TargetIdentity::Method { class, method } = &target {
            let methods = table.classes.entry(class.clone()).or_default();
            if !methods.contains(method) {
                methods.push(method.clone());
            }
        }
        let substitute = table
            .routes
            .get(&target)
            .and_then(|route| route.substitute.clone());
        table.routes.insert(target, Route { original, substitute });
        self
    }

    /// Call a target by name, e.g. `"Invoice::total"` or `"strlen"`.
    pub fn call(&self, raw: &str, args: &[Value]) -> Result<Value, MockError> {
        let target = self
            .resolve(raw)
            .ok_or_else(|| MockError::InvalidTarget(format!("`{raw}` is not declared")))?;
        self.dispatch(&target, args)
    }

    pub fn call_function(&self, name: &str, args: &[Value]) -> Result<Value, MockError> {
        self.dispatch(&TargetIdentity::function(name), args)
    }

    pub fn call_method(&self, class: &str, method: &str, args: &[Value]) -> Result<Value, MockError> {
        self.dispatch(&TargetIdentity::method(class, method), args)
    }

    pub fn is_intercepted(&self, target: &TargetIdentity) -> bool {
        self.table
            .borrow()
            .routes
            .get(target)
            .is_some_and(|route| route.substitute.is_some())
    }

    fn dispatch(&self, target: &TargetIdentity, args: &[Value]) -> Result<Value, MockError> {
        // Clone the route out so the table is not borrowed during the call.
        let route = self
            .table
            .borrow()
            .routes
            .get(target)
            .cloned()
            .ok_or_else(|| MockError::InvalidTarget(format!("`{target}` is not declared")))?;
        match route.substitute {
            Some(substitute) => substitute.call(target.slot(), args),
            None => (route.original)(args).map_err(MockError::Callback),
        }
    }
}

impl Interception for DispatchTable {
    fn resolve(&self, raw: &str) -> Option<TargetIdentity> {
        let table = self.table.borrow();
        let as_function = TargetIdentity::function(raw.trim());
        if table.routes.contains_key(&as_function) {
            return Some(as_function);
        }
        let target = TargetIdentity::parse(raw).ok()?;
        table.routes.contains_key(&target).then_some(target)
    }

    fn methods_of(&self, class: &str) -> Vec<String> {
        self.table
            .borrow()
            .classes
            .get(class)
            .cloned()
            .unwrap_or_default()
    }

    fn original(&self, target: &TargetIdentity) -> Option<Original> {
        self.table
            .borrow()
            .routes
            .get(target)
            .map(|route| route.original.clone())
    }

    fn install(&mut self, target: &TargetIdentity, substitute: &Substitute) -> Result<(), MockError> {
        let mut table = self.table.borrow_mut();
        let route = table
            .routes
            .get_mut(target)
            .ok_or_else(|| MockError::InvalidTarget(format!("`{target}` is not declared")))?;
        route.substitute = Some(substitute.clone());
        tracing::debug!(target_name = %target, "interception installed");
        Ok(())
    }

    fn restore(&mut self, target: &TargetIdentity) {
        if let Some(route) = self.table.borrow_mut().routes.get_mut(target) {
            route.substitute = None;
            tracing::debug!(target_name = %target, "original restored");
        }
    }
}

fn infallible<F>(f: F) -> Original
where
    F: Fn(&[Value]) -> Value + 'static,
{
    Rc::new(move |args: &[Value]| -> Result<Value, BoxError> { Ok(f(args)) })
}

fn fallible<F, E>(f: F) -> Original
where
    F: Fn(&[Value]) -> Result<Value, E> + 'static,
    E: Into<BoxError>,
{
    Rc::new(move |args: &[Value]| -> Result<Value, BoxError> { f(args).map_err(Into::into) })
}
