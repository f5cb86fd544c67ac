use fmock_value::{ArgumentRecord, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::comparator::IntoComparator;
use crate::dispatch::Original;
use crate::error::MockError;
use crate::ledger::InvocationLedger;
use crate::policy::ReturnPolicy;

enum Owner {
    Function,
    /// A class, with the original of every method it declares.
    Class { originals: HashMap<String, Original> },
}

#[derive(Debug, Default)]
struct State {
    ledger: InvocationLedger,
    policies: HashMap<String, ReturnPolicy>,
    /// Replaced methods in the order they were first replaced.
    replaced: Vec<String>,
}

struct Inner {
    name: String,
    owner: Owner,
    trace_invocations: bool,
    state: RefCell<State>,
}

/// Stand-in for a replaced function, or for every replaced method of a class.
///
/// Cloning gives another handle to the same substitute: all methods replaced
/// on one class during a session share it, and `==` compares identity.
#[derive(Clone)]
pub struct Substitute {
    inner: Rc<Inner>,
}

impl Substitute {
    pub(crate) fn for_function(name: &str, trace_invocations: bool) -> Self {
        Substitute::new(name, Owner::Function, trace_invocations)
    }

    pub(crate) fn for_class(
        class: &str,
        originals: HashMap<String, Original>,
        trace_invocations: bool,
    ) -> Self {
        Substitute::new(class, Owner::Class { originals }, trace_invocations)
    }

    fn new(name: &str, owner: Owner, trace_invocations: bool) -> Self {
        Substitute {
            inner: Rc::new(Inner {
                name: name.to_string(),
                owner,
                trace_invocations,
                state: RefCell::new(State::default()),
            }),
        }
    }

    /// Bind `slot` to `policy`, replacing any earlier policy for it.
    /// Other slots keep their ledgers and policies.
    pub(crate) fn bind(&self, slot: &str, policy: ReturnPolicy) {
        let mut state = self.inner.state.borrow_mut();
        if !state.replaced.iter().any(|m| m == slot) {
            state.replaced.push(slot.to_string());
        }
        state.policies.insert(slot.to_string(), policy);
    }

    /// Drop every bound policy. Callbacks that hold a handle to this
    /// substitute would otherwise keep it alive. Replaced slots answer
    /// `Value::Null` afterwards; the ledger is kept.
    pub(crate) fn release(&self) {
        let policies = std::mem::take(&mut self.inner.state.borrow_mut().policies);
        drop(policies);
    }

    /// Class name, or function name for a function substitute.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn is_function(&self) -> bool {
        matches!(self.inner.owner, Owner::Function)
    }

    pub fn replaced_methods(&self) -> Vec<String> {
        self.inner.state.borrow().replaced.clone()
    }

    pub fn ptr_eq(&self, other: &Substitute) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Invoke `method` with `args`: record the call, then produce the
    /// return value from the method's policy.
    ///
    /// Declared methods that were never replaced are recorded too and run
    /// their original implementation. Errors raised by a callback or an
    /// original come back as [`MockError::Callback`].
    pub fn call(&self, method: &str, args: &[Value]) -> Result<Value, MockError> {
        if !self.accepts(method) {
            return Err(MockError::InvalidTarget(format!(
                "`{}` has no method `{method}`",
                self.inner.name
            )));
        }

        let policy = {
            let mut state = self.inner.state.borrow_mut();
            state.ledger.record(method, args);
            if state.replaced.iter().any(|m| m == method) {
                Some(state.policies.get(method).cloned().unwrap_or_default())
            } else {
                None
            }
        };

        if self.inner.trace_invocations {
            tracing::trace!(
                target_name = %self.inner.name,
                method,
                args = args.len(),
                policy = policy.as_ref().map_or("original", ReturnPolicy::kind),
                "substitute invoked"
            );
        }

        // The borrow is released: a callback may call back into this substitute.
        match (policy, &self.inner.owner) {
            (Some(policy), _) => policy.resolve(args),
            (None, Owner::Class { originals }) => match originals.get(method) {
                Some(original) => original(args).map_err(MockError::Callback),
                None => Ok(Value::Null),
            },
            (None, Owner::Function) => Ok(Value::Null),
        }
    }

    /// Invoke the sole replaced slot: the function itself, or the only
    /// replaced method of a class.
    pub fn invoke(&self, args: &[Value]) -> Result<Value, MockError> {
        let method = self.select(None)?;
        self.call(&method, args)
    }

    /// Verify how many times a method was called, e.g. `"2"`, `">=2"`, `3`.
    ///
    /// `method` may be omitted when exactly one method is replaced on this
    /// substitute at the time of the check.
    pub fn was_called_times(
        &self,
        times: impl IntoComparator,
        method: Option<&str>,
    ) -> Result<(), MockError> {
        let cmp = times.into_comparator()?;
        let method = self.select(method)?;
        let actual = self.inner.state.borrow().ledger.count(&method);
        if cmp.evaluate(actual) {
            return Ok(());
        }
        tracing::warn!(
            target_name = %self.inner.name,
            method = %method,
            expected = cmp.expr(),
            actual,
            "call count verification failed"
        );
        Err(MockError::VerificationFailed {
            method,
            expected: cmp.expr().to_string(),
            actual,
            args: None,
        })
    }

    /// Verify how many recorded calls had arguments deep-equal to `expected`.
    pub fn was_called_with_times(
        &self,
        expected: &[Value],
        times: impl IntoComparator,
        method: Option<&str>,
    ) -> Result<(), MockError> {
        let cmp = times.into_comparator()?;
        let method = self.select(method)?;
        let actual = self
            .inner
            .state
            .borrow()
            .ledger
            .count_matching(&method, expected);
        if cmp.evaluate(actual) {
            return Ok(());
        }
        let args = ArgumentRecord::new(expected);
        tracing::warn!(
            target_name = %self.inner.name,
            method = %method,
            args = %args,
            expected = cmp.expr(),
            actual,
            "call count verification failed"
        );
        Err(MockError::VerificationFailed {
            method,
            expected: cmp.expr().to_string(),
            actual,
            args: Some(args),
        })
    }

    pub fn was_not_called(&self, method: Option<&str>) -> Result<(), MockError> {
        self.was_called_times("0", method)
    }

    pub fn was_called_once(&self, method: Option<&str>) -> Result<(), MockError> {
        self.was_called_times("1", method)
    }

    pub fn was_not_called_with(
        &self,
        expected: &[Value],
        method: Option<&str>,
    ) -> Result<(), MockError> {
        self.was_called_with_times(expected, "0", method)
    }

    pub fn was_called_with_once(
        &self,
        expected: &[Value],
        method: Option<&str>,
    ) -> Result<(), MockError> {
        self.was_called_with_times(expected, "1", method)
    }

    pub fn call_count(&self, method: Option<&str>) -> Result<usize, MockError> {
        let method = self.select(method)?;
        Ok(self.inner.state.borrow().ledger.count(&method))
    }

    /// Snapshot of the argument records for a method, in call order.
    pub fn calls(&self, method: Option<&str>) -> Result<Vec<ArgumentRecord>, MockError> {
        let method = self.select(method)?;
        Ok(self.inner.state.borrow().ledger.records(&method).to_vec())
    }

    /// The full ledger as JSON, for diagnostics.
    pub fn ledger_json(&self) -> Result<String, String> {
        self.inner.state.borrow().ledger.to_json()
    }

    fn accepts(&self, method: &str) -> bool {
        match &self.inner.owner {
            Owner::Function => method == self.inner.name,
            Owner::Class { originals } => {
                originals.contains_key(method)
                    || self.inner.state.borrow().replaced.iter().any(|m| m == method)
            }
        }
    }

    fn select(&self, method: Option<&str>) -> Result<String, MockError> {
        if let Some(method) = method {
            if !self.accepts(method) {
                return Err(MockError::InvalidTarget(format!(
                    "`{}` has no method `{method}`",
                    self.inner.name
                )));
            }
            return Ok(method.to_string());
        }
        if self.is_function() {
            return Ok(self.inner.name.clone());
        }
        let state = self.inner.state.borrow();
        match state.replaced.as_slice() {
            [only] => Ok(only.clone()),
            [] => Err(MockError::InvalidTarget(format!(
                "no method of `{}` has been replaced",
                self.inner.name
            ))),
            many => Err(MockError::AmbiguousMethod {
                owner: self.inner.name.clone(),
                methods: many.to_vec(),
            }),
        }
    }
}

impl PartialEq for Substitute {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Substitute {}

impl fmt::Debug for Substitute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Substitute")
            .field("name", &self.inner.name)
            .field("replaced", &self.inner.state.borrow().replaced)
            .finish()
    }
}
