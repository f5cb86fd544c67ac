use fmock_value::Value;
use std::fmt;
use std::rc::Rc;

use crate::error::{BoxError, MockError};

/// A deferred return value, evaluated on every call with the call's arguments.
pub type Callback = Rc<dyn Fn(&[Value]) -> Result<Value, BoxError>>;

/// How a substituted method computes its return value.
///
/// Exactly one policy is active per method; binding a new one replaces the
/// previous. A closure is always a `Callback` and is never returned as a
/// value: build one with [`ReturnPolicy::callback`] or
/// [`ReturnPolicy::try_callback`]. Anything converted from a [`Value`],
/// `Value::Null` included, is a `Static` value echoed verbatim.
#[derive(Clone, Default)]
pub enum ReturnPolicy {
    /// Return `Value::Null`.
    #[default]
    Unset,
    /// Return a clone of this value on every call.
    Static(Value),
    /// Return the callback's result, computed per call.
    Callback(Callback),
}

impl ReturnPolicy {
    pub fn value(value: impl Into<Value>) -> Self {
        ReturnPolicy::Static(value.into())
    }

    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + 'static,
    {
        let callback: Callback =
            Rc::new(move |args: &[Value]| -> Result<Value, BoxError> { Ok(f(args)) });
        ReturnPolicy::Callback(callback)
    }

    /// A callback that may fail. Its error reaches the caller of the
    /// substitute as [`MockError::Callback`], unchanged.
    pub fn try_callback<F, E>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, E> + 'static,
        E: Into<BoxError>,
    {
        let callback: Callback = Rc::new(move |args: &[Value]| -> Result<Value, BoxError> {
            f(args).map_err(Into::into)
        });
        ReturnPolicy::Callback(callback)
    }

    pub fn resolve(&self, args: &[Value]) -> Result<Value, MockError> {
        match self {
            ReturnPolicy::Unset => Ok(Value::Null),
            ReturnPolicy::Static(value) => Ok(value.clone()),
            ReturnPolicy::Callback(f) => f(args).map_err(MockError::Callback),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ReturnPolicy::Unset => "unset",
            ReturnPolicy::Static(_) => "static",
            ReturnPolicy::Callback(_) => "callback",
        }
    }
}

impl fmt::Debug for ReturnPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnPolicy::Unset => write!(f, "Unset"),
            ReturnPolicy::Static(value) => f.debug_tuple("Static").field(value).finish(),
            ReturnPolicy::Callback(_) => write!(f, "Callback(..)"),
        }
    }
}

impl From<Value> for ReturnPolicy {
    fn from(value: Value) -> Self {
        ReturnPolicy::Static(value)
    }
}
