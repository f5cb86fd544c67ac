use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::MockError;

/// What `replace` operates on: a free function or a method of a class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetIdentity {
    Function { name: String },
    Method { class: String, method: String },
}

/// Routing key for substitutes. Every method of a class routes to the
/// same owner; functions and classes never share one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OwnerKey {
    Function(String),
    Class(String),
}

impl TargetIdentity {
    pub fn function(name: impl Into<String>) -> Self {
        TargetIdentity::Function { name: name.into() }
    }

    pub fn method(class: impl Into<String>, method: impl Into<String>) -> Self {
        TargetIdentity::Method {
            class: class.into(),
            method: method.into(),
        }
    }

    /// Syntactic parse of `"Class::method"` or `"function"`.
    ///
    /// Splits on the last `::`, so namespaced class paths keep their
    /// prefix. Whether the result names anything real is decided by the
    /// interception layer, which may also treat a `::` path as a function.
    pub fn parse(raw: &str) -> Result<Self, MockError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(MockError::InvalidTarget("empty target name".into()));
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(MockError::InvalidTarget(format!(
                "target `{raw}` contains whitespace"
            )));
        }
        match raw.rsplit_once("::") {
            Some((class, method)) => {
                if class.is_empty() || method.is_empty() {
                    return Err(MockError::InvalidTarget(format!(
                        "target `{raw}` must be `Class::method` or a function name"
                    )));
                }
                Ok(TargetIdentity::method(class, method))
            }
            None => Ok(TargetIdentity::function(raw)),
        }
    }

    pub fn owner(&self) -> &str {
        match self {
            TargetIdentity::Function { name } => name,
            TargetIdentity::Method { class, .. } => class,
        }
    }

    pub fn owner_key(&self) -> OwnerKey {
        match self {
            TargetIdentity::Function { name } => OwnerKey::Function(name.clone()),
            TargetIdentity::Method { class, .. } => OwnerKey::Class(class.clone()),
        }
    }

    /// The method name, or the function name for a free function.
    pub fn slot(&self) -> &str {
        match self {
            TargetIdentity::Function { name } => name,
            TargetIdentity::Method { method, .. } => method,
        }
    }
}

impl fmt::Display for TargetIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetIdentity::Function { name } => write!(f, "{name}"),
            TargetIdentity::Method { class, method } => write!(f, "{class}::{method}"),
        }
    }
}
